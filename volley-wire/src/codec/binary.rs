//! Binary codec
//!
//! Fixed-width big-endian fields behind a versioned header word:
//!
//! ```text
//! ┌──────────────────┬────────────┬────────────┬────────┐
//! │ version | kind   │ method_len │   method   │  seq   │
//! ├──────────────────┼────────────┼────────────┼────────┤
//! │      u32 BE      │   i32 BE   │    var     │ i32 BE │
//! └──────────────────┴────────────┴────────────┴────────┘
//! ```
//!
//! The header word is `0x8001_0000 | kind`; the sign bit doubles as a
//! version marker, so a peer speaking an unversioned dialect is rejected
//! instead of misparsed.

use async_trait::async_trait;
use bytes::{BufMut, BytesMut};

use super::{Codec, CodecFactory, check_method_length};
use crate::error::{Result, WireError};
use crate::message::{Message, MessageKind};
use crate::transport::Transport;

const VERSION_1: u32 = 0x8001_0000;
const VERSION_MASK: u32 = 0xffff_0000;

pub struct BinaryCodec;

#[async_trait]
impl Codec for BinaryCodec {
    async fn write_message(
        &mut self,
        transport: &mut dyn Transport,
        message: &Message,
    ) -> Result<()> {
        let method = message.method.as_bytes();
        let mut buf = BytesMut::with_capacity(12 + method.len());
        buf.put_u32(VERSION_1 | message.kind.as_u8() as u32);
        buf.put_i32(method.len() as i32);
        buf.put_slice(method);
        buf.put_i32(message.seq);
        transport.write_all(&buf).await
    }

    async fn read_message(&mut self, transport: &mut dyn Transport) -> Result<Message> {
        let mut word = [0u8; 4];
        transport.read_exact(&mut word).await?;
        let header = u32::from_be_bytes(word);
        if header & VERSION_MASK != VERSION_1 {
            return Err(WireError::Protocol(format!(
                "bad version in header: {header:#010x}"
            )));
        }
        let kind = MessageKind::from_u8((header & 0xff) as u8).ok_or_else(|| {
            WireError::Protocol(format!("unknown message kind: {}", header & 0xff))
        })?;

        transport.read_exact(&mut word).await?;
        let len = i32::from_be_bytes(word);
        if len < 0 {
            return Err(WireError::Protocol(format!(
                "negative method length: {len}"
            )));
        }
        check_method_length(len as usize)?;

        let mut method = vec![0u8; len as usize];
        transport.read_exact(&mut method).await?;
        let method = String::from_utf8(method)
            .map_err(|_| WireError::Protocol("method name is not UTF-8".to_string()))?;

        transport.read_exact(&mut word).await?;
        let seq = i32::from_be_bytes(word);

        Ok(Message { kind, method, seq })
    }
}

#[derive(Default)]
pub struct BinaryCodecFactory;

impl CodecFactory for BinaryCodecFactory {
    fn create(&self) -> Box<dyn Codec> {
        Box::new(BinaryCodec)
    }
}
