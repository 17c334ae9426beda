//! Compact codec
//!
//! Variable-width encoding behind a protocol-id byte:
//!
//! ```text
//! ┌─────────────┬─────────────────┬────────┬────────────┬────────┐
//! │ protocol_id │ version | kind  │  seq   │ method_len │ method │
//! ├─────────────┼─────────────────┼────────┼────────────┼────────┤
//! │  u8 (0x82)  │ u8 (kind << 5)  │ varint │   varint   │  var   │
//! └─────────────┴─────────────────┴────────┴────────────┴────────┘
//! ```
//!
//! Varints are LEB128: seven payload bits per byte, high bit set on every
//! byte but the last.

use async_trait::async_trait;
use bytes::{BufMut, BytesMut};

use super::{Codec, CodecFactory, check_method_length};
use crate::error::{Result, WireError};
use crate::message::{Message, MessageKind};
use crate::transport::Transport;

const PROTOCOL_ID: u8 = 0x82;
const VERSION: u8 = 1;
const VERSION_MASK: u8 = 0x1f;
const KIND_SHIFT: u8 = 5;

fn write_varint(buf: &mut BytesMut, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.put_u8(byte);
            return;
        }
        buf.put_u8(byte | 0x80);
    }
}

async fn read_varint(transport: &mut dyn Transport) -> Result<u64> {
    let mut value = 0u64;
    let mut shift = 0;
    loop {
        let mut byte = [0u8; 1];
        transport.read_exact(&mut byte).await?;
        value |= ((byte[0] & 0x7f) as u64) << shift;
        if byte[0] & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
        if shift >= 64 {
            return Err(WireError::Protocol("varint too long".to_string()));
        }
    }
}

pub struct CompactCodec;

#[async_trait]
impl Codec for CompactCodec {
    async fn write_message(
        &mut self,
        transport: &mut dyn Transport,
        message: &Message,
    ) -> Result<()> {
        let method = message.method.as_bytes();
        let mut buf = BytesMut::with_capacity(12 + method.len());
        buf.put_u8(PROTOCOL_ID);
        buf.put_u8(VERSION | (message.kind.as_u8() << KIND_SHIFT));
        // Sequence numbers ride as raw bits, not zigzag; negatives are
        // legal but long
        write_varint(&mut buf, message.seq as u32 as u64);
        write_varint(&mut buf, method.len() as u64);
        buf.put_slice(method);
        transport.write_all(&buf).await
    }

    async fn read_message(&mut self, transport: &mut dyn Transport) -> Result<Message> {
        let mut byte = [0u8; 1];
        transport.read_exact(&mut byte).await?;
        if byte[0] != PROTOCOL_ID {
            return Err(WireError::Protocol(format!(
                "bad protocol id: {:#04x}",
                byte[0]
            )));
        }

        transport.read_exact(&mut byte).await?;
        if byte[0] & VERSION_MASK != VERSION {
            return Err(WireError::Protocol(format!(
                "bad version: {}",
                byte[0] & VERSION_MASK
            )));
        }
        let kind_bits = byte[0] >> KIND_SHIFT;
        let kind = MessageKind::from_u8(kind_bits).ok_or_else(|| {
            WireError::Protocol(format!("unknown message kind: {kind_bits}"))
        })?;

        let seq = read_varint(transport).await? as u32 as i32;

        let len = read_varint(transport).await? as usize;
        check_method_length(len)?;
        let mut method = vec![0u8; len];
        transport.read_exact(&mut method).await?;
        let method = String::from_utf8(method)
            .map_err(|_| WireError::Protocol("method name is not UTF-8".to_string()))?;

        Ok(Message { kind, method, seq })
    }
}

#[derive(Default)]
pub struct CompactCodecFactory;

impl CodecFactory for CompactCodecFactory {
    fn create(&self) -> Box<dyn Codec> {
        Box::new(CompactCodec)
    }
}
