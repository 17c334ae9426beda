//! Simple JSON codec
//!
//! Positional encoding: a three-element array per line instead of a
//! keyed object, trading self-description for fewer bytes on the wire:
//!
//! ```text
//! ["call","ping",1]\n
//! ```

use async_trait::async_trait;

use super::{Codec, CodecFactory, read_line};
use crate::error::{Result, WireError};
use crate::message::{Message, MessageKind};
use crate::transport::Transport;

pub struct SimpleJsonCodec;

#[async_trait]
impl Codec for SimpleJsonCodec {
    async fn write_message(
        &mut self,
        transport: &mut dyn Transport,
        message: &Message,
    ) -> Result<()> {
        let frame = (message.kind.as_str(), &message.method, message.seq);
        let mut buf = serde_json::to_vec(&frame)
            .map_err(|e| WireError::Protocol(format!("JSON encode failed: {e}")))?;
        buf.push(b'\n');
        transport.write_all(&buf).await
    }

    async fn read_message(&mut self, transport: &mut dyn Transport) -> Result<Message> {
        let line = read_line(transport).await?;
        let (kind, method, seq): (String, String, i32) = serde_json::from_slice(&line)
            .map_err(|e| WireError::Protocol(format!("JSON decode failed: {e}")))?;
        let kind = MessageKind::from_name(&kind)
            .ok_or_else(|| WireError::Protocol(format!("unknown message kind: {kind}")))?;

        Ok(Message { kind, method, seq })
    }
}

#[derive(Default)]
pub struct SimpleJsonCodecFactory;

impl CodecFactory for SimpleJsonCodecFactory {
    fn create(&self) -> Box<dyn Codec> {
        Box::new(SimpleJsonCodec)
    }
}
