//! JSON codec
//!
//! One message per line, as a self-describing object:
//!
//! ```text
//! {"kind":"call","method":"ping","seq":1}\n
//! ```
//!
//! The trailing newline delimits messages, so method names must not
//! contain raw newlines (serde_json escapes them).

use async_trait::async_trait;

use super::{Codec, CodecFactory, read_line};
use crate::error::{Result, WireError};
use crate::message::Message;
use crate::transport::Transport;

pub struct JsonCodec;

#[async_trait]
impl Codec for JsonCodec {
    async fn write_message(
        &mut self,
        transport: &mut dyn Transport,
        message: &Message,
    ) -> Result<()> {
        let mut buf = serde_json::to_vec(message)
            .map_err(|e| WireError::Protocol(format!("JSON encode failed: {e}")))?;
        buf.push(b'\n');
        transport.write_all(&buf).await
    }

    async fn read_message(&mut self, transport: &mut dyn Transport) -> Result<Message> {
        let line = read_line(transport).await?;
        serde_json::from_slice(&line)
            .map_err(|e| WireError::Protocol(format!("JSON decode failed: {e}")))
    }
}

#[derive(Default)]
pub struct JsonCodecFactory;

impl CodecFactory for JsonCodecFactory {
    fn create(&self) -> Box<dyn Codec> {
        Box::new(JsonCodec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageKind;
    use crate::transport::mem::MemoryTransport;

    #[tokio::test]
    async fn test_call_wire_shape() {
        let mut transport = MemoryTransport::new();
        let mut codec = JsonCodec;

        codec
            .write_message(&mut transport, &Message::call("ping", 1))
            .await
            .unwrap();

        let written = transport.take_written();
        assert_eq!(
            written,
            b"{\"kind\":\"call\",\"method\":\"ping\",\"seq\":1}\n"
        );
    }

    #[tokio::test]
    async fn test_round_trip_all_kinds() {
        let mut transport = MemoryTransport::new();
        let mut codec = JsonCodec;

        for message in [
            Message::call("ping", 1),
            Message::reply("ping", 42),
            Message::exception("ping", -7),
        ] {
            codec.write_message(&mut transport, &message).await.unwrap();
            transport.feed(&transport.take_written());
            assert_eq!(codec.read_message(&mut transport).await.unwrap(), message);
        }
    }

    #[tokio::test]
    async fn test_unknown_kind_rejected() {
        let mut transport = MemoryTransport::new();
        transport.feed(b"{\"kind\":\"oneway\",\"method\":\"ping\",\"seq\":1}\n");

        let err = JsonCodec.read_message(&mut transport).await.unwrap_err();
        assert!(matches!(err, WireError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_garbage_rejected() {
        let mut transport = MemoryTransport::new();
        transport.feed(b"not json\n");

        let err = JsonCodec.read_message(&mut transport).await.unwrap_err();
        assert!(matches!(err, WireError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_kind_serializes_lowercase() {
        let json = serde_json::to_string(&MessageKind::Exception).unwrap();
        assert_eq!(json, "\"exception\"");
    }
}
