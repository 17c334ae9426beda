//! Message codecs
//!
//! A [`Codec`] reads and writes [`Message`] envelopes over a transport it
//! borrows per call, so a channel can bind two instances of the same codec
//! (input and output halves) to one transport. Four codecs are selectable
//! by name through [`CodecKind`]:
//!
//! - `binary`: fixed-width big-endian fields with a version header
//! - `compact`: varint-packed fields behind a protocol-id byte
//! - `json`: newline-delimited JSON objects
//! - `simplejson`: newline-delimited positional JSON arrays
//!
//! Codec instances are stateless; all sequencing lives in the channel.

pub mod binary;
pub mod compact;
pub mod json;
pub mod simple_json;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Result, WireError};
use crate::message::Message;
use crate::transport::Transport;

/// Longest accepted newline-delimited record, shared by the JSON codecs
const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Longest accepted method name on the read path
const MAX_METHOD_LENGTH: usize = 1024;

#[async_trait]
pub trait Codec: Send {
    async fn write_message(
        &mut self,
        transport: &mut dyn Transport,
        message: &Message,
    ) -> Result<()>;

    async fn read_message(&mut self, transport: &mut dyn Transport) -> Result<Message>;
}

/// Builds codec instances; shared across workers, so `Send + Sync`
pub trait CodecFactory: Send + Sync {
    fn create(&self) -> Box<dyn Codec>;
}

/// The selectable codecs, by CLI name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecKind {
    Binary,
    Compact,
    Json,
    SimpleJson,
}

impl FromStr for CodecKind {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            // An empty name falls back to the default codec
            "binary" | "" => Ok(CodecKind::Binary),
            "compact" => Ok(CodecKind::Compact),
            "json" => Ok(CodecKind::Json),
            "simplejson" => Ok(CodecKind::SimpleJson),
            _ => Err(WireError::UnknownProtocol(s.to_string())),
        }
    }
}

impl CodecKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodecKind::Binary => "binary",
            CodecKind::Compact => "compact",
            CodecKind::Json => "json",
            CodecKind::SimpleJson => "simplejson",
        }
    }

    /// Resolve the factory for this codec.
    pub fn factory(&self) -> Arc<dyn CodecFactory> {
        match self {
            CodecKind::Binary => Arc::new(binary::BinaryCodecFactory),
            CodecKind::Compact => Arc::new(compact::CompactCodecFactory),
            CodecKind::Json => Arc::new(json::JsonCodecFactory),
            CodecKind::SimpleJson => Arc::new(simple_json::SimpleJsonCodecFactory),
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read bytes up to (and excluding) the next newline.
///
/// Byte-at-a-time reads; the buffering transport underneath makes that
/// cheap.
pub(crate) async fn read_line(transport: &mut dyn Transport) -> Result<Vec<u8>> {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        transport.read_exact(&mut byte).await?;
        if byte[0] == b'\n' {
            return Ok(line);
        }
        line.push(byte[0]);
        if line.len() > MAX_LINE_LENGTH {
            return Err(WireError::Protocol("line too long".to_string()));
        }
    }
}

pub(crate) fn check_method_length(len: usize) -> Result<()> {
    if len > MAX_METHOD_LENGTH {
        return Err(WireError::Protocol(format!(
            "method name too long: {len} bytes"
        )));
    }
    Ok(())
}
