//! Length-prefix framing decorator transport
//!
//! Accumulates writes into a single frame that `flush` sends as one unit:
//!
//! ```text
//! ┌───────────┬─────────────┐
//! │ frame_len │   payload   │
//! ├───────────┼─────────────┤
//! │  u32 BE   │  frame_len  │
//! └───────────┴─────────────┘
//! ```
//!
//! Reads refill a whole inbound frame at a time. Frames larger than the
//! configured maximum are rejected in both directions. The harness does not
//! select this decorator today, but it is wire-compatible with framed peers
//! and pluggable through [`FramedTransportFactory`].

use async_trait::async_trait;
use bytes::{Buf, BufMut, BytesMut};

use super::{Transport, TransportFactory};
use crate::error::{Result, WireError};

pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

pub struct FramedTransport {
    inner: Box<dyn Transport>,
    rframe: BytesMut,
    wframe: BytesMut,
    max_frame: usize,
}

impl FramedTransport {
    pub fn new(inner: Box<dyn Transport>) -> FramedTransport {
        FramedTransport::with_max_frame(DEFAULT_MAX_FRAME_SIZE, inner)
    }

    pub fn with_max_frame(max_frame: usize, inner: Box<dyn Transport>) -> FramedTransport {
        FramedTransport {
            inner,
            rframe: BytesMut::new(),
            wframe: BytesMut::new(),
            max_frame,
        }
    }

    async fn refill(&mut self) -> Result<()> {
        loop {
            let mut header = [0u8; 4];
            self.inner.read_exact(&mut header).await?;
            let len = u32::from_be_bytes(header) as usize;
            if len > self.max_frame {
                return Err(WireError::FrameTooLarge {
                    size: len,
                    max: self.max_frame,
                });
            }
            if len == 0 {
                continue;
            }
            self.rframe.resize(len, 0);
            self.inner.read_exact(&mut self.rframe).await?;
            return Ok(());
        }
    }
}

#[async_trait]
impl Transport for FramedTransport {
    async fn open(&mut self) -> Result<()> {
        self.inner.open().await
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.rframe.is_empty() {
            self.refill().await?;
        }
        let n = buf.len().min(self.rframe.len());
        buf[..n].copy_from_slice(&self.rframe[..n]);
        self.rframe.advance(n);
        Ok(n)
    }

    async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        if self.wframe.len() + buf.len() > self.max_frame {
            return Err(WireError::FrameTooLarge {
                size: self.wframe.len() + buf.len(),
                max: self.max_frame,
            });
        }
        self.wframe.extend_from_slice(buf);
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        if !self.wframe.is_empty() {
            let mut frame = BytesMut::with_capacity(4 + self.wframe.len());
            frame.put_u32(self.wframe.len() as u32);
            frame.extend_from_slice(&self.wframe);
            self.wframe.clear();
            self.inner.write_all(&frame).await?;
        }
        self.inner.flush().await
    }

    async fn close(&mut self) -> Result<()> {
        // An unflushed frame never hits the wire; partial frames are worse
        // than missing ones
        self.wframe.clear();
        self.inner.close().await
    }

    fn is_open(&self) -> bool {
        self.inner.is_open()
    }
}

/// Wraps transports in a [`FramedTransport`]
pub struct FramedTransportFactory {
    max_frame: usize,
}

impl FramedTransportFactory {
    pub fn new() -> FramedTransportFactory {
        FramedTransportFactory {
            max_frame: DEFAULT_MAX_FRAME_SIZE,
        }
    }

    pub fn with_max_frame(max_frame: usize) -> FramedTransportFactory {
        FramedTransportFactory { max_frame }
    }
}

impl Default for FramedTransportFactory {
    fn default() -> Self {
        FramedTransportFactory::new()
    }
}

impl TransportFactory for FramedTransportFactory {
    fn wrap(&self, inner: Box<dyn Transport>) -> Result<Box<dyn Transport>> {
        Ok(Box::new(FramedTransport::with_max_frame(
            self.max_frame,
            inner,
        )))
    }
}
