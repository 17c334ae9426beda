//! Buffering decorator transport
//!
//! Wraps another transport and batches IO in both directions: reads pull
//! `buffer_size` chunks from the inner transport and hand them out
//! piecemeal, writes accumulate until `flush` (or until the buffer fills).
//! The codecs read and write a few bytes at a time, so every channel runs
//! over one of these.

use async_trait::async_trait;
use bytes::{Buf, BytesMut};

use super::{Transport, TransportFactory};
use crate::error::Result;

pub const DEFAULT_BUFFER_SIZE: usize = 8192;

pub struct BufferedTransport {
    inner: Box<dyn Transport>,
    rbuf: BytesMut,
    wbuf: BytesMut,
    cap: usize,
}

impl BufferedTransport {
    pub fn new(inner: Box<dyn Transport>) -> BufferedTransport {
        BufferedTransport::with_capacity(DEFAULT_BUFFER_SIZE, inner)
    }

    pub fn with_capacity(cap: usize, inner: Box<dyn Transport>) -> BufferedTransport {
        BufferedTransport {
            inner,
            rbuf: BytesMut::with_capacity(cap),
            wbuf: BytesMut::with_capacity(cap),
            cap,
        }
    }

    async fn flush_pending(&mut self) -> Result<()> {
        if !self.wbuf.is_empty() {
            self.inner.write_all(&self.wbuf).await?;
            self.wbuf.clear();
        }
        Ok(())
    }
}

#[async_trait]
impl Transport for BufferedTransport {
    async fn open(&mut self) -> Result<()> {
        self.inner.open().await
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.rbuf.is_empty() {
            self.rbuf.resize(self.cap, 0);
            let n = self.inner.read(&mut self.rbuf).await?;
            self.rbuf.truncate(n);
            if n == 0 {
                return Ok(0);
            }
        }
        let n = buf.len().min(self.rbuf.len());
        buf[..n].copy_from_slice(&self.rbuf[..n]);
        self.rbuf.advance(n);
        Ok(n)
    }

    async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        if self.wbuf.len() + buf.len() > self.cap {
            self.flush_pending().await?;
        }
        if buf.len() >= self.cap {
            // Too big to ever fit; skip the copy
            self.inner.write_all(buf).await?;
        } else {
            self.wbuf.extend_from_slice(buf);
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        self.flush_pending().await?;
        self.inner.flush().await
    }

    async fn close(&mut self) -> Result<()> {
        // Pending bytes are best-effort once the connection is going away
        let _ = self.flush_pending().await;
        self.inner.close().await
    }

    fn is_open(&self) -> bool {
        self.inner.is_open()
    }
}

/// Wraps transports in a [`BufferedTransport`] of a fixed buffer size
pub struct BufferedTransportFactory {
    buffer_size: usize,
}

impl BufferedTransportFactory {
    pub fn new(buffer_size: usize) -> BufferedTransportFactory {
        BufferedTransportFactory { buffer_size }
    }
}

impl Default for BufferedTransportFactory {
    fn default() -> Self {
        BufferedTransportFactory::new(DEFAULT_BUFFER_SIZE)
    }
}

impl TransportFactory for BufferedTransportFactory {
    fn wrap(&self, inner: Box<dyn Transport>) -> Result<Box<dyn Transport>> {
        Ok(Box::new(BufferedTransport::with_capacity(
            self.buffer_size,
            inner,
        )))
    }
}
