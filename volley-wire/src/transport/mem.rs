//! In-memory loopback transport for tests and benches
//!
//! Handles are cheap clones over shared buffers: one side of a test feeds
//! inbound bytes and inspects outbound ones while the code under test holds
//! another handle boxed as a plain [`Transport`].

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

use super::Transport;
use crate::error::Result;

#[derive(Default)]
struct Shared {
    inbound: VecDeque<u8>,
    outbound: Vec<u8>,
    open: bool,
}

#[derive(Clone, Default)]
pub struct MemoryTransport {
    shared: Arc<Mutex<Shared>>,
}

impl MemoryTransport {
    pub fn new() -> MemoryTransport {
        MemoryTransport::default()
    }

    /// Queue bytes for the transport to read.
    pub fn feed(&self, bytes: &[u8]) {
        self.shared.lock().inbound.extend(bytes);
    }

    /// Drain everything written so far.
    pub fn take_written(&self) -> Vec<u8> {
        std::mem::take(&mut self.shared.lock().outbound)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn open(&mut self) -> Result<()> {
        self.shared.lock().open = true;
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut shared = self.shared.lock();
        let n = buf.len().min(shared.inbound.len());
        for (slot, byte) in buf.iter_mut().zip(shared.inbound.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }

    async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.shared.lock().outbound.extend_from_slice(buf);
        Ok(())
    }

    async fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.shared.lock().open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.shared.lock().open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_feed_then_read() {
        let mut transport = MemoryTransport::new();
        transport.feed(b"hello");

        let mut buf = [0u8; 3];
        assert_eq!(transport.read(&mut buf).await.unwrap(), 3);
        assert_eq!(&buf, b"hel");
        assert_eq!(transport.read(&mut buf).await.unwrap(), 2);
        assert_eq!(&buf[..2], b"lo");
        assert_eq!(transport.read(&mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_writes_visible_through_clone() {
        let mut transport = MemoryTransport::new();
        let peer = transport.clone();

        transport.write_all(b"out").await.unwrap();
        assert_eq!(peer.take_written(), b"out");
        assert!(peer.take_written().is_empty());
    }

    #[tokio::test]
    async fn test_open_close_toggle() {
        let mut transport = MemoryTransport::new();
        assert!(!transport.is_open());
        transport.open().await.unwrap();
        assert!(transport.is_open());
        transport.close().await.unwrap();
        assert!(!transport.is_open());
    }
}
