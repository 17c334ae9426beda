//! Byte-stream transports and the factories that build them
//!
//! A channel sees the world through [`Transport`]: an owned, exclusively-held
//! byte stream with an explicit open/close lifecycle. Socket transports
//! ([`tcp::TcpTransport`], [`tls::TlsTransport`]) talk to the network;
//! decorator transports ([`buffered::BufferedTransport`],
//! [`framed::FramedTransport`]) wrap another transport and reshape its IO.
//! [`mem::MemoryTransport`] is an in-process loopback for tests and benches.
//!
//! Construction goes through two factory seams so the harness never names a
//! concrete type: a [`SocketFactory`] turns an address into a raw transport,
//! and a [`TransportFactory`] wraps it in a decorator.

pub mod buffered;
pub mod framed;
pub mod mem;
pub mod tcp;
pub mod tls;

use async_trait::async_trait;

use crate::error::{Result, WireError};

/// An exclusively-owned byte stream with an explicit lifecycle
///
/// Reads and writes before `open` (or after `close`) fail with
/// [`WireError::NotOpen`]. `write_all` may buffer; data is only guaranteed
/// to reach the peer after `flush`.
#[async_trait]
pub trait Transport: Send {
    /// Establish the underlying connection. Opening an already-open
    /// transport is a no-op.
    async fn open(&mut self) -> Result<()>;

    /// Read up to `buf.len()` bytes, returning the number read.
    /// Returns `Ok(0)` only at end of stream.
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write all of `buf`, buffering if the transport buffers.
    async fn write_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Push any buffered bytes to the peer.
    async fn flush(&mut self) -> Result<()>;

    /// Release the underlying connection. Closing an already-closed
    /// transport is a no-op.
    async fn close(&mut self) -> Result<()>;

    fn is_open(&self) -> bool;

    /// Read exactly `buf.len()` bytes, failing with
    /// [`WireError::ConnectionClosed`] if the stream ends first.
    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read(&mut buf[filled..]).await?;
            if n == 0 {
                return Err(WireError::ConnectionClosed);
            }
            filled += n;
        }
        Ok(())
    }
}

/// Builds raw socket transports from an address
///
/// `create` performs no IO; a malformed address fails here, everything else
/// surfaces at [`Transport::open`].
pub trait SocketFactory: Send + Sync {
    fn create(&self, addr: &str) -> Result<Box<dyn Transport>>;
}

/// Wraps a raw transport in a decorator
pub trait TransportFactory: Send + Sync {
    fn wrap(&self, inner: Box<dyn Transport>) -> Result<Box<dyn Transport>>;
}

/// Split `host:port`, validating that the port parses.
pub(crate) fn split_host_port(addr: &str) -> Result<(&str, u16)> {
    let (host, port) = addr
        .rsplit_once(':')
        .ok_or_else(|| WireError::InvalidAddress(addr.to_string()))?;
    if host.is_empty() {
        return Err(WireError::InvalidAddress(addr.to_string()));
    }
    let port = port
        .parse::<u16>()
        .map_err(|_| WireError::InvalidAddress(addr.to_string()))?;
    Ok((host, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_host_port() {
        assert_eq!(
            split_host_port("localhost:9090").unwrap(),
            ("localhost", 9090)
        );
        assert_eq!(
            split_host_port("127.0.0.1:80").unwrap(),
            ("127.0.0.1", 80)
        );
        assert_eq!(split_host_port("[::1]:9090").unwrap(), ("[::1]", 9090));
    }

    #[test]
    fn test_split_host_port_rejects_malformed() {
        assert!(matches!(
            split_host_port("localhost"),
            Err(WireError::InvalidAddress(_))
        ));
        assert!(matches!(
            split_host_port(":9090"),
            Err(WireError::InvalidAddress(_))
        ));
        assert!(matches!(
            split_host_port("host:notaport"),
            Err(WireError::InvalidAddress(_))
        ));
        assert!(matches!(
            split_host_port("host:99999"),
            Err(WireError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_read_exact_reports_eof() {
        let mut transport = mem::MemoryTransport::new();
        transport.feed(b"abc");

        let mut buf = [0u8; 4];
        let err = transport.read_exact(&mut buf).await.unwrap_err();
        assert!(matches!(err, WireError::ConnectionClosed));
    }
}
