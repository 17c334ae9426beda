//! Plain TCP socket transport

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use super::{SocketFactory, Transport, split_host_port};
use crate::error::{Result, WireError};

/// A TCP connection to a single peer
///
/// `new` records the address without touching the network; the connection
/// is dialed by [`Transport::open`]. `with_stream` adopts a socket that is
/// already connected, which is how test servers wrap accepted connections.
pub struct TcpTransport {
    addr: String,
    stream: Option<TcpStream>,
}

impl TcpTransport {
    pub fn new(addr: impl Into<String>) -> TcpTransport {
        TcpTransport {
            addr: addr.into(),
            stream: None,
        }
    }

    /// Adopt an already-connected stream.
    pub fn with_stream(stream: TcpStream) -> Result<TcpTransport> {
        stream.set_nodelay(true)?;
        let addr = stream.peer_addr()?.to_string();
        Ok(TcpTransport {
            addr,
            stream: Some(stream),
        })
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn open(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }
        let stream = TcpStream::connect(&self.addr).await?;
        // Lower latency for the one-message-at-a-time call pattern
        stream.set_nodelay(true)?;
        tracing::debug!("connected to {}", self.addr);
        self.stream = Some(stream);
        Ok(())
    }

    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.stream.as_mut() {
            Some(stream) => Ok(stream.read(buf).await?),
            None => Err(WireError::NotOpen),
        }
    }

    async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        match self.stream.as_mut() {
            Some(stream) => Ok(stream.write_all(buf).await?),
            None => Err(WireError::NotOpen),
        }
    }

    async fn flush(&mut self) -> Result<()> {
        match self.stream.as_mut() {
            Some(stream) => Ok(stream.flush().await?),
            None => Err(WireError::NotOpen),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            stream.shutdown().await?;
            tracing::debug!("closed connection to {}", self.addr);
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

/// Builds [`TcpTransport`] instances, rejecting malformed addresses up front
#[derive(Default)]
pub struct TcpSocketFactory;

impl TcpSocketFactory {
    pub fn new() -> TcpSocketFactory {
        TcpSocketFactory
    }
}

impl SocketFactory for TcpSocketFactory {
    fn create(&self, addr: &str) -> Result<Box<dyn Transport>> {
        split_host_port(addr)?;
        Ok(Box::new(TcpTransport::new(addr)))
    }
}
