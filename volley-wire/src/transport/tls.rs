//! TLS socket transport
//!
//! Built for throwing load at test servers with self-signed certificates:
//! [`TlsSocketFactory::insecure`] disables both certificate and hostname
//! verification. There is deliberately no verifying constructor here; this
//! crate is a load generator, not a trust decision.

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_native_tls::TlsStream;

use super::{SocketFactory, Transport, split_host_port};
use crate::error::{Result, WireError};

/// A TLS connection to a single peer
///
/// `open` dials TCP and performs the handshake in one step. The `domain`
/// is sent for SNI but never checked against the certificate.
pub struct TlsTransport {
    addr: String,
    domain: String,
    connector: native_tls::TlsConnector,
    stream: Option<TlsStream<TcpStream>>,
}

impl TlsTransport {
    pub fn new(
        addr: impl Into<String>,
        domain: impl Into<String>,
        connector: native_tls::TlsConnector,
    ) -> TlsTransport {
        TlsTransport {
            addr: addr.into(),
            domain: domain.into(),
            connector,
            stream: None,
        }
    }
}

#[async_trait]
impl Transport for TlsTransport {
    async fn open(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }
        let tcp = TcpStream::connect(&self.addr).await?;
        tcp.set_nodelay(true)?;
        let connector = tokio_native_tls::TlsConnector::from(self.connector.clone());
        let stream = connector.connect(&self.domain, tcp).await?;
        tracing::debug!("TLS handshake complete with {}", self.addr);
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
            // Sends close_notify before shutting the socket down
            stream.shutdown().await?;
            tracing::debug!("closed TLS connection to {}", self.addr);
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}

/// Builds [`TlsTransport`] instances with verification disabled
pub struct TlsSocketFactory {
    connector: native_tls::TlsConnector,
}

impl TlsSocketFactory {
    /// Create a factory that accepts any certificate for any hostname.
    pub fn insecure() -> Result<TlsSocketFactory> {
        let connector = native_tls::TlsConnector::builder()
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true)
            .build()?;
        Ok(TlsSocketFactory { connector })
    }
}

impl SocketFactory for TlsSocketFactory {
    fn create(&self, addr: &str) -> Result<Box<dyn Transport>> {
        let (host, _) = split_host_port(addr)?;
        Ok(Box::new(TlsTransport::new(
            addr,
            host,
            self.connector.clone(),
        )))
    }
}
