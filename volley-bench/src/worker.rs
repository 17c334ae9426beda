//! Benchmark worker
//!
//! One worker owns one connection and hammers it with sequential
//! blocking pings. Per-call failures do not stop the loop: the worker
//! keeps issuing its full share of calls and reports the last error it
//! saw, so one bad reply mid-run does not shrink the run.

use volley_wire::codec::CodecFactory;
use volley_wire::transport::{SocketFactory, TransportFactory};
use volley_wire::{PingClient, Result, RpcChannel};

/// Runs one worker to completion: connect, issue `calls` pings, close.
///
/// Connection failure is the only early exit; the transport never
/// outlives this function on any path.
pub async fn run(
    addr: &str,
    calls: usize,
    sockets: &dyn SocketFactory,
    transports: &dyn TransportFactory,
    codecs: &dyn CodecFactory,
) -> Result<()> {
    let channel = RpcChannel::open(addr, sockets, transports, codecs).await?;
    let mut client = PingClient::new(channel);

    let mut last_error = None;
    for _ in 0..calls {
        if let Err(e) = client.ping().await {
            last_error = Some(e);
        }
    }

    if let Err(e) = client.close().await {
        tracing::debug!("close after run failed: {}", e);
    }

    match last_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::net::TcpListener;
    use volley_wire::codec::binary::{BinaryCodec, BinaryCodecFactory};
    use volley_wire::transport::buffered::BufferedTransportFactory;
    use volley_wire::transport::mem::MemoryTransport;
    use volley_wire::transport::tcp::{TcpSocketFactory, TcpTransport};
    use volley_wire::{Codec, Message, Transport, TransportFactory, WireError};

    async fn start_server(
        respond: fn(Message) -> Message,
        requests: Arc<AtomicUsize>,
    ) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let requests = Arc::clone(&requests);
                tokio::spawn(async move {
                    let socket = TcpTransport::with_stream(stream).unwrap();
                    let mut transport = BufferedTransportFactory::default()
                        .wrap(Box::new(socket))
                        .unwrap();
                    let mut codec = BinaryCodec;
                    loop {
                        let Ok(request) = codec.read_message(&mut *transport).await else {
                            break;
                        };
                        requests.fetch_add(1, Ordering::SeqCst);
                        let reply = respond(request);
                        if codec.write_message(&mut *transport, &reply).await.is_err() {
                            break;
                        }
                        if transport.flush().await.is_err() {
                            break;
                        }
                    }
                });
            }
        });

        addr
    }

    #[tokio::test]
    async fn test_worker_completes_all_calls() {
        let requests = Arc::new(AtomicUsize::new(0));
        let addr = start_server(
            |request| Message::reply(request.method, request.seq),
            Arc::clone(&requests),
        )
        .await;

        run(
            &addr,
            50,
            &TcpSocketFactory::new(),
            &BufferedTransportFactory::default(),
            &BinaryCodecFactory,
        )
        .await
        .unwrap();

        assert_eq!(requests.load(Ordering::SeqCst), 50);
    }

    #[tokio::test]
    async fn test_worker_continues_past_bad_replies() {
        let requests = Arc::new(AtomicUsize::new(0));
        let addr = start_server(
            |request| Message::exception(request.method, request.seq),
            Arc::clone(&requests),
        )
        .await;

        let err = run(
            &addr,
            25,
            &TcpSocketFactory::new(),
            &BufferedTransportFactory::default(),
            &BinaryCodecFactory,
        )
        .await
        .unwrap_err();

        // Every call was still attempted; the last failure is what comes back
        assert!(matches!(err, WireError::Remote(_)));
        assert_eq!(requests.load(Ordering::SeqCst), 25);
    }

    struct CountingCloseTransport {
        inner: MemoryTransport,
        closes: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Transport for CountingCloseTransport {
        async fn open(&mut self) -> Result<()> {
            self.inner.open().await
        }

        async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
            self.inner.read(buf).await
        }

        async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
            self.inner.write_all(buf).await
        }

        async fn flush(&mut self) -> Result<()> {
            self.inner.flush().await
        }

        async fn close(&mut self) -> Result<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            self.inner.close().await
        }

        fn is_open(&self) -> bool {
            self.inner.is_open()
        }
    }

    struct CountingSocketFactory {
        closes: Arc<AtomicUsize>,
    }

    impl SocketFactory for CountingSocketFactory {
        fn create(&self, _addr: &str) -> Result<Box<dyn Transport>> {
            Ok(Box::new(CountingCloseTransport {
                inner: MemoryTransport::new(),
                closes: Arc::clone(&self.closes),
            }))
        }
    }

    #[tokio::test]
    async fn test_transport_closed_once_when_every_call_fails() {
        let closes = Arc::new(AtomicUsize::new(0));
        let factory = CountingSocketFactory {
            closes: Arc::clone(&closes),
        };

        // The transport swallows writes and never produces replies, so
        // every call fails; the loop still runs its full count and the
        // transport is released exactly once on the way out
        let err = run(
            "unused:0",
            9,
            &factory,
            &BufferedTransportFactory::default(),
            &BinaryCodecFactory,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, WireError::ConnectionClosed));
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_worker_reports_connect_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        drop(listener);

        let err = run(
            &addr,
            10,
            &TcpSocketFactory::new(),
            &BufferedTransportFactory::default(),
            &BinaryCodecFactory,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, WireError::Io(_)));
    }
}
