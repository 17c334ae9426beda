//! Ping client
//!
//! The one RPC the load generator knows how to make. A [`PingClient`]
//! wraps an [`RpcChannel`] and issues zero-argument `ping` calls.

use crate::channel::RpcChannel;
use crate::error::Result;

pub const PING_METHOD: &str = "ping";

pub struct PingClient {
    channel: RpcChannel,
}

impl PingClient {
    pub fn new(channel: RpcChannel) -> PingClient {
        PingClient { channel }
    }

    /// One round trip: send `ping`, wait for the matching reply.
    pub async fn ping(&mut self) -> Result<()> {
        self.channel.call(PING_METHOD).await
    }

    pub fn is_open(&self) -> bool {
        self.channel.is_open()
    }

    pub async fn close(self) -> Result<()> {
        self.channel.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Codec;
    use crate::codec::binary::{BinaryCodec, BinaryCodecFactory};
    use crate::message::Message;
    use crate::transport::TransportFactory;
    use crate::transport::buffered::BufferedTransportFactory;
    use crate::transport::tcp::{TcpSocketFactory, TcpTransport};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_ping_round_trips() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let socket = TcpTransport::with_stream(stream).unwrap();
            let mut transport = BufferedTransportFactory::default()
                .wrap(Box::new(socket))
                .unwrap();
            let mut codec = BinaryCodec;
            loop {
                let Ok(request) = codec.read_message(&mut *transport).await else {
                    break;
                };
                assert_eq!(request.method, PING_METHOD);
                let reply = Message::reply(request.method, request.seq);
                if codec.write_message(&mut *transport, &reply).await.is_err() {
                    break;
                }
                if transport.flush().await.is_err() {
                    break;
                }
            }
        });

        let channel = RpcChannel::open(
            &addr,
            &TcpSocketFactory::new(),
            &BufferedTransportFactory::default(),
            &BinaryCodecFactory,
        )
        .await
        .unwrap();

        let mut client = PingClient::new(channel);
        for _ in 0..5 {
            client.ping().await.unwrap();
        }
        client.close().await.unwrap();
    }
}
