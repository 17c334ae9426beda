//! RPC channel
//!
//! An [`RpcChannel`] owns one transport and a codec pair, and drives the
//! blocking call pattern: encode a call, flush, decode the reply, check
//! that the reply matches. One channel serves one caller; there is no
//! multiplexing.

use crate::codec::{Codec, CodecFactory};
use crate::error::{Result, WireError};
use crate::message::{Message, MessageKind};
use crate::transport::{SocketFactory, Transport, TransportFactory};

pub struct RpcChannel {
    transport: Box<dyn Transport>,
    input: Box<dyn Codec>,
    output: Box<dyn Codec>,
    seq: i32,
}

impl RpcChannel {
    /// Builds a channel from the three factories and opens the transport.
    ///
    /// The transport is closed before the error is returned if the open
    /// handshake fails, so half-open sockets never leak out of here.
    pub async fn open(
        addr: &str,
        sockets: &dyn SocketFactory,
        transports: &dyn TransportFactory,
        codecs: &dyn CodecFactory,
    ) -> Result<RpcChannel> {
        let socket = sockets.create(addr)?;
        let mut transport = transports.wrap(socket)?;

        if let Err(e) = transport.open().await {
            let _ = transport.close().await;
            return Err(e);
        }

        Ok(RpcChannel {
            transport,
            input: codecs.create(),
            output: codecs.create(),
            seq: 0,
        })
    }

    /// Performs one blocking zero-argument call and validates the reply.
    pub async fn call(&mut self, method: &str) -> Result<()> {
        self.seq = self.seq.wrapping_add(1);

        let request = Message::call(method, self.seq);
        self.output
            .write_message(&mut *self.transport, &request)
            .await?;
        self.transport.flush().await?;

        let reply = self.input.read_message(&mut *self.transport).await?;
        if reply.seq != self.seq {
            return Err(WireError::OutOfOrder {
                expected: self.seq,
                got: reply.seq,
            });
        }
        if reply.method != method {
            return Err(WireError::Protocol(format!(
                "reply to wrong method: expected {method}, got {}",
                reply.method
            )));
        }

        match reply.kind {
            MessageKind::Reply => Ok(()),
            MessageKind::Exception => Err(WireError::Remote(reply.method)),
            MessageKind::Call => Err(WireError::Protocol(
                "peer sent a call where a reply was expected".to_string(),
            )),
        }
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    /// Consumes the channel and closes the underlying transport.
    pub async fn close(mut self) -> Result<()> {
        self.transport.close().await
    }
}
