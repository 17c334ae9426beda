//! Transport and codec plumbing for the volley RPC load generator
//!
//! This crate provides the client-side wire stack: pluggable codecs
//! (binary, compact, json, simplejson), layered transports (TCP and TLS
//! sockets behind buffering or framing decorators), and a blocking-call
//! RPC channel built from both.

pub mod channel;
pub mod codec;
pub mod error;
pub mod message;
pub mod ping;
pub mod transport;

pub use channel::RpcChannel;
pub use codec::{Codec, CodecFactory, CodecKind};
pub use error::{Result, WireError};
pub use message::{Message, MessageKind};
pub use ping::{PingClient, PING_METHOD};
pub use transport::{SocketFactory, Transport, TransportFactory};

// Concrete layers, for callers assembling their own stacks
pub use transport::buffered::{BufferedTransport, BufferedTransportFactory, DEFAULT_BUFFER_SIZE};
pub use transport::framed::{FramedTransport, FramedTransportFactory};
pub use transport::tcp::{TcpSocketFactory, TcpTransport};
pub use transport::tls::{TlsSocketFactory, TlsTransport};
