use thiserror::Error;

#[derive(Error, Debug)]
pub enum WireError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(#[from] native_tls::Error),

    #[error("invalid address: {0} (expected host:port)")]
    InvalidAddress(String),

    #[error("invalid protocol: {0} (valid options are: binary, compact, json, simplejson)")]
    UnknownProtocol(String),

    #[error("transport is not open")]
    NotOpen,

    #[error("connection closed")]
    ConnectionClosed,

    #[error("frame exceeds maximum size: {size} > {max}")]
    FrameTooLarge { size: usize, max: usize },

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("out of order reply: expected seq {expected}, got {got}")]
    OutOfOrder { expected: i32, got: i32 },

    #[error("server exception in reply to {0}")]
    Remote(String),
}

pub type Result<T> = std::result::Result<T, WireError>;
