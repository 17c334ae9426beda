//! The call/reply envelope exchanged over a channel
//!
//! Every codec serializes exactly one value: a [`Message`] carrying the
//! message kind, the method name, and a sequence number. There is no field
//! model or struct body; the remote method this crate exists to drive takes
//! no arguments and returns nothing.

use serde::{Deserialize, Serialize};

/// Kind of a wire message
///
/// The numeric values are what the binary and compact codecs put on the
/// wire; the JSON codecs use the lowercase names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Client-to-server invocation
    Call,
    /// Successful server response
    Reply,
    /// Server-side failure for a single call; the connection stays usable
    Exception,
}

impl MessageKind {
    pub fn as_u8(self) -> u8 {
        match self {
            MessageKind::Call => 1,
            MessageKind::Reply => 2,
            MessageKind::Exception => 3,
        }
    }

    pub fn from_u8(value: u8) -> Option<MessageKind> {
        match value {
            1 => Some(MessageKind::Call),
            2 => Some(MessageKind::Reply),
            3 => Some(MessageKind::Exception),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Call => "call",
            MessageKind::Reply => "reply",
            MessageKind::Exception => "exception",
        }
    }

    pub fn from_name(name: &str) -> Option<MessageKind> {
        match name {
            "call" => Some(MessageKind::Call),
            "reply" => Some(MessageKind::Reply),
            "exception" => Some(MessageKind::Exception),
            _ => None,
        }
    }
}

/// A single message envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    pub method: String,
    pub seq: i32,
}

impl Message {
    pub fn call(method: impl Into<String>, seq: i32) -> Message {
        Message {
            kind: MessageKind::Call,
            method: method.into(),
            seq,
        }
    }

    pub fn reply(method: impl Into<String>, seq: i32) -> Message {
        Message {
            kind: MessageKind::Reply,
            method: method.into(),
            seq,
        }
    }

    pub fn exception(method: impl Into<String>, seq: i32) -> Message {
        Message {
            kind: MessageKind::Exception,
            method: method.into(),
            seq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_byte_values() {
        assert_eq!(MessageKind::Call.as_u8(), 1);
        assert_eq!(MessageKind::Reply.as_u8(), 2);
        assert_eq!(MessageKind::Exception.as_u8(), 3);

        assert_eq!(MessageKind::from_u8(1), Some(MessageKind::Call));
        assert_eq!(MessageKind::from_u8(2), Some(MessageKind::Reply));
        assert_eq!(MessageKind::from_u8(3), Some(MessageKind::Exception));
        assert_eq!(MessageKind::from_u8(0), None);
        assert_eq!(MessageKind::from_u8(4), None);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(MessageKind::Call.as_str(), "call");
        assert_eq!(MessageKind::from_name("reply"), Some(MessageKind::Reply));
        assert_eq!(MessageKind::from_name("oneway"), None);
    }

    #[test]
    fn test_kind_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&MessageKind::Exception).unwrap();
        assert_eq!(json, "\"exception\"");

        let kind: MessageKind = serde_json::from_str("\"call\"").unwrap();
        assert_eq!(kind, MessageKind::Call);
    }

    #[test]
    fn test_message_constructors() {
        let call = Message::call("ping", 7);
        assert_eq!(call.kind, MessageKind::Call);
        assert_eq!(call.method, "ping");
        assert_eq!(call.seq, 7);

        let reply = Message::reply("ping", 7);
        assert_eq!(reply.kind, MessageKind::Reply);

        let exception = Message::exception("ping", 7);
        assert_eq!(exception.kind, MessageKind::Exception);
    }
}
