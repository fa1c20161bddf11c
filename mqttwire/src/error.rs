//! Error types for mqttwire.

use std::io;

/// Result type alias for mqttwire.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for encoding and decoding operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A value cannot be represented on the wire.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Fixed header is malformed (bad remaining length, reserved flag bits).
    #[error("malformed header: {0}")]
    MalformedHeader(&'static str),

    /// Source ended before a declared length was satisfied.
    #[error("truncated stream: needed {needed} bytes, {available} available")]
    TruncatedStream { needed: usize, available: usize },

    /// A required field is absent or empty.
    #[error("missing field: {0}")]
    MissingField(&'static str),

    /// A field is present although its flag is clear.
    #[error("unexpected field: {0}")]
    UnexpectedField(&'static str),

    /// Connect flags violate a protocol rule.
    #[error("invalid connect flags: {0}")]
    InvalidConnectFlags(&'static str),

    /// QoS value outside 0..=2.
    #[error("invalid qos: {0}")]
    InvalidQoS(u8),

    /// String field is not valid UTF-8.
    #[error("invalid utf-8 string")]
    InvalidUtf8,

    /// Message type nibble is reserved.
    #[error("invalid packet type: {0}")]
    InvalidPacketType(u8),

    /// Protocol name and level pair is not supported.
    #[error("unsupported protocol: {name:?} level {level}")]
    UnsupportedProtocol { name: String, level: u8 },

    /// Client identifier length is outside the configured bounds.
    #[error("invalid client id length {len}, expected {min}..={max}")]
    InvalidClientId { len: usize, min: usize, max: usize },

    /// Message of another type where CONNECT was expected.
    #[error("unexpected packet: expected {expected}, got {got}")]
    UnexpectedPacket { expected: String, got: String },

    /// Sink has no room for the encoded bytes.
    #[error("buffer too small: required {required}, available {available}")]
    BufferTooSmall { required: usize, available: usize },

    /// More bytes must be buffered before a packet can be framed.
    #[error("incomplete packet: need {needed} more bytes")]
    Incomplete { needed: usize },

    /// Packet exceeds the configured maximum size.
    #[error("packet too large: {size} > {max}")]
    PacketTooLarge { size: usize, max: usize },

    /// Parsed body length differs from the declared remaining length.
    #[error("length mismatch: declared {declared}, consumed {consumed}")]
    LengthMismatch { declared: usize, consumed: usize },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Returns true when the caller should buffer more bytes and retry.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Error::Incomplete { .. })
    }
}
