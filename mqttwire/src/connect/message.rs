//! CONNECT message: fixed header, variable header and payload as one unit.

use std::fmt;

use bytes::{Buf, BufMut};
use tracing::{debug, trace};

use crate::codec::{MAX_REMAINING_LENGTH, remaining_length_len};
use crate::config::ValidationConfig;
use crate::error::{Error, Result};
use crate::header::FixedHeader;
use crate::types::MessageType;

use super::builder::ConnectBuilder;
use super::flags::ConnectFlags;
use super::payload::ConnectPayload;
use super::variable_header::VariableHeader;

/// How a [`ConnectMessage`] came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Constructed locally, ready to write.
    Built,
    /// Decoded from a byte stream.
    Parsed,
}

/// CONNECT message.
///
/// Always fully initialized: created by [`new_outgoing`](Self::new_outgoing),
/// the [`builder`](Self::builder), or [`parse`](Self::parse).
///
/// Equality ignores [`Origin`] but compares the fixed header, so a message
/// parsed from a header with a wrong remaining length is not equal to the same
/// fields rebuilt. [`Packet::read`](crate::Packet::read) rejects such input.
#[derive(Debug, Clone)]
pub struct ConnectMessage {
    header: FixedHeader,
    variable_header: VariableHeader,
    payload: ConnectPayload,
    origin: Origin,
}

impl ConnectMessage {
    /// Start building an outgoing CONNECT.
    pub fn builder(client_id: impl Into<String>) -> ConnectBuilder {
        ConnectBuilder::new(client_id)
    }

    /// Create an outgoing CONNECT validated against its protocol's rules.
    pub fn new_outgoing(variable_header: VariableHeader, payload: ConnectPayload) -> Result<Self> {
        let config = ValidationConfig::for_protocol(variable_header.protocol);
        Self::new_outgoing_with(variable_header, payload, &config)
    }

    /// Create an outgoing CONNECT validated against `config`.
    pub fn new_outgoing_with(
        variable_header: VariableHeader,
        payload: ConnectPayload,
        config: &ValidationConfig,
    ) -> Result<Self> {
        variable_header.flags.validate()?;
        payload.validate(&variable_header.flags, config)?;

        let remaining = variable_header.write_len() + payload.write_len(&variable_header.flags);
        if remaining > MAX_REMAINING_LENGTH as usize {
            return Err(Error::Encoding(format!(
                "remaining length {} exceeds {}",
                remaining, MAX_REMAINING_LENGTH
            )));
        }

        Ok(Self {
            header: FixedHeader::connect(remaining as u32),
            variable_header,
            payload,
            origin: Origin::Built,
        })
    }

    /// Parse a CONNECT body validated against the rules of the protocol it
    /// announces.
    ///
    /// `header` has already been read from the stream; `source` is positioned
    /// at the variable header.
    pub fn parse<B: Buf>(header: FixedHeader, source: &mut B) -> Result<Self> {
        Self::parse_body(header, source, None)
    }

    /// Parse a CONNECT body validated against `config`.
    ///
    /// Does not compare consumed bytes against `header.remaining_length`;
    /// [`Packet::read`](crate::Packet::read) does.
    pub fn parse_with<B: Buf>(header: FixedHeader, source: &mut B, config: &ValidationConfig) -> Result<Self> {
        Self::parse_body(header, source, Some(config))
    }

    fn parse_body<B: Buf>(header: FixedHeader, source: &mut B, config: Option<&ValidationConfig>) -> Result<Self> {
        if header.message_type != MessageType::Connect {
            return Err(Error::UnexpectedPacket {
                expected: MessageType::Connect.to_string(),
                got: header.message_type.to_string(),
            });
        }
        if header.flag_bits() != 0 {
            return Err(Error::MalformedHeader("connect fixed header flags must be zero"));
        }

        let variable_header = VariableHeader::read(source).inspect_err(|e| {
            debug!("rejecting connect variable header: {}", e);
        })?;
        let payload = ConnectPayload::read(&variable_header.flags, source)?;

        let protocol_config;
        let config = match config {
            Some(config) => config,
            None => {
                protocol_config = ValidationConfig::for_protocol(variable_header.protocol);
                &protocol_config
            }
        };
        if let Err(e) = payload.validate(&variable_header.flags, config) {
            debug!("rejecting connect from {:?}: {}", payload.client_id, e);
            return Err(e);
        }

        debug!(
            "parsed connect: client_id={} protocol={} keep_alive={}",
            payload.client_id, variable_header.protocol, variable_header.keep_alive
        );

        Ok(Self {
            header,
            variable_header,
            payload,
            origin: Origin::Parsed,
        })
    }

    /// Byte count after the fixed header.
    pub fn remaining_length(&self) -> usize {
        self.variable_header.write_len() + self.payload.write_len(&self.variable_header.flags)
    }

    /// Total encoded size, fixed header included.
    pub fn size(&self) -> usize {
        let remaining = self.remaining_length();
        1 + remaining_length_len(remaining as u32) + remaining
    }

    /// Write the whole message. Returns the number of bytes written.
    pub fn write<B: BufMut>(&self, sink: &mut B) -> Result<usize> {
        let remaining = self.remaining_length();
        let total = self.size();
        if sink.remaining_mut() < total {
            return Err(Error::BufferTooSmall {
                required: total,
                available: sink.remaining_mut(),
            });
        }

        let mut written = FixedHeader::connect(remaining as u32).write(sink)?;
        written += self.variable_header.write(sink)?;
        written += self.payload.write(&self.variable_header.flags, sink)?;

        trace!("wrote connect: client_id={} bytes={}", self.payload.client_id, written);
        Ok(written)
    }

    pub fn header(&self) -> &FixedHeader {
        &self.header
    }

    pub fn variable_header(&self) -> &VariableHeader {
        &self.variable_header
    }

    pub fn payload(&self) -> &ConnectPayload {
        &self.payload
    }

    pub fn flags(&self) -> &ConnectFlags {
        &self.variable_header.flags
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn client_id(&self) -> &str {
        &self.payload.client_id
    }

    pub fn keep_alive(&self) -> u16 {
        self.variable_header.keep_alive
    }

    /// Split into parts.
    pub fn into_parts(self) -> (FixedHeader, VariableHeader, ConnectPayload) {
        (self.header, self.variable_header, self.payload)
    }
}

impl PartialEq for ConnectMessage {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.variable_header == other.variable_header
            && self.payload == other.payload
    }
}

impl Eq for ConnectMessage {}

impl fmt::Display for ConnectMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        writeln!(f, "{}", self.variable_header)?;
        write!(f, "{}", self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProtocolVersion;

    fn sample() -> ConnectMessage {
        ConnectMessage::builder("dev01")
            .keep_alive(60)
            .credentials("alice", "secret")
            .build()
            .unwrap()
    }

    #[test]
    fn test_new_outgoing_is_built() {
        let msg = sample();
        assert_eq!(msg.origin(), Origin::Built);
        assert_eq!(msg.header().message_type, MessageType::Connect);
        assert_eq!(msg.header().remaining_length as usize, msg.remaining_length());
    }

    #[test]
    fn test_write_then_parse() {
        let msg = sample();
        let mut buf: Vec<u8> = Vec::new();
        let written = msg.write(&mut buf).unwrap();
        assert_eq!(written, msg.size());
        assert_eq!(written, buf.len());

        let mut src = &buf[..];
        let header = FixedHeader::read(&mut src).unwrap();
        let parsed = ConnectMessage::parse(header, &mut src).unwrap();
        assert_eq!(parsed.origin(), Origin::Parsed);
        assert_eq!(parsed, msg);
        assert!(src.is_empty());
    }

    #[test]
    fn test_parse_wrong_type() {
        let header = FixedHeader::new(MessageType::Publish, 0);
        let err = ConnectMessage::parse(header, &mut &b""[..]).unwrap_err();
        assert!(matches!(err, Error::UnexpectedPacket { .. }));
    }

    #[test]
    fn test_parse_nonzero_header_flags() {
        let mut header = FixedHeader::connect(0);
        header.retain = true;
        let err = ConnectMessage::parse(header, &mut &b""[..]).unwrap_err();
        assert!(matches!(err, Error::MalformedHeader(_)));
    }

    #[test]
    fn test_write_small_sink() {
        let msg = sample();
        let mut storage = [0u8; 8];
        let mut sink = &mut storage[..];
        let err = msg.write(&mut sink).unwrap_err();
        assert!(matches!(err, Error::BufferTooSmall { available: 8, .. }));
        // Nothing written.
        assert_eq!(storage, [0u8; 8]);
    }

    #[test]
    fn test_new_outgoing_rejects_mismatch() {
        let vh = VariableHeader::new(
            ProtocolVersion::V311,
            ConnectFlags {
                username: true,
                clean_session: true,
                ..Default::default()
            },
            10,
        );
        let err = ConnectMessage::new_outgoing(vh, ConnectPayload::new("dev01")).unwrap_err();
        assert!(matches!(err, Error::MissingField("username")));
    }

    #[test]
    fn test_default_rules_follow_protocol() {
        let long_id = "a-rather-long-client-identifier";
        for id in ["", long_id] {
            let msg = ConnectMessage::builder(id).build().unwrap();
            let mut buf: Vec<u8> = Vec::new();
            msg.write(&mut buf).unwrap();

            let mut src = &buf[..];
            let header = FixedHeader::read(&mut src).unwrap();
            let parsed = ConnectMessage::parse(header, &mut src).unwrap();
            assert_eq!(parsed, msg);

            let (vh, payload) = (*msg.variable_header(), msg.payload().clone());
            assert_eq!(ConnectMessage::new_outgoing(vh, payload).unwrap(), msg);
        }

        // MQTT 3.1 keeps the 23-byte cap on both paths.
        let vh = VariableHeader::new(
            ProtocolVersion::V31,
            ConnectFlags {
                clean_session: true,
                ..Default::default()
            },
            60,
        );
        let err = ConnectMessage::new_outgoing(vh, ConnectPayload::new(long_id)).unwrap_err();
        assert!(matches!(err, Error::InvalidClientId { len: 31, .. }));
    }

    #[test]
    fn test_eq_compares_declared_length() {
        let msg = sample();
        let mut buf: Vec<u8> = Vec::new();
        msg.write(&mut buf).unwrap();
        let body = &buf[msg.header().encoded_len()..];

        let declared = msg.remaining_length() as u32 + 2;
        let parsed = ConnectMessage::parse(FixedHeader::connect(declared), &mut &body[..]).unwrap();
        assert_eq!(parsed.payload(), msg.payload());
        assert_ne!(parsed, msg);
    }

    #[test]
    fn test_display_masks_password() {
        let text = sample().to_string();
        assert!(text.contains("CONNECT"));
        assert!(text.contains("client_id=\"dev01\""));
        assert!(text.contains("password=****"));
        assert!(!text.contains("secret"));
    }
}
