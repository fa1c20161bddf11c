//! MQTT fixed header.
//!
//! ```text
//! byte 1:   type (bits 7-4) | dup (3) | qos (2-1) | retain (0)
//! byte 2-5: remaining length, 1-4 bytes
//! ```

use std::fmt;

use bytes::{Buf, BufMut};

use crate::bits;
use crate::codec::{
    MAX_REMAINING_LENGTH, read_remaining_length, read_u8, remaining_length_len, write_remaining_length,
    write_u8,
};
use crate::error::{Error, Result};
use crate::types::{MessageType, QoS};

const TYPE_SHIFT: u8 = 4;
const TYPE_WIDTH: u8 = 4;
const DUP_BIT: u8 = 3;
const QOS_SHIFT: u8 = 1;
const QOS_WIDTH: u8 = 2;
const RETAIN_BIT: u8 = 0;

/// Fixed header shared by every MQTT control packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedHeader {
    pub message_type: MessageType,
    pub dup: bool,
    pub qos: QoS,
    pub retain: bool,
    /// Byte count of everything after the fixed header.
    pub remaining_length: u32,
}

impl FixedHeader {
    /// Create a header with all flag bits clear.
    pub fn new(message_type: MessageType, remaining_length: u32) -> Self {
        Self {
            message_type,
            dup: false,
            qos: QoS::AtMostOnce,
            retain: false,
            remaining_length,
        }
    }

    /// Header for a CONNECT packet.
    pub fn connect(remaining_length: u32) -> Self {
        Self::new(MessageType::Connect, remaining_length)
    }

    /// The low nibble of the first byte.
    pub fn flag_bits(&self) -> u8 {
        let mut byte = bits::with_flag(0, DUP_BIT, self.dup);
        byte = bits::with_field(byte, QOS_SHIFT, QOS_WIDTH, self.qos as u8);
        bits::with_flag(byte, RETAIN_BIT, self.retain)
    }

    /// Encoded size of this header.
    pub fn encoded_len(&self) -> usize {
        1 + remaining_length_len(self.remaining_length)
    }

    /// Write the header. Returns the number of bytes written.
    pub fn write<B: BufMut>(&self, sink: &mut B) -> Result<usize> {
        if self.remaining_length > MAX_REMAINING_LENGTH {
            return Err(Error::Encoding(format!(
                "remaining length {} exceeds {}",
                self.remaining_length, MAX_REMAINING_LENGTH
            )));
        }
        if sink.remaining_mut() < self.encoded_len() {
            return Err(Error::BufferTooSmall {
                required: self.encoded_len(),
                available: sink.remaining_mut(),
            });
        }
        let first = bits::with_field(self.flag_bits(), TYPE_SHIFT, TYPE_WIDTH, self.message_type as u8);
        write_u8(sink, first)?;
        let len = write_remaining_length(sink, self.remaining_length)?;
        Ok(1 + len)
    }

    /// Read a header from the source.
    pub fn read<B: Buf>(source: &mut B) -> Result<Self> {
        let first = read_u8(source)
            .map_err(|_| Error::MalformedHeader("missing fixed header"))?;

        let type_bits = bits::field(first, TYPE_SHIFT, TYPE_WIDTH);
        let message_type = MessageType::from_u8(type_bits).ok_or(Error::InvalidPacketType(type_bits))?;

        let qos_bits = bits::field(first, QOS_SHIFT, QOS_WIDTH);
        let qos = QoS::from_u8(qos_bits).ok_or(Error::InvalidQoS(qos_bits))?;

        let remaining_length = read_remaining_length(source)?;

        Ok(Self {
            message_type,
            dup: bits::flag(first, DUP_BIT),
            qos,
            retain: bits::flag(first, RETAIN_BIT),
            remaining_length,
        })
    }
}

impl fmt::Display for FixedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} dup={} qos={} retain={} remaining_length={}",
            self.message_type, self.dup, self.qos as u8, self.retain, self.remaining_length
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_header_bytes() {
        let mut buf: Vec<u8> = Vec::new();
        let written = FixedHeader::connect(200).write(&mut buf).unwrap();
        assert_eq!(written, 3);
        assert_eq!(buf, vec![0x10, 0xC8, 0x01]);
    }

    #[test]
    fn test_header_flags_roundtrip() {
        let header = FixedHeader {
            message_type: MessageType::Publish,
            dup: true,
            qos: QoS::ExactlyOnce,
            retain: true,
            remaining_length: 5,
        };
        let mut buf: Vec<u8> = Vec::new();
        header.write(&mut buf).unwrap();
        assert_eq!(buf[0], 0x3D);

        let parsed = FixedHeader::read(&mut &buf[..]).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_header_reserved_type() {
        let err = FixedHeader::read(&mut &[0xF0, 0x00][..]).unwrap_err();
        assert!(matches!(err, Error::InvalidPacketType(15)));

        let err = FixedHeader::read(&mut &[0x00, 0x00][..]).unwrap_err();
        assert!(matches!(err, Error::InvalidPacketType(0)));
    }

    #[test]
    fn test_header_invalid_qos() {
        let err = FixedHeader::read(&mut &[0x36, 0x00][..]).unwrap_err();
        assert!(matches!(err, Error::InvalidQoS(3)));
    }

    #[test]
    fn test_header_empty_source() {
        let err = FixedHeader::read(&mut &b""[..]).unwrap_err();
        assert!(matches!(err, Error::MalformedHeader(_)));
    }

    #[test]
    fn test_header_remaining_length_too_large() {
        let err = FixedHeader::connect(268_435_456).write(&mut Vec::<u8>::new()).unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }
}
