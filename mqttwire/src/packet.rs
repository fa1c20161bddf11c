//! Packet framing and dispatch.
//!
//! Reads the fixed header, checks that the whole packet is buffered and within
//! the size limit, hands the body to the matching message parser, and verifies
//! the body was consumed exactly.

use std::io::{self, Read, Write};

use bytes::{BufMut, BytesMut};
use tracing::trace;

use crate::codec::MAX_REMAINING_LENGTH_BYTES;
use crate::config::ValidationConfig;
use crate::connect::ConnectMessage;
use crate::error::{Error, Result};
use crate::header::FixedHeader;
use crate::types::MessageType;

/// A decoded MQTT packet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    Connect(ConnectMessage),
}

/// Length of the fixed header at the start of `buf`, once fully buffered.
fn framed_header_len(buf: &[u8]) -> Result<usize> {
    if buf.is_empty() {
        return Err(Error::Incomplete { needed: 1 });
    }
    for i in 1..=MAX_REMAINING_LENGTH_BYTES {
        match buf.get(i) {
            None => return Err(Error::Incomplete { needed: 1 }),
            Some(byte) if byte & 0x80 == 0 => return Ok(i + 1),
            Some(_) => {}
        }
    }
    Err(Error::MalformedHeader("remaining length exceeds 4 bytes"))
}

impl Packet {
    /// Parse one packet from the start of `buf`.
    ///
    /// Returns the packet and the number of bytes it occupied. Fails with
    /// [`Error::Incomplete`] when more bytes are needed.
    pub fn read(buf: &[u8], config: &ValidationConfig) -> Result<(Packet, usize)> {
        let header_len = framed_header_len(buf)?;
        let header = FixedHeader::read(&mut &buf[..header_len])?;
        let declared = header.remaining_length as usize;
        let total_len = header_len + declared;

        if total_len > config.max_packet_size {
            return Err(Error::PacketTooLarge {
                size: total_len,
                max: config.max_packet_size,
            });
        }

        if buf.len() < total_len {
            return Err(Error::Incomplete {
                needed: total_len - buf.len(),
            });
        }

        let mut body = &buf[header_len..total_len];
        let packet = match header.message_type {
            MessageType::Connect => Packet::Connect(ConnectMessage::parse_with(header, &mut body, config)?),
            other => {
                return Err(Error::UnexpectedPacket {
                    expected: MessageType::Connect.to_string(),
                    got: other.to_string(),
                });
            }
        };

        if !body.is_empty() {
            return Err(Error::LengthMismatch {
                declared,
                consumed: declared - body.len(),
            });
        }

        trace!("read {} packet: {} bytes", header.message_type, total_len);
        Ok((packet, total_len))
    }

    /// Write packet to the sink.
    pub fn write<B: BufMut>(&self, sink: &mut B) -> Result<usize> {
        match self {
            Packet::Connect(p) => p.write(sink),
        }
    }

    /// Calculate packet size.
    pub fn size(&self) -> usize {
        match self {
            Packet::Connect(p) => p.size(),
        }
    }

    pub fn message_type(&self) -> MessageType {
        match self {
            Packet::Connect(_) => MessageType::Connect,
        }
    }

    /// Read a single packet from a blocking reader.
    pub fn read_from<R: Read>(reader: &mut R, config: &ValidationConfig) -> Result<Packet> {
        let mut frame = Vec::with_capacity(1 + MAX_REMAINING_LENGTH_BYTES);
        let mut byte = [0u8; 1];

        reader.read_exact(&mut byte)?;
        frame.push(byte[0]);

        loop {
            match framed_header_len(&frame) {
                Ok(_) => break,
                Err(Error::Incomplete { .. }) => {}
                Err(e) => return Err(e),
            }
            match reader.read_exact(&mut byte) {
                Ok(()) => frame.push(byte[0]),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Err(Error::MalformedHeader("remaining length ended early"));
                }
                Err(e) => return Err(e.into()),
            }
        }

        let header = FixedHeader::read(&mut &frame[..])?;
        let declared = header.remaining_length as usize;
        let total_len = frame.len() + declared;
        if total_len > config.max_packet_size {
            return Err(Error::PacketTooLarge {
                size: total_len,
                max: config.max_packet_size,
            });
        }

        let header_len = frame.len();
        reader.by_ref().take(declared as u64).read_to_end(&mut frame)?;
        let available = frame.len() - header_len;
        if available < declared {
            return Err(Error::TruncatedStream {
                needed: declared,
                available,
            });
        }

        let (packet, _) = Packet::read(&frame, config)?;
        Ok(packet)
    }

    /// Write a single packet to a blocking writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut buf = BytesMut::with_capacity(self.size());
        self.write(&mut buf)?;
        writer.write_all(&buf)?;
        writer.flush()?;
        Ok(())
    }
}

impl From<ConnectMessage> for Packet {
    fn from(msg: ConnectMessage) -> Self {
        Packet::Connect(msg)
    }
}
