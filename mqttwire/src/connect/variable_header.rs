//! CONNECT variable header: protocol name, level, flags and keep alive.

use std::fmt;

use bytes::{Buf, BufMut};

use crate::codec::{prefixed_len, read_string, read_u16, read_u8, write_string, write_u16, write_u8};
use crate::error::{Error, Result};
use crate::types::ProtocolVersion;

use super::flags::ConnectFlags;

/// CONNECT variable header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VariableHeader {
    pub protocol: ProtocolVersion,
    pub flags: ConnectFlags,
    /// Keep alive interval in seconds.
    pub keep_alive: u16,
}

impl VariableHeader {
    pub fn new(protocol: ProtocolVersion, flags: ConnectFlags, keep_alive: u16) -> Self {
        Self {
            protocol,
            flags,
            keep_alive,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        self.protocol.name()
    }

    pub fn protocol_level(&self) -> u8 {
        self.protocol.level()
    }

    /// Exact number of bytes [`write`](Self::write) produces.
    pub fn write_len(&self) -> usize {
        // name + level + flags + keep alive
        prefixed_len(self.protocol_name().len()) + 1 + 1 + 2
    }

    pub fn write<B: BufMut>(&self, sink: &mut B) -> Result<usize> {
        let flags = self.flags.encode()?;

        let mut written = write_string(sink, self.protocol_name())?;
        write_u8(sink, self.protocol_level())?;
        write_u8(sink, flags)?;
        write_u16(sink, self.keep_alive)?;
        written += 4;

        Ok(written)
    }

    pub fn read<B: Buf>(source: &mut B) -> Result<Self> {
        let name = read_string(source)?;
        let level = read_u8(source)?;
        let protocol =
            ProtocolVersion::from_wire(&name, level).ok_or(Error::UnsupportedProtocol { name, level })?;

        let flags = ConnectFlags::decode(read_u8(source)?)?;
        let keep_alive = read_u16(source)?;

        Ok(Self {
            protocol,
            flags,
            keep_alive,
        })
    }
}

impl fmt::Display for VariableHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "protocol={} level={} keep_alive={} {}",
            self.protocol_name(),
            self.protocol_level(),
            self.keep_alive,
            self.flags
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_bytes() {
        let header = VariableHeader::new(
            ProtocolVersion::V311,
            ConnectFlags {
                clean_session: true,
                ..Default::default()
            },
            60,
        );
        let mut buf: Vec<u8> = Vec::new();
        let written = header.write(&mut buf).unwrap();
        assert_eq!(buf, vec![0x00, 0x04, b'M', b'Q', b'T', b'T', 0x04, 0x02, 0x00, 0x3C]);
        assert_eq!(written, 10);
        assert_eq!(header.write_len(), 10);
    }

    #[test]
    fn test_legacy_protocol() {
        let header = VariableHeader::new(ProtocolVersion::V31, ConnectFlags::default(), 30);
        let mut buf: Vec<u8> = Vec::new();
        header.write(&mut buf).unwrap();
        assert_eq!(buf.len(), header.write_len());
        assert_eq!(header.write_len(), 12);

        let parsed = VariableHeader::read(&mut &buf[..]).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn test_unsupported_protocol() {
        // "MQTT" level 5
        let buf = [0x00, 0x04, b'M', b'Q', b'T', b'T', 0x05, 0x02, 0x00, 0x3C];
        let err = VariableHeader::read(&mut &buf[..]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedProtocol { level: 5, .. }));
    }

    #[test]
    fn test_truncated_keep_alive() {
        let buf = [0x00, 0x04, b'M', b'Q', b'T', b'T', 0x04, 0x02, 0x00];
        let err = VariableHeader::read(&mut &buf[..]).unwrap_err();
        assert!(matches!(err, Error::TruncatedStream { .. }));
    }

    #[test]
    fn test_write_rejects_invalid_flags() {
        let header = VariableHeader::new(
            ProtocolVersion::V311,
            ConnectFlags {
                password: true,
                ..Default::default()
            },
            0,
        );
        let mut buf: Vec<u8> = Vec::new();
        assert!(matches!(header.write(&mut buf), Err(Error::InvalidConnectFlags(_))));
        assert!(buf.is_empty());
    }
}
