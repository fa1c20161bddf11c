//! CONNECT flags byte.

use std::fmt;

use crate::bits;
use crate::error::{Error, Result};
use crate::types::QoS;

const USERNAME_BIT: u8 = 7;
const PASSWORD_BIT: u8 = 6;
const WILL_RETAIN_BIT: u8 = 5;
const WILL_QOS_SHIFT: u8 = 3;
const WILL_QOS_WIDTH: u8 = 2;
const WILL_BIT: u8 = 2;
const CLEAN_SESSION_BIT: u8 = 1;
const RESERVED_BIT: u8 = 0;

/// Connect flags.
///
/// Both [`encode`](Self::encode) and [`decode`](Self::decode) reject a
/// password without a username, will QoS or retain without a will, and a set
/// reserved bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectFlags {
    pub username: bool,
    pub password: bool,
    pub will_retain: bool,
    pub will_qos: QoS,
    pub will: bool,
    pub clean_session: bool,
}

impl ConnectFlags {
    pub fn has_will(&self) -> bool {
        self.will
    }

    pub fn has_username(&self) -> bool {
        self.username
    }

    pub fn has_password(&self) -> bool {
        self.password
    }

    /// Check the cross-flag rules.
    pub fn validate(&self) -> Result<()> {
        if self.password && !self.username {
            return Err(Error::InvalidConnectFlags("password flag set without username flag"));
        }
        if !self.will && self.will_qos != QoS::AtMostOnce {
            return Err(Error::InvalidConnectFlags("will qos set without will flag"));
        }
        if !self.will && self.will_retain {
            return Err(Error::InvalidConnectFlags("will retain set without will flag"));
        }
        Ok(())
    }

    /// Pack into the wire byte.
    pub fn encode(&self) -> Result<u8> {
        self.validate()?;

        let mut byte = bits::with_flag(0, USERNAME_BIT, self.username);
        byte = bits::with_flag(byte, PASSWORD_BIT, self.password);
        byte = bits::with_flag(byte, WILL_RETAIN_BIT, self.will_retain);
        byte = bits::with_field(byte, WILL_QOS_SHIFT, WILL_QOS_WIDTH, self.will_qos as u8);
        byte = bits::with_flag(byte, WILL_BIT, self.will);
        byte = bits::with_flag(byte, CLEAN_SESSION_BIT, self.clean_session);

        Ok(byte)
    }

    /// Unpack from the wire byte.
    pub fn decode(byte: u8) -> Result<Self> {
        if bits::flag(byte, RESERVED_BIT) {
            return Err(Error::InvalidConnectFlags("reserved bit set"));
        }

        let qos_bits = bits::field(byte, WILL_QOS_SHIFT, WILL_QOS_WIDTH);
        let will_qos = QoS::from_u8(qos_bits).ok_or(Error::InvalidQoS(qos_bits))?;

        let flags = Self {
            username: bits::flag(byte, USERNAME_BIT),
            password: bits::flag(byte, PASSWORD_BIT),
            will_retain: bits::flag(byte, WILL_RETAIN_BIT),
            will_qos,
            will: bits::flag(byte, WILL_BIT),
            clean_session: bits::flag(byte, CLEAN_SESSION_BIT),
        };
        flags.validate()?;

        Ok(flags)
    }
}

impl fmt::Display for ConnectFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "username={} password={} will={} will_qos={} will_retain={} clean_session={}",
            self.username,
            self.password,
            self.will,
            self.will_qos as u8,
            self.will_retain,
            self.clean_session
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_bits() {
        let flags = ConnectFlags {
            username: true,
            password: true,
            clean_session: true,
            ..Default::default()
        };
        assert_eq!(flags.encode().unwrap(), 0b1100_0010);

        let flags = ConnectFlags {
            will: true,
            will_qos: QoS::ExactlyOnce,
            will_retain: true,
            ..Default::default()
        };
        assert_eq!(flags.encode().unwrap(), 0b0011_0100);
    }

    #[test]
    fn test_decode_bits() {
        let flags = ConnectFlags::decode(0b1110_1110).unwrap();
        assert!(flags.has_username());
        assert!(flags.has_password());
        assert!(flags.has_will());
        assert!(flags.will_retain);
        assert_eq!(flags.will_qos, QoS::AtLeastOnce);
        assert!(flags.clean_session);
    }

    #[test]
    fn test_password_without_username() {
        let flags = ConnectFlags {
            password: true,
            ..Default::default()
        };
        assert!(matches!(flags.encode(), Err(Error::InvalidConnectFlags(_))));
        assert!(matches!(ConnectFlags::decode(0b0100_0000), Err(Error::InvalidConnectFlags(_))));
    }

    #[test]
    fn test_reserved_bit() {
        assert!(matches!(ConnectFlags::decode(0b0000_0011), Err(Error::InvalidConnectFlags(_))));
    }

    #[test]
    fn test_will_qos_three() {
        assert!(matches!(ConnectFlags::decode(0b0001_1100), Err(Error::InvalidQoS(3))));
    }

    #[test]
    fn test_will_bits_without_will() {
        // will qos 1, will flag clear
        assert!(matches!(ConnectFlags::decode(0b0000_1000), Err(Error::InvalidConnectFlags(_))));
        // will retain, will flag clear
        assert!(matches!(ConnectFlags::decode(0b0010_0000), Err(Error::InvalidConnectFlags(_))));
    }
}
