//! Byte-exact MQTT CONNECT framing.
//!
//! This crate encodes and decodes the MQTT CONNECT control packet for
//! protocol levels 3 (MQTT 3.1, `MQIsdp`) and 4 (MQTT 3.1.1):
//!
//! - **Fixed header**: packet type, flag bits and the remaining length varint
//! - **Variable header**: protocol name, level, connect flags, keep alive
//! - **Payload**: client id plus will, username and password fields gated by
//!   the connect flags
//!
//! The framing primitives in [`codec`] and [`FixedHeader`] are shared by every
//! packet type. Sources are [`bytes::Buf`] and sinks [`bytes::BufMut`];
//! [`Packet::read_from`] and [`Packet::write_to`] adapt blocking
//! `std::io` streams.
//!
//! ## Example
//!
//! ```
//! use giztoy_mqttwire::{ConnectMessage, FixedHeader};
//!
//! # fn main() -> giztoy_mqttwire::Result<()> {
//! let msg = ConnectMessage::builder("dev01")
//!     .keep_alive(60)
//!     .credentials("alice", "secret")
//!     .build()?;
//!
//! let mut buf: Vec<u8> = Vec::new();
//! msg.write(&mut buf)?;
//!
//! let mut src = &buf[..];
//! let header = FixedHeader::read(&mut src)?;
//! let parsed = ConnectMessage::parse(header, &mut src)?;
//! assert_eq!(parsed, msg);
//! # Ok(())
//! # }
//! ```

pub mod bits;
pub mod codec;
mod config;
mod connect;
mod error;
mod header;
mod packet;
mod types;

pub use config::{MAX_PACKET_SIZE, ValidationConfig};
pub use connect::{
    ConnectBuilder, ConnectFlags, ConnectMessage, ConnectPayload, Origin, VariableHeader, Will,
};
pub use error::{Error, Result};
pub use header::FixedHeader;
pub use packet::Packet;
pub use types::{MessageType, ProtocolVersion, QoS};
