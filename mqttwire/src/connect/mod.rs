//! MQTT CONNECT message.
//!
//! ```text
//! Fixed header     1 byte    type << 4 | flags
//!                  1-4 bytes remaining length
//! Variable header  2+N bytes protocol name
//!                  1 byte    protocol level
//!                  1 byte    connect flags
//!                  2 bytes   keep alive
//! Payload          2+N bytes client id
//!                  2+N bytes will topic     iff will flag
//!                  2+N bytes will message   iff will flag
//!                  2+N bytes username       iff username flag
//!                  2+N bytes password       iff password flag
//! ```

mod builder;
mod flags;
mod message;
mod payload;
mod variable_header;

pub use builder::{ConnectBuilder, Will};
pub use flags::ConnectFlags;
pub use message::{ConnectMessage, Origin};
pub use payload::ConnectPayload;
pub use variable_header::VariableHeader;
