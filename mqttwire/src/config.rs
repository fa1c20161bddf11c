//! Validation configuration.

use serde::{Deserialize, Serialize};

use crate::types::ProtocolVersion;

/// Maximum packet size (1MB default).
pub const MAX_PACKET_SIZE: usize = 1024 * 1024;

/// Client identifier length limit from MQTT 3.1.
pub const V31_MAX_CLIENT_ID_LEN: usize = 23;

/// Rules applied when building or parsing a CONNECT message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum client identifier length in bytes.
    pub min_client_id_len: usize,
    /// Maximum client identifier length in bytes.
    pub max_client_id_len: usize,
    /// Accept a zero-length client identifier when clean session is set.
    pub allow_empty_client_id: bool,
    /// Maximum size of a framed packet, header included.
    pub max_packet_size: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_client_id_len: 1,
            max_client_id_len: V31_MAX_CLIENT_ID_LEN,
            allow_empty_client_id: false,
            max_packet_size: MAX_PACKET_SIZE,
        }
    }
}

impl ValidationConfig {
    /// Limits matching what a protocol version mandates.
    ///
    /// MQTT 3.1 caps identifiers at 23 bytes. MQTT 3.1.1 lets the server
    /// accept anything a string can carry, and an empty identifier when the
    /// session is clean.
    pub fn for_protocol(version: ProtocolVersion) -> Self {
        match version {
            ProtocolVersion::V31 => Self::default(),
            ProtocolVersion::V311 => Self {
                min_client_id_len: 1,
                max_client_id_len: u16::MAX as usize,
                allow_empty_client_id: true,
                max_packet_size: MAX_PACKET_SIZE,
            },
        }
    }

    /// Set client identifier length bounds.
    pub fn with_client_id_len(mut self, min: usize, max: usize) -> Self {
        self.min_client_id_len = min;
        self.max_client_id_len = max;
        self
    }

    /// Allow or forbid an empty client identifier.
    pub fn with_allow_empty_client_id(mut self, allow: bool) -> Self {
        self.allow_empty_client_id = allow;
        self
    }

    /// Set maximum packet size.
    pub fn with_max_packet_size(mut self, size: usize) -> Self {
        self.max_packet_size = size;
        self
    }
}
