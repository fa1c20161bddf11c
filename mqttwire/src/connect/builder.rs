//! Fluent construction of outgoing CONNECT messages.

use bytes::Bytes;

use crate::config::ValidationConfig;
use crate::error::Result;
use crate::types::{ProtocolVersion, QoS};

use super::flags::ConnectFlags;
use super::message::ConnectMessage;
use super::payload::ConnectPayload;
use super::variable_header::VariableHeader;

/// Last will carried by a CONNECT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Will {
    pub topic: String,
    pub message: Bytes,
    pub qos: QoS,
    pub retain: bool,
}

/// Builder for [`ConnectMessage`].
///
/// Flags are derived from the fields that are set, so the only way to get an
/// inconsistent CONNECT out of it is a password without a username, which
/// [`build`](Self::build) rejects.
#[derive(Debug, Clone)]
pub struct ConnectBuilder {
    client_id: String,
    protocol: ProtocolVersion,
    keep_alive: u16,
    clean_session: bool,
    will: Option<Will>,
    username: Option<String>,
    password: Option<Bytes>,
    config: Option<ValidationConfig>,
}

impl ConnectBuilder {
    /// Defaults to MQTT 3.1.1, keep alive 60s, clean session.
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            protocol: ProtocolVersion::V311,
            keep_alive: 60,
            clean_session: true,
            will: None,
            username: None,
            password: None,
            config: None,
        }
    }

    /// Set protocol version.
    pub fn protocol(mut self, version: ProtocolVersion) -> Self {
        self.protocol = version;
        self
    }

    /// Set keep alive interval.
    pub fn keep_alive(mut self, seconds: u16) -> Self {
        self.keep_alive = seconds;
        self
    }

    /// Set clean session flag.
    pub fn clean_session(mut self, clean: bool) -> Self {
        self.clean_session = clean;
        self
    }

    /// Set last will.
    pub fn will(mut self, topic: impl Into<String>, message: impl Into<Bytes>, qos: QoS, retain: bool) -> Self {
        self.will = Some(Will {
            topic: topic.into(),
            message: message.into(),
            qos,
            retain,
        });
        self
    }

    /// Set username and password.
    pub fn credentials(self, username: impl Into<String>, password: impl Into<Bytes>) -> Self {
        self.username(username).password(password)
    }

    /// Set username only.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password. Requires a username.
    pub fn password(mut self, password: impl Into<Bytes>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Validate with `config` instead of the protocol's defaults.
    pub fn validation(mut self, config: ValidationConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn build(self) -> Result<ConnectMessage> {
        let mut flags = ConnectFlags {
            username: self.username.is_some(),
            password: self.password.is_some(),
            clean_session: self.clean_session,
            ..Default::default()
        };
        if let Some(ref will) = self.will {
            flags.will = true;
            flags.will_qos = will.qos;
            flags.will_retain = will.retain;
        }

        let (will_topic, will_message) = match self.will {
            Some(will) => (Some(will.topic), Some(will.message)),
            None => (None, None),
        };

        let variable_header = VariableHeader::new(self.protocol, flags, self.keep_alive);
        let payload = ConnectPayload {
            client_id: self.client_id,
            will_topic,
            will_message,
            username: self.username,
            password: self.password,
        };

        let config = self
            .config
            .unwrap_or_else(|| ValidationConfig::for_protocol(self.protocol));
        ConnectMessage::new_outgoing_with(variable_header, payload, &config)
    }
}
