//! CONNECT payload.
//!
//! Field order on the wire is fixed: client id, will topic, will message,
//! username, password. Which optional fields are present is decided by the
//! [`ConnectFlags`] from the variable header, passed in by reference.

use std::fmt;

use bytes::{Buf, BufMut, Bytes};

use crate::codec::{prefixed_len, read_binary, read_string, write_binary, write_string};
use crate::config::ValidationConfig;
use crate::error::{Error, Result};

use super::flags::ConnectFlags;

/// CONNECT payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectPayload {
    pub client_id: String,
    pub will_topic: Option<String>,
    pub will_message: Option<Bytes>,
    pub username: Option<String>,
    pub password: Option<Bytes>,
}

impl ConnectPayload {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            ..Default::default()
        }
    }

    /// Check that field presence matches `flags` and the client id fits `config`.
    pub fn validate(&self, flags: &ConnectFlags, config: &ValidationConfig) -> Result<()> {
        check_presence("will_topic", flags.has_will(), self.will_topic.is_some())?;
        check_presence("will_message", flags.has_will(), self.will_message.is_some())?;
        check_presence("username", flags.has_username(), self.username.is_some())?;
        check_presence("password", flags.has_password(), self.password.is_some())?;

        let len = self.client_id.len();
        if len == 0 {
            if config.allow_empty_client_id && flags.clean_session {
                return Ok(());
            }
            return Err(Error::MissingField("client_id"));
        }
        if len < config.min_client_id_len || len > config.max_client_id_len {
            return Err(Error::InvalidClientId {
                len,
                min: config.min_client_id_len,
                max: config.max_client_id_len,
            });
        }
        Ok(())
    }

    /// Exact number of bytes [`write`](Self::write) produces under `flags`.
    pub fn write_len(&self, flags: &ConnectFlags) -> usize {
        let mut len = prefixed_len(self.client_id.len());

        if flags.has_will() {
            len += prefixed_len(self.will_topic.as_ref().map_or(0, |t| t.len()));
            len += prefixed_len(self.will_message.as_ref().map_or(0, |m| m.len()));
        }
        if flags.has_username() {
            len += prefixed_len(self.username.as_ref().map_or(0, |u| u.len()));
        }
        if flags.has_password() {
            len += prefixed_len(self.password.as_ref().map_or(0, |p| p.len()));
        }

        len
    }

    pub fn write<B: BufMut>(&self, flags: &ConnectFlags, sink: &mut B) -> Result<usize> {
        let mut written = write_string(sink, &self.client_id)?;

        if flags.has_will() {
            let topic = self.will_topic.as_deref().ok_or(Error::MissingField("will_topic"))?;
            let message = self.will_message.as_deref().ok_or(Error::MissingField("will_message"))?;
            written += write_string(sink, topic)?;
            written += write_binary(sink, message)?;
        }

        if flags.has_username() {
            let username = self.username.as_deref().ok_or(Error::MissingField("username"))?;
            written += write_string(sink, username)?;
        }

        if flags.has_password() {
            let password = self.password.as_deref().ok_or(Error::MissingField("password"))?;
            written += write_binary(sink, password)?;
        }

        Ok(written)
    }

    pub fn read<B: Buf>(flags: &ConnectFlags, source: &mut B) -> Result<Self> {
        let client_id = read_string(source)?;

        let (will_topic, will_message) = if flags.has_will() {
            let topic = read_string(source)?;
            let message = read_binary(source)?;
            (Some(topic), Some(message))
        } else {
            (None, None)
        };

        let username = if flags.has_username() {
            Some(read_string(source)?)
        } else {
            None
        };

        let password = if flags.has_password() {
            Some(read_binary(source)?)
        } else {
            None
        };

        Ok(Self {
            client_id,
            will_topic,
            will_message,
            username,
            password,
        })
    }
}

fn check_presence(field: &'static str, flagged: bool, present: bool) -> Result<()> {
    match (flagged, present) {
        (true, false) => Err(Error::MissingField(field)),
        (false, true) => Err(Error::UnexpectedField(field)),
        _ => Ok(()),
    }
}

impl fmt::Display for ConnectPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client_id={:?}", self.client_id)?;
        if let Some(ref topic) = self.will_topic {
            write!(f, " will_topic={:?}", topic)?;
        }
        if let Some(ref message) = self.will_message {
            write!(f, " will_message=<{} bytes>", message.len())?;
        }
        if let Some(ref username) = self.username {
            write!(f, " username={:?}", username)?;
        }
        if self.password.is_some() {
            write!(f, " password=****")?;
        }
        Ok(())
    }
}
