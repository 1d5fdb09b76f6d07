//! Notification factory keyed by channel tag ("email", "sms", "push").
//!
//! The registry holds the configured notifications (channel and recipient)
//! in creation order. Messages are not stored there: each `send` writes its
//! delivery line to the shared [`Logger`] tail.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::config::get_registry_config;
use crate::logger::Logger;
use crate::registry::{Attributes, Entity, EntityKind, Registry, RegistryError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Email,
    Sms,
    Push,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Channel::Email => "email",
            Channel::Sms => "sms",
            Channel::Push => "push",
        };
        f.write_str(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "lowercase")]
pub enum Notification {
    Email { from: String, to: String },
    Sms { number: String },
    Push { token: String, app: String },
}

impl EntityKind for Channel {
    type Record = Notification;

    const FAMILY: &'static str = "notification";

    fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "email" => Some(Channel::Email),
            "sms" => Some(Channel::Sms),
            "push" => Some(Channel::Push),
            _ => None,
        }
    }

    fn tags() -> &'static [&'static str] {
        &["email", "sms", "push"]
    }

    fn build(&self, attrs: &Attributes) -> Result<Notification, RegistryError> {
        match self {
            Channel::Email => {
                let cfg = get_registry_config();
                Ok(Notification::Email {
                    from: attrs.optional_str(self, "from")?.unwrap_or_else(|| cfg.email_from().to_string()),
                    to: attrs.optional_str(self, "to")?.unwrap_or_else(|| cfg.email_to().to_string()),
                })
            }
            Channel::Sms => Ok(Notification::Sms {
                number: attrs.required_str(self, "number")?,
            }),
            Channel::Push => Ok(Notification::Push {
                token: attrs.required_str(self, "token")?,
                app: attrs.required_str(self, "app")?,
            }),
        }
    }
}

/// Global notification registry.
pub static GLOBAL_NOTIFICATION_REGISTRY: Lazy<Registry<Channel>> = Lazy::new(Registry::new);

/// Accessor for the global notification registry.
#[inline]
pub fn notification_registry() -> &'static Registry<Channel> {
    &GLOBAL_NOTIFICATION_REGISTRY
}

impl Entity<Channel> {
    /// Delivery line for `message` on this notification's channel.
    pub fn describe(&self, message: &str) -> String {
        match self.record() {
            Notification::Email { from, to } => {
                format!("Email {} -> To: {} | From: {} | Msg: {}", self.id(), to, from, message)
            }
            Notification::Sms { number } => {
                format!("SMS {} -> Number: {} | Msg: {}", self.id(), number, message)
            }
            Notification::Push { token, app } => {
                format!("Push {} -> App: {} | Token: {} | Msg: {}", self.id(), app, token, message)
            }
        }
    }

    /// Writes the delivery line through the shared logger and returns the
    /// stamped line.
    pub fn send(&self, message: &str) -> String {
        Logger::instance().log(&self.describe(message))
    }
}

/// Creates a notification in `registry` and sends `message` on it.
///
/// Nothing is logged when creation fails.
pub fn dispatch(
    registry: &Registry<Channel>,
    tag: &str,
    attrs: &Attributes,
    message: &str,
) -> Result<(Arc<Entity<Channel>>, String), RegistryError> {
    let notification = registry.create(tag, attrs)?;
    let line = notification.send(message);
    Ok((notification, line))
}
