//! Request bodies sent to a Bark server.
//!
//! A Bark push is either the plaintext notification or, when the relay is
//! configured with an AES key, an `{ciphertext, iv}` pair that Bark decrypts
//! back into the same plaintext object. The two shapes never mix.

use serde::{Deserialize, Serialize};

use crate::{InboundEvent, WireError};

/// Badge count shown on the app icon.
pub const DEFAULT_BADGE: u32 = 1;

/// Notification sound.
pub const DEFAULT_SOUND: &str = "minuet";

/// Notification group, so relayed messages collapse together on the device.
pub const DEFAULT_GROUP: &str = "Gotify";

/// Derive the Bark `device_key` field from the configured target URL.
///
/// A leading `https://` is stripped; anything else is returned unchanged.
pub fn device_key(target: &str) -> &str {
    target.strip_prefix("https://").unwrap_or(target)
}

/// Plaintext Bark notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarkNotification {
    /// Notification title
    pub title: String,
    /// Notification body
    pub body: String,
    /// Badge count
    pub badge: u32,
    /// Sound name
    pub sound: String,
    /// Group name
    pub group: String,
    /// Icon URL
    pub icon: String,
    /// URL opened when the notification is tapped
    pub url: String,
    /// Target device key
    pub device_key: String,
}

impl BarkNotification {
    /// Build the notification for a Gotify event.
    ///
    /// `url` is the Gotify host, so tapping the notification opens the web UI.
    pub fn from_event(event: &InboundEvent, icon: &str, url: &str, device_key: &str) -> Self {
        Self {
            title: event.title.clone(),
            body: event.message.clone(),
            badge: DEFAULT_BADGE,
            sound: DEFAULT_SOUND.to_string(),
            group: DEFAULT_GROUP.to_string(),
            icon: icon.to_string(),
            url: url.to_string(),
            device_key: device_key.to_string(),
        }
    }

    /// Serialize to JSON bytes (the plaintext that gets encrypted).
    pub fn to_json_vec(&self) -> Result<Vec<u8>, WireError> {
        serde_json::to_vec(self).map_err(WireError::Serialization)
    }
}

/// Encrypted Bark notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedNotification {
    /// Base64 AES-CBC ciphertext of the serialized [`BarkNotification`]
    pub ciphertext: String,
    /// Initialization vector, sent in clear
    pub iv: String,
}

/// Body of a Bark push request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutboundPayload {
    /// Plaintext notification
    Plain(BarkNotification),
    /// Encrypted notification
    Encrypted(EncryptedNotification),
}

impl OutboundPayload {
    /// Serialize to JSON bytes.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, WireError> {
        serde_json::to_vec(self).map_err(WireError::Serialization)
    }

    /// Whether this payload carries ciphertext.
    pub fn is_encrypted(&self) -> bool {
        matches!(self, Self::Encrypted(_))
    }
}

impl From<BarkNotification> for OutboundPayload {
    fn from(notification: BarkNotification) -> Self {
        Self::Plain(notification)
    }
}

impl From<EncryptedNotification> for OutboundPayload {
    fn from(notification: EncryptedNotification) -> Self {
        Self::Encrypted(notification)
    }
}
