//! Turns Gotify events into Bark payloads.

use bark_crypto::{encrypt, generate_iv, AesKey};
use bark_types::{device_key, BarkNotification, EncryptedNotification, InboundEvent, OutboundPayload};

use crate::config::RelayConfig;
use crate::error::ForwardError;

/// Encryption settings for outbound payloads.
#[derive(Debug, Clone)]
pub struct Encryption {
    key: AesKey,
    iv: Option<String>,
}

impl Encryption {
    /// Encrypt with `key`, using `iv` for every message or a fresh random IV
    /// per message when `None`.
    pub fn new(key: &str, iv: Option<&str>) -> Self {
        Self {
            key: AesKey::new(key),
            iv: iv.map(str::to_string),
        }
    }
}

/// Builds the payload for each event.
///
/// The fields that do not depend on the event are fixed at construction.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    icon: String,
    url: String,
    device_key: String,
    encryption: Option<Encryption>,
}

impl PayloadBuilder {
    /// Create a builder.
    ///
    /// `url` is the Gotify host, `target` the Bark push URL.
    pub fn new(icon: &str, url: &str, target: &str, encryption: Option<Encryption>) -> Self {
        Self {
            icon: icon.to_string(),
            url: url.to_string(),
            device_key: device_key(target).to_string(),
            encryption,
        }
    }

    /// Create a builder from the relay configuration.
    pub fn from_config(config: &RelayConfig) -> Self {
        let encryption = config
            .bark
            .aes_key()
            .map(|key| Encryption::new(key, config.bark.aes_iv()));
        Self::new(
            &config.bark.icon,
            &config.gotify.host,
            &config.bark.target,
            encryption,
        )
    }

    /// Whether payloads are encrypted.
    pub fn encrypts(&self) -> bool {
        self.encryption.is_some()
    }

    /// Build the payload for one event.
    pub fn build(&self, event: &InboundEvent) -> Result<OutboundPayload, ForwardError> {
        let notification = BarkNotification::from_event(event, &self.icon, &self.url, &self.device_key);

        let Some(encryption) = &self.encryption else {
            return Ok(OutboundPayload::Plain(notification));
        };

        let plaintext = notification.to_json_vec().map_err(ForwardError::Payload)?;
        let iv = match &encryption.iv {
            Some(iv) => iv.clone(),
            None => generate_iv()?,
        };
        let ciphertext = encrypt(&plaintext, &encryption.key, iv.as_bytes())?;

        Ok(OutboundPayload::Encrypted(EncryptedNotification { ciphertext, iv }))
    }
}
