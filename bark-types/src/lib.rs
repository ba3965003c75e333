//! # bark-types
//!
//! Wire format types for the Gotify to Bark notification relay.
//!
//! This crate provides the types that cross the two network boundaries:
//! - [`InboundEvent`] - A message pushed by Gotify over its `/stream` WebSocket
//! - [`OutboundPayload`] - The JSON body POSTed to a Bark server, either
//!   [`BarkNotification`] (plaintext) or [`EncryptedNotification`]
//! - [`WireError`] - Encode/decode errors

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod event;
mod payload;

pub use error::WireError;
pub use event::InboundEvent;
pub use payload::{
    device_key, BarkNotification, EncryptedNotification, OutboundPayload, DEFAULT_BADGE,
    DEFAULT_GROUP, DEFAULT_SOUND,
};
