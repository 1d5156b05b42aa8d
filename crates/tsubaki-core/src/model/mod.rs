//! Data models for the LINE Messaging API.
//!
//! This module contains the typed shapes of inbound webhook events and
//! outbound messages, plus REST response models.

pub mod api;
pub mod event;
pub mod message;
pub mod outgoing;

pub use api::UserProfile;
pub use event::{
    AccountLink, Beacon, EventKind, MemberList, Postback, PostbackParams, Source, WebhookEvent,
};
pub use message::{MessageContent, MessageKind};
pub use outgoing::{OutgoingMessage, OutgoingMessages};
