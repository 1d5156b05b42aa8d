//! # Tsubaki Core
//!
//! The transport-free core of the Tsubaki bot SDK: webhook verification,
//! payload parsing, event enrichment, and handler dispatch for the LINE
//! Messaging API.
//!
//! ## Pipeline
//!
//! Inbound request bodies flow through four stages:
//!
//! ```text
//! ┌──────────┐     ┌────────┐     ┌──────────┐     ┌────────────┐
//! │ Verifier │────▶│ Parser │────▶│ Enricher │────▶│ Dispatcher │──▶ handlers
//! └──────────┘     └────────┘     └──────────┘     └────────────┘
//! ```
//!
//! - **Verifier**: checks the HMAC-SHA256 signature of the raw body against
//!   the channel secret ([`SignatureVerifier`])
//! - **Parser**: walks the payload's event list in order ([`parse`](crate::parse))
//! - **Enricher**: attaches bound outbound actions to each event
//!   ([`EnrichedEvent`])
//! - **Dispatcher**: routes events to handlers by [`Classification`]
//!   ([`Dispatcher`])
//!
//! Outbound operations go through the [`ActionClient`] trait; this crate
//! ships no HTTP implementation of it. The `tsubaki-client` crate provides
//! one, and tests substitute their own.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tsubaki_core::{Bot, ChannelConfig, Classification, MessageKind};
//!
//! let config = ChannelConfig {
//!     channel_secret: Some("secret".into()),
//!     channel_access_token: Some("token".into()),
//!     ..ChannelConfig::default()
//! };
//! let mut bot = Bot::new(config, client);
//!
//! bot.on(Classification::MessageKind(MessageKind::Text), |event| {
//!     let reply = event.reply().cloned();
//!     let text = event.message().and_then(|m| m.as_text()).unwrap_or("").to_string();
//!     tokio::spawn(async move {
//!         if let Some(reply) = reply {
//!             let _ = reply.send(text).await;
//!         }
//!     });
//! });
//!
//! let bot = Arc::new(bot);
//! bot.parse_slice(br#"{"events":[]}"#);
//! ```

pub mod action;
pub mod bot;
pub mod config;
pub mod dispatch;
pub mod enrich;
pub mod model;
pub mod parse;
pub mod verify;

// Re-export pipeline types
pub use action::{ActionClient, ApiError, ApiResult, BoxedActionClient};
pub use bot::Bot;
pub use config::ChannelConfig;
pub use dispatch::{Classification, Dispatcher, EventHandler};
pub use enrich::{
    ContentAction, EnrichedEvent, LeaveAction, LeaveScope, ProfileAction, ReplyAction, enrich,
};
pub use parse::{WebhookPayload, parse_payload, parse_slice, parse_value};
pub use verify::SignatureVerifier;

// Re-export model types
pub use model::{
    AccountLink, Beacon, EventKind, MemberList, MessageContent, MessageKind, OutgoingMessage,
    OutgoingMessages, Postback, PostbackParams, Source, UserProfile, WebhookEvent,
};

/// Prelude for common imports.
pub mod prelude {
    pub use super::model::*;
    pub use super::{
        ActionClient, ApiError, ApiResult, Bot, BoxedActionClient, ChannelConfig, Classification,
        Dispatcher, EnrichedEvent, SignatureVerifier, WebhookPayload,
    };
}
