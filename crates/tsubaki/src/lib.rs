//! # Tsubaki
//!
//! A webhook bot SDK for the LINE Messaging API.
//!
//! ## Overview
//!
//! Tsubaki receives webhook events, verifies that they really came from
//! the platform, and routes them to your handlers with ready-to-use reply,
//! profile, content, and leave actions already bound. Outbound messaging
//! goes through the same bot object.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐     ┌──────────────────────────────────┐     ┌──────────┐
//! │  Webhook  │────▶│ Verifier → Parser → Enricher →   │────▶│ Handlers │
//! │  (axum)   │     │ Dispatcher        (tsubaki-core) │     └──────────┘
//! └───────────┘     └──────────────────────────────────┘
//!                                  │
//!                                  ▼
//!                    ┌──────────────────────────────┐
//!                    │ ApiClient   (tsubaki-client) │──▶ api.line.me
//!                    └──────────────────────────────┘
//! ```
//!
//! - **tsubaki-core**: verification, parsing, enrichment, dispatch
//! - **tsubaki-client**: reqwest-based outbound API client
//! - **tsubaki-webhook**: axum ingestion server (feature `webhook`, default)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tsubaki::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut bot = tsubaki::bot(tsubaki::load_config()?);
//!
//!     bot.on(Classification::MessageKind(MessageKind::Text), |event| {
//!         let reply = event.reply().cloned();
//!         let text = event
//!             .message()
//!             .and_then(|m| m.as_text())
//!             .unwrap_or_default()
//!             .to_string();
//!         tokio::spawn(async move {
//!             if let Some(reply) = reply {
//!                 let _ = reply.send(text).await;
//!             }
//!         });
//!     });
//!
//!     tsubaki::webhook::listen(Arc::new(bot), "0.0.0.0:8080", "/webhook").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `webhook` *(default)*: axum webhook server (`tsubaki::webhook`)

use std::sync::Arc;

pub use tsubaki_client as client;
pub use tsubaki_core as core;
#[cfg(feature = "webhook")]
pub use tsubaki_webhook as webhook;

mod config;

pub use config::{ConfigError, ENV_PREFIX, load_config};
pub use tsubaki_client::ApiClient;
pub use tsubaki_core::{Bot, ChannelConfig};

/// Builds a bot whose outbound calls go through the HTTP [`ApiClient`].
///
/// Register handlers on the result, then hand it to the webhook server
/// (or feed it payloads directly through the `parse` methods).
pub fn bot(config: ChannelConfig) -> Bot {
    let client = Arc::new(ApiClient::new(&config));
    Bot::new(config, client)
}

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use tsubaki::prelude::*;
/// ```
pub mod prelude {
    // Bot assembly and configuration
    pub use crate::{ConfigError, bot, load_config};
    pub use tsubaki_core::{Bot, ChannelConfig};

    // Classification and handler-facing event types
    pub use tsubaki_core::{
        Classification, EnrichedEvent, EventKind, MessageContent, MessageKind, Source,
        WebhookEvent,
    };

    // Outbound messages and results
    pub use tsubaki_core::{ApiError, ApiResult, OutgoingMessage, OutgoingMessages};

    // Webhook server entry points
    #[cfg(feature = "webhook")]
    pub use tsubaki_webhook::{ServeError, WebhookHandle, listen, router, serve};
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_bot_builder_wires_config_and_verifier() {
        let config = ChannelConfig {
            channel_secret: Some("secret".into()),
            channel_access_token: Some("token".into()),
            api_base: "http://127.0.0.1:9000/v2/bot".into(),
            ..ChannelConfig::default()
        };
        let bot = bot(config);

        assert!(bot.verifier().is_some());
        assert_eq!(bot.config().api_base, "http://127.0.0.1:9000/v2/bot");
        // The assembled pipeline accepts payloads without reaching the network.
        assert_eq!(bot.parse_value(json!({ "events": [] })), 0);
    }

    #[test]
    fn test_bot_without_secret_has_no_verifier() {
        let bot = bot(ChannelConfig::default());
        assert!(bot.verifier().is_none());
        assert!(!bot.verify(b"body", "signature"));
    }
}
