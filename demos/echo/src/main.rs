//! Echo Bot Demo
//!
//! A minimal Tsubaki bot that echoes every text message back to its sender
//! and greets new followers.
//!
//! # Configuration
//!
//! Channel credentials come from the environment:
//!
//! - `LINE_CHANNEL_SECRET` - shared secret for webhook verification
//! - `LINE_CHANNEL_ACCESS_TOKEN` - bearer token for outbound calls
//!
//! # Usage
//!
//! ```bash
//! LINE_CHANNEL_SECRET=... LINE_CHANNEL_ACCESS_TOKEN=... \
//!     cargo run --package echo-bot
//! ```
//!
//! Point the channel's webhook URL at `http://<host>:8080/webhook`.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use tsubaki::prelude::*;

// ============================================================================
// Handlers
// ============================================================================

/// Echoes the text of every text message back through its reply token.
fn echo_handler(event: &EnrichedEvent) {
    let Some(reply) = event.reply().cloned() else {
        return;
    };
    let text = event
        .message()
        .and_then(|message| message.as_text())
        .unwrap_or_default()
        .to_string();

    info!(text = %text, "echoing message");
    tokio::spawn(async move {
        if let Err(e) = reply.send(text).await {
            error!(error = %e, "failed to send echo reply");
        }
    });
}

/// Greets users who add the bot as a friend.
fn follow_handler(event: &EnrichedEvent) {
    let Some(reply) = event.reply().cloned() else {
        return;
    };
    let user_id = event
        .source
        .as_ref()
        .and_then(|source| source.user_id())
        .unwrap_or("unknown")
        .to_string();

    info!(user_id = %user_id, "new follower");
    tokio::spawn(async move {
        let greeting = "Thanks for adding me! Send any text and I will echo it.";
        if let Err(e) = reply.send(greeting).await {
            error!(error = %e, "failed to send greeting");
        }
    });
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = tsubaki::load_config()?;
    let mut bot = tsubaki::bot(config);

    bot.on(Classification::MessageKind(MessageKind::Text), echo_handler)
        .on(Classification::Follow, follow_handler);

    listen(Arc::new(bot), "0.0.0.0:8080", "/webhook").await?;
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
