//! # Tsubaki Webhook
//!
//! Axum-based webhook ingestion for the Tsubaki bot SDK.
//!
//! This crate is the transport boundary of the pipeline: it receives POST
//! requests from the platform, enforces signature verification against the
//! raw body, feeds verified bodies to the bot's parser, and acknowledges
//! with an empty JSON object. Rejection policy lives here; the core only
//! computes the verification boolean.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tsubaki_core::{Bot, Classification};
//! use tsubaki_webhook::serve;
//!
//! let mut bot = Bot::new(config, client);
//! bot.on(Classification::Message, |event| { /* ... */ });
//!
//! let handle = serve(Arc::new(bot), "0.0.0.0:8080", "/webhook").await?;
//! println!("listening on {}", handle.addr());
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use tsubaki_core::Bot;

/// The request header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// Errors starting the webhook server.
#[derive(Debug, Error)]
pub enum ServeError {
    /// Verification is enabled but the configuration has no channel secret.
    #[error("signature verification is enabled but no channel secret is configured")]
    MissingSecret,
    /// The listener could not be bound or the signal handler installed.
    #[error("webhook listener error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the webhook router: one POST route feeding the bot's pipeline.
///
/// The route is registered at `path`, with a leading slash added if missing.
/// The router can be merged into a larger axum application; [`serve`] wraps
/// it in a standalone server.
pub fn router(bot: Arc<Bot>, path: &str) -> Router {
    Router::new()
        .route(&normalize_path(path), post(receive))
        .with_state(bot)
}

/// Axum handler for inbound webhook POSTs.
///
/// The signature is checked over the raw body bytes, before any JSON
/// decoding. Requests that fail verification are rejected with 401 and
/// never reach the parser.
async fn receive(State(bot): State<Arc<Bot>>, headers: HeaderMap, body: Bytes) -> Response {
    if bot.config().verify {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok());
        let Some(signature) = signature else {
            warn!("rejecting webhook request without a signature header");
            return StatusCode::UNAUTHORIZED.into_response();
        };
        if !bot.verify(&body, signature) {
            warn!("rejecting webhook request with an invalid signature");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    }

    let dispatched = bot.parse_slice(&body);
    debug!(dispatched, len = body.len(), "webhook request processed");
    (StatusCode::OK, Json(json!({}))).into_response()
}

/// A handle to a running webhook server.
///
/// Dropping the handle shuts the server down; [`WebhookHandle::shutdown`]
/// does so explicitly.
#[derive(Debug)]
pub struct WebhookHandle {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
}

impl WebhookHandle {
    /// The address the server is bound to, with the OS-resolved port.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stops accepting connections and lets in-flight requests finish.
    pub fn shutdown(self) {
        let _ = self.shutdown.send(());
    }
}

/// Binds `addr` and serves the webhook route in a background task.
///
/// Fails fast with [`ServeError::MissingSecret`] when verification is
/// enabled but the bot has no verifier; without that check every request
/// would be rejected at runtime.
pub async fn serve(bot: Arc<Bot>, addr: &str, path: &str) -> Result<WebhookHandle, ServeError> {
    if bot.config().verify && bot.verifier().is_none() {
        return Err(ServeError::MissingSecret);
    }

    let path = normalize_path(path);
    let app = router(Arc::clone(&bot), &path);
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    info!(addr = %local_addr, path = %path, "webhook server listening");
    tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        if let Err(e) = server.await {
            error!(error = %e, "webhook server error");
        }
        info!(addr = %local_addr, "webhook server stopped");
    });

    Ok(WebhookHandle {
        addr: local_addr,
        shutdown: shutdown_tx,
    })
}

/// Serves the webhook route until interrupted with Ctrl-C.
pub async fn listen(bot: Arc<Bot>, addr: &str, path: &str) -> Result<(), ServeError> {
    let handle = serve(bot, addr, path).await?;
    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    handle.shutdown();
    Ok(())
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
