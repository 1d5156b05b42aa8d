//! The outbound capability surface.
//!
//! [`ActionClient`] is the seam between the event pipeline and the HTTP
//! client that talks to the platform. The core only depends on this trait;
//! the reqwest implementation lives in `tsubaki-client`, and tests substitute
//! recording mocks.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future;
use serde_json::Value;
use thiserror::Error;

use crate::model::{OutgoingMessages, UserProfile};

/// Errors surfaced by outbound API calls.
///
/// Carries strings and status codes only, so the core stays independent of
/// any particular HTTP client. Failures are propagated to the caller as-is:
/// no retries, no reclassification.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never produced a response (connect failure, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),
    /// The platform answered with a non-success status.
    #[error("api returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body text, as far as it could be read.
        message: String,
    },
    /// The response arrived but its body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// Result type for outbound API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// A shared, type-erased action client.
pub type BoxedActionClient = Arc<dyn ActionClient>;

/// Authenticated operations against the platform's REST API.
///
/// Every method resolves to an [`ApiResult`]; the JSON-returning operations
/// hand back the raw response [`Value`] since most endpoints answer with an
/// empty object.
#[async_trait]
pub trait ActionClient: Send + Sync {
    /// Sends messages in reply to an event, consuming its reply token.
    async fn reply(
        &self,
        reply_token: &str,
        messages: OutgoingMessages,
        notification_disabled: bool,
    ) -> ApiResult<Value>;

    /// Sends messages to a single user, group, or room at any time.
    async fn push(
        &self,
        to: &str,
        messages: OutgoingMessages,
        notification_disabled: bool,
    ) -> ApiResult<Value>;

    /// Sends the same messages to multiple users in one API call.
    async fn multicast(
        &self,
        to: &[String],
        messages: OutgoingMessages,
        notification_disabled: bool,
    ) -> ApiResult<Value>;

    /// Fetches a user's profile.
    async fn user_profile(&self, user_id: &str) -> ApiResult<UserProfile>;

    /// Fetches the binary content of a media message.
    async fn message_content(&self, message_id: &str) -> ApiResult<Vec<u8>>;

    /// Makes the bot leave a group.
    async fn leave_group(&self, group_id: &str) -> ApiResult<Value>;

    /// Makes the bot leave a room.
    async fn leave_room(&self, room_id: &str) -> ApiResult<Value>;

    /// Performs a GET against a relative API path.
    async fn get(&self, path: &str) -> ApiResult<Value>;

    /// Performs a POST with a JSON body against a relative API path.
    async fn post(&self, path: &str, body: Value) -> ApiResult<Value>;

    /// Pushes the same messages to each recipient individually.
    ///
    /// Issues one [`push`](Self::push) per recipient and resolves once every
    /// call has settled. The result always has one entry per recipient, in
    /// input order; one recipient failing does not abort the others.
    async fn push_each(
        &self,
        to: &[String],
        messages: OutgoingMessages,
        notification_disabled: bool,
    ) -> Vec<ApiResult<Value>> {
        let sends = to
            .iter()
            .map(|recipient| self.push(recipient, messages.clone(), notification_disabled));
        future::join_all(sends).await
    }
}
