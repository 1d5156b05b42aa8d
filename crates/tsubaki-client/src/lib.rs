//! # Tsubaki Client
//!
//! Reqwest-based [`ActionClient`] implementation for the LINE Messaging API.
//!
//! [`ApiClient`] turns the outbound operations of the core pipeline into
//! authenticated REST calls: bearer-token auth, JSON bodies, and the
//! endpoint paths the platform documents. Errors come back as the core's
//! [`ApiError`] without retries or reclassification.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tsubaki_client::ApiClient;
//! use tsubaki_core::{Bot, ChannelConfig};
//!
//! let config = ChannelConfig {
//!     channel_access_token: Some("token".into()),
//!     ..ChannelConfig::default()
//! };
//! let bot = Bot::new(config.clone(), Arc::new(ApiClient::new(&config)));
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::ClientBuilder;
use serde_json::{Value, json};
use tracing::debug;

use tsubaki_core::action::{ActionClient, ApiError, ApiResult};
use tsubaki_core::model::{OutgoingMessages, UserProfile};
use tsubaki_core::ChannelConfig;

/// An HTTP client bound to one channel's access token and API base URL.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
    token: String,
}

impl ApiClient {
    /// Creates a client from a channel configuration.
    ///
    /// A missing access token is tolerated at construction; requests sent
    /// without one will be rejected by the platform.
    pub fn new(config: &ChannelConfig) -> Self {
        let http = ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            http,
            base: config.api_base.trim_end_matches('/').to_string(),
            token: config.channel_access_token.clone().unwrap_or_default(),
        }
    }

    /// The API base URL requests are issued against.
    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    async fn send_get(&self, path: &str) -> ApiResult<reqwest::Response> {
        debug!(path, "sending GET request");
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::check_status(response).await
    }

    async fn send_post(&self, path: &str, body: &Value) -> ApiResult<reqwest::Response> {
        debug!(path, "sending POST request");
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::check_status(response).await
    }

    async fn check_status(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn decode_json(response: reqwest::Response) -> ApiResult<Value> {
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ActionClient for ApiClient {
    async fn reply(
        &self,
        reply_token: &str,
        messages: OutgoingMessages,
        notification_disabled: bool,
    ) -> ApiResult<Value> {
        let body = json!({
            "replyToken": reply_token,
            "messages": messages,
            "notificationDisabled": notification_disabled,
        });
        self.post("/message/reply", body).await
    }

    async fn push(
        &self,
        to: &str,
        messages: OutgoingMessages,
        notification_disabled: bool,
    ) -> ApiResult<Value> {
        let body = json!({
            "to": to,
            "messages": messages,
            "notificationDisabled": notification_disabled,
        });
        self.post("/message/push", body).await
    }

    async fn multicast(
        &self,
        to: &[String],
        messages: OutgoingMessages,
        notification_disabled: bool,
    ) -> ApiResult<Value> {
        let body = json!({
            "to": to,
            "messages": messages,
            "notificationDisabled": notification_disabled,
        });
        self.post("/message/multicast", body).await
    }

    async fn user_profile(&self, user_id: &str) -> ApiResult<UserProfile> {
        let response = self.send_get(&format!("/profile/{user_id}")).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn message_content(&self, message_id: &str) -> ApiResult<Vec<u8>> {
        let response = self
            .send_get(&format!("/message/{message_id}/content"))
            .await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn leave_group(&self, group_id: &str) -> ApiResult<Value> {
        self.post(&format!("/group/{group_id}/leave"), json!({})).await
    }

    async fn leave_room(&self, room_id: &str) -> ApiResult<Value> {
        self.post(&format!("/room/{room_id}/leave"), json!({})).await
    }

    async fn get(&self, path: &str) -> ApiResult<Value> {
        let response = self.send_get(path).await?;
        Self::decode_json(response).await
    }

    async fn post(&self, path: &str, body: Value) -> ApiResult<Value> {
        let response = self.send_post(path, &body).await?;
        Self::decode_json(response).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The access token must not appear in debug output.
        f.debug_struct("ApiClient")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}
