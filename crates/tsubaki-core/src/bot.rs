//! Bot assembly: configuration, verifier, dispatcher, and client in one place.
//!
//! A [`Bot`] wires the webhook pipeline together. Handlers are registered
//! up front with [`Bot::on`]; after that the bot is shared immutably (for
//! example behind an `Arc` inside an HTTP server) and fed request bodies
//! through the `parse` methods. Outbound API operations are exposed as
//! passthroughs to the bot's [`ActionClient`](crate::action::ActionClient).
//!
//! ```rust,ignore
//! use tsubaki_core::{Bot, ChannelConfig, Classification};
//!
//! let mut bot = Bot::new(config, client);
//! bot.on(Classification::Message, |event| {
//!     println!("got a message at {}", event.timestamp);
//! });
//! let bot = std::sync::Arc::new(bot);
//! ```

use serde_json::Value;

use crate::action::{ApiResult, BoxedActionClient};
use crate::config::ChannelConfig;
use crate::dispatch::{Classification, Dispatcher};
use crate::enrich::EnrichedEvent;
use crate::model::{OutgoingMessages, UserProfile};
use crate::parse::{self, WebhookPayload};
use crate::verify::SignatureVerifier;

/// A configured messaging bot: inbound pipeline plus outbound surface.
pub struct Bot {
    config: ChannelConfig,
    verifier: Option<SignatureVerifier>,
    dispatcher: Dispatcher,
    client: BoxedActionClient,
}

impl Bot {
    /// Creates a bot from a channel configuration and an action client.
    ///
    /// A signature verifier is built when the configuration carries a
    /// channel secret; without one, [`Bot::verify`] always fails.
    pub fn new(config: ChannelConfig, client: BoxedActionClient) -> Self {
        let verifier = config
            .channel_secret
            .as_deref()
            .map(SignatureVerifier::new);
        Self {
            config,
            verifier,
            dispatcher: Dispatcher::new(),
            client,
        }
    }

    /// The channel configuration this bot was built from.
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// The outbound client this bot calls the platform with.
    pub fn client(&self) -> &BoxedActionClient {
        &self.client
    }

    /// The signature verifier, present when a channel secret is configured.
    pub fn verifier(&self) -> Option<&SignatureVerifier> {
        self.verifier.as_ref()
    }

    // =========================================================================
    // Inbound pipeline
    // =========================================================================

    /// Registers a handler for a classification.
    ///
    /// Registration happens before the bot starts serving; the registry is
    /// read-only during dispatch. Returns `&mut Self` for chaining.
    pub fn on(
        &mut self,
        classification: Classification,
        handler: impl Fn(&EnrichedEvent) + Send + Sync + 'static,
    ) -> &mut Self {
        self.dispatcher.on(classification, handler);
        self
    }

    /// Checks a webhook body against its signature header value.
    ///
    /// Returns `false` when no channel secret is configured.
    pub fn verify(&self, body: &[u8], signature: &str) -> bool {
        match &self.verifier {
            Some(verifier) => verifier.verify(body, signature),
            None => false,
        }
    }

    /// Signs a body the way the platform would, for tests and tooling.
    ///
    /// Returns `None` when no channel secret is configured.
    pub fn sign(&self, body: &[u8]) -> Option<String> {
        self.verifier.as_ref().map(|verifier| verifier.sign(body))
    }

    /// Dispatches the events of an already-decoded payload in order.
    ///
    /// Returns the number of events that reached the dispatcher.
    pub fn parse(&self, payload: WebhookPayload) -> usize {
        parse::parse_payload(&self.dispatcher, &self.client, payload)
    }

    /// Dispatches the events of a payload given as a JSON value.
    pub fn parse_value(&self, body: Value) -> usize {
        parse::parse_value(&self.dispatcher, &self.client, body)
    }

    /// Dispatches the events of a payload given as raw JSON bytes.
    pub fn parse_slice(&self, body: &[u8]) -> usize {
        parse::parse_slice(&self.dispatcher, &self.client, body)
    }

    // =========================================================================
    // Outbound surface
    // =========================================================================

    /// Replies to a reply token.
    ///
    /// An empty message list resolves `Ok` without any outbound call.
    pub async fn reply(
        &self,
        reply_token: &str,
        messages: impl Into<OutgoingMessages> + Send,
    ) -> ApiResult<Value> {
        let messages = messages.into();
        if messages.is_empty() {
            return Ok(Value::Null);
        }
        self.client.reply(reply_token, messages, false).await
    }

    /// Pushes messages to a single recipient.
    pub async fn push(
        &self,
        to: &str,
        messages: impl Into<OutgoingMessages> + Send,
    ) -> ApiResult<Value> {
        self.client.push(to, messages.into(), false).await
    }

    /// Pushes messages to each recipient independently.
    ///
    /// One outbound call is made per recipient; the returned vector has one
    /// settled result per recipient, in input order.
    pub async fn push_each(
        &self,
        to: &[String],
        messages: impl Into<OutgoingMessages> + Send,
    ) -> Vec<ApiResult<Value>> {
        self.client.push_each(to, messages.into(), false).await
    }

    /// Sends messages to up to 500 recipients in one call.
    pub async fn multicast(
        &self,
        to: &[String],
        messages: impl Into<OutgoingMessages> + Send,
    ) -> ApiResult<Value> {
        self.client.multicast(to, messages.into(), false).await
    }

    /// Fetches a user's profile.
    pub async fn user_profile(&self, user_id: &str) -> ApiResult<UserProfile> {
        self.client.user_profile(user_id).await
    }

    /// Fetches the binary content of a message.
    pub async fn message_content(&self, message_id: &str) -> ApiResult<Vec<u8>> {
        self.client.message_content(message_id).await
    }

    /// Leaves a group chat.
    pub async fn leave_group(&self, group_id: &str) -> ApiResult<Value> {
        self.client.leave_group(group_id).await
    }

    /// Leaves a room chat.
    pub async fn leave_room(&self, room_id: &str) -> ApiResult<Value> {
        self.client.leave_room(room_id).await
    }

    /// Issues a GET against an arbitrary API path.
    pub async fn get(&self, path: &str) -> ApiResult<Value> {
        self.client.get(path).await
    }

    /// Issues a POST against an arbitrary API path.
    pub async fn post(&self, path: &str, body: Value) -> ApiResult<Value> {
        self.client.post(path, body).await
    }
}

impl std::fmt::Debug for Bot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("channel_id", &self.config.channel_id)
            .field("verify", &self.config.verify)
            .field("has_verifier", &self.verifier.is_some())
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
