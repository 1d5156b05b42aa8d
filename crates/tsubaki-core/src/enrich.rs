//! Event enrichment: binding outbound capabilities to inbound events.
//!
//! Enrichment inspects an event's identifying fields and attaches a bound
//! action for each one that is present:
//!
//! - a reply token yields a [`ReplyAction`],
//! - a source carrying a user ID yields a [`ProfileAction`],
//! - a message ID yields a [`ContentAction`],
//! - a group or room source yields a [`LeaveAction`].
//!
//! Attachment is strictly additive. The embedded [`WebhookEvent`] is stored
//! untouched, and an absent field means an absent capability, never a
//! capability that always fails.

use std::ops::Deref;
use std::sync::Arc;

use serde_json::Value;

use crate::action::{ApiResult, BoxedActionClient};
use crate::model::{OutgoingMessages, Source, UserProfile, WebhookEvent};

/// An inbound event plus the outbound actions it can perform.
///
/// Dereferences to the underlying [`WebhookEvent`], so handlers can read
/// event fields directly.
#[derive(Clone)]
pub struct EnrichedEvent {
    event: WebhookEvent,
    reply: Option<ReplyAction>,
    profile: Option<ProfileAction>,
    content: Option<ContentAction>,
    leave: Option<LeaveAction>,
}

impl EnrichedEvent {
    /// Returns the underlying event.
    pub fn event(&self) -> &WebhookEvent {
        &self.event
    }

    /// Consumes the enrichment and returns the underlying event.
    pub fn into_event(self) -> WebhookEvent {
        self.event
    }

    /// The reply action, present when the event carries a reply token.
    pub fn reply(&self) -> Option<&ReplyAction> {
        self.reply.as_ref()
    }

    /// The profile action, present when the source identifies a user.
    pub fn profile(&self) -> Option<&ProfileAction> {
        self.profile.as_ref()
    }

    /// The content action, present for message events.
    pub fn content(&self) -> Option<&ContentAction> {
        self.content.as_ref()
    }

    /// The leave action, present for group and room sources.
    pub fn leave(&self) -> Option<&LeaveAction> {
        self.leave.as_ref()
    }
}

impl Deref for EnrichedEvent {
    type Target = WebhookEvent;

    fn deref(&self) -> &WebhookEvent {
        &self.event
    }
}

impl std::fmt::Debug for EnrichedEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichedEvent")
            .field("event", &self.event)
            .field("has_reply", &self.reply.is_some())
            .field("has_profile", &self.profile.is_some())
            .field("has_content", &self.content.is_some())
            .field("has_leave", &self.leave.is_some())
            .finish()
    }
}

/// Attaches bound actions to `event` based on which fields are present.
pub fn enrich(event: WebhookEvent, client: &BoxedActionClient) -> EnrichedEvent {
    let reply = event.reply_token.clone().map(|token| ReplyAction {
        client: Arc::clone(client),
        token,
    });
    let profile = event
        .source
        .as_ref()
        .and_then(Source::user_id)
        .map(|user_id| ProfileAction {
            client: Arc::clone(client),
            user_id: user_id.to_string(),
        });
    let content = event.message().map(|message| ContentAction {
        client: Arc::clone(client),
        message_id: message.id().to_string(),
    });
    let leave = event
        .source
        .as_ref()
        .and_then(|source| match source {
            Source::Group { group_id, .. } => Some(LeaveScope::Group(group_id.clone())),
            Source::Room { room_id, .. } => Some(LeaveScope::Room(room_id.clone())),
            Source::User { .. } => None,
        })
        .map(|scope| LeaveAction {
            client: Arc::clone(client),
            scope,
        });

    EnrichedEvent {
        event,
        reply,
        profile,
        content,
        leave,
    }
}

/// Replies to the event that produced this action.
///
/// A reply token is single-use and short-lived; send once, promptly.
#[derive(Clone)]
pub struct ReplyAction {
    client: BoxedActionClient,
    token: String,
}

impl ReplyAction {
    /// The reply token this action is bound to.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Sends a reply with notifications enabled.
    pub async fn send(&self, messages: impl Into<OutgoingMessages> + Send) -> ApiResult<Value> {
        self.send_with(messages, false).await
    }

    /// Sends a reply, optionally muting the recipient's push notification.
    ///
    /// An empty message list resolves `Ok` without any outbound call.
    pub async fn send_with(
        &self,
        messages: impl Into<OutgoingMessages> + Send,
        notification_disabled: bool,
    ) -> ApiResult<Value> {
        let messages = messages.into();
        if messages.is_empty() {
            return Ok(Value::Null);
        }
        self.client
            .reply(&self.token, messages, notification_disabled)
            .await
    }
}

impl std::fmt::Debug for ReplyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplyAction")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

/// Fetches the profile of the user who triggered the event.
#[derive(Clone)]
pub struct ProfileAction {
    client: BoxedActionClient,
    user_id: String,
}

impl ProfileAction {
    /// The user ID this action is bound to.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Fetches the user's profile.
    pub async fn fetch(&self) -> ApiResult<UserProfile> {
        self.client.user_profile(&self.user_id).await
    }
}

impl std::fmt::Debug for ProfileAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileAction")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

/// Fetches the binary content of the message that produced this action.
#[derive(Clone)]
pub struct ContentAction {
    client: BoxedActionClient,
    message_id: String,
}

impl ContentAction {
    /// The message ID this action is bound to.
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Fetches the message bytes from the content endpoint.
    pub async fn fetch(&self) -> ApiResult<Vec<u8>> {
        self.client.message_content(&self.message_id).await
    }
}

impl std::fmt::Debug for ContentAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentAction")
            .field("message_id", &self.message_id)
            .finish_non_exhaustive()
    }
}

/// The chat a [`LeaveAction`] would leave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveScope {
    /// A group chat, by group ID.
    Group(String),
    /// A room chat, by room ID.
    Room(String),
}

/// Makes the bot leave the group or room the event came from.
#[derive(Clone)]
pub struct LeaveAction {
    client: BoxedActionClient,
    scope: LeaveScope,
}

impl LeaveAction {
    /// The chat this action is bound to.
    pub fn scope(&self) -> &LeaveScope {
        &self.scope
    }

    /// Leaves the chat.
    pub async fn leave(&self) -> ApiResult<Value> {
        match &self.scope {
            LeaveScope::Group(group_id) => self.client.leave_group(group_id).await,
            LeaveScope::Room(room_id) => self.client.leave_room(room_id).await,
        }
    }
}

impl std::fmt::Debug for LeaveAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaveAction")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::action::ActionClient;
    use crate::model::EventKind;

    #[derive(Default)]
    struct RecordingClient {
        replies: Mutex<Vec<(String, usize, bool)>>,
        profile_requests: Mutex<Vec<String>>,
        content_requests: Mutex<Vec<String>>,
        left_groups: Mutex<Vec<String>>,
        left_rooms: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ActionClient for RecordingClient {
        async fn reply(
            &self,
            reply_token: &str,
            messages: OutgoingMessages,
            notification_disabled: bool,
        ) -> ApiResult<Value> {
            self.replies.lock().unwrap().push((
                reply_token.to_string(),
                messages.len(),
                notification_disabled,
            ));
            Ok(Value::Object(Default::default()))
        }

        async fn push(
            &self,
            _to: &str,
            _messages: OutgoingMessages,
            _notification_disabled: bool,
        ) -> ApiResult<Value> {
            Ok(Value::Object(Default::default()))
        }

        async fn multicast(
            &self,
            _to: &[String],
            _messages: OutgoingMessages,
            _notification_disabled: bool,
        ) -> ApiResult<Value> {
            Ok(Value::Object(Default::default()))
        }

        async fn user_profile(&self, user_id: &str) -> ApiResult<UserProfile> {
            self.profile_requests.lock().unwrap().push(user_id.to_string());
            Ok(UserProfile {
                display_name: "Taro".into(),
                user_id: user_id.to_string(),
                picture_url: None,
                status_message: None,
            })
        }

        async fn message_content(&self, message_id: &str) -> ApiResult<Vec<u8>> {
            self.content_requests.lock().unwrap().push(message_id.to_string());
            Ok(vec![0xff, 0xd8])
        }

        async fn leave_group(&self, group_id: &str) -> ApiResult<Value> {
            self.left_groups.lock().unwrap().push(group_id.to_string());
            Ok(Value::Object(Default::default()))
        }

        async fn leave_room(&self, room_id: &str) -> ApiResult<Value> {
            self.left_rooms.lock().unwrap().push(room_id.to_string());
            Ok(Value::Object(Default::default()))
        }

        async fn get(&self, _path: &str) -> ApiResult<Value> {
            Ok(Value::Object(Default::default()))
        }

        async fn post(&self, _path: &str, _body: Value) -> ApiResult<Value> {
            Ok(Value::Object(Default::default()))
        }
    }

    fn recording_client() -> (Arc<RecordingClient>, BoxedActionClient) {
        let client = Arc::new(RecordingClient::default());
        let boxed: BoxedActionClient = client.clone();
        (client, boxed)
    }

    fn text_message_event() -> WebhookEvent {
        serde_json::from_str(
            r#"{
                "replyToken": "nHuyWiB7yP5Zw52FIkcQobQuGDXCTA",
                "type": "message",
                "timestamp": 1462629479859,
                "source": { "type": "user", "userId": "U206d25c2ea6bd87c17655609a1c37cb8" },
                "message": { "id": "325708", "type": "text", "text": "Hello, world" }
            }"#,
        )
        .unwrap()
    }

    fn unfollow_event() -> WebhookEvent {
        serde_json::from_str(
            r#"{
                "type": "unfollow",
                "timestamp": 1462629479859,
                "source": { "type": "user", "userId": "U1" }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_enrichment_is_additive() {
        let (_, client) = recording_client();
        let original = text_message_event();
        let enriched = enrich(original.clone(), &client);
        assert_eq!(enriched.event(), &original);
        assert_eq!(enriched.into_event(), original);
    }

    #[test]
    fn test_capabilities_follow_field_presence() {
        let (_, client) = recording_client();

        let message = enrich(text_message_event(), &client);
        assert!(message.reply().is_some());
        assert!(message.profile().is_some());
        assert!(message.content().is_some());
        assert!(message.leave().is_none());

        let unfollow = enrich(unfollow_event(), &client);
        assert!(unfollow.reply().is_none());
        assert!(unfollow.profile().is_some());
        assert!(unfollow.content().is_none());
        assert!(unfollow.leave().is_none());
    }

    #[test]
    fn test_group_event_gets_leave_but_no_profile_without_user() {
        let (_, client) = recording_client();
        let event: WebhookEvent = serde_json::from_str(
            r#"{
                "replyToken": "r",
                "type": "join",
                "timestamp": 1,
                "source": { "type": "group", "groupId": "G1" }
            }"#,
        )
        .unwrap();
        let enriched = enrich(event, &client);
        assert!(enriched.profile().is_none());
        assert_eq!(
            enriched.leave().unwrap().scope(),
            &LeaveScope::Group("G1".into())
        );
    }

    #[tokio::test]
    async fn test_reply_sends_bound_token() {
        let (recording, client) = recording_client();
        let enriched = enrich(text_message_event(), &client);

        let result = enriched.reply().unwrap().send("Hello, user").await;
        assert!(result.is_ok());

        let replies = recording.replies.lock().unwrap();
        assert_eq!(
            *replies,
            vec![("nHuyWiB7yP5Zw52FIkcQobQuGDXCTA".to_string(), 1, false)]
        );
    }

    #[tokio::test]
    async fn test_empty_reply_is_a_no_op() {
        let (recording, client) = recording_client();
        let enriched = enrich(text_message_event(), &client);

        let result = enriched
            .reply()
            .unwrap()
            .send(OutgoingMessages::new())
            .await;
        assert!(result.is_ok());
        assert!(recording.replies.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_profile_and_content_fetch_bound_ids() {
        let (recording, client) = recording_client();
        let enriched = enrich(text_message_event(), &client);

        let profile = enriched.profile().unwrap().fetch().await.unwrap();
        assert_eq!(profile.user_id, "U206d25c2ea6bd87c17655609a1c37cb8");
        let content = enriched.content().unwrap().fetch().await.unwrap();
        assert_eq!(content, vec![0xff, 0xd8]);

        assert_eq!(
            *recording.profile_requests.lock().unwrap(),
            vec!["U206d25c2ea6bd87c17655609a1c37cb8".to_string()]
        );
        assert_eq!(
            *recording.content_requests.lock().unwrap(),
            vec!["325708".to_string()]
        );
    }

    #[tokio::test]
    async fn test_leave_routes_by_scope() {
        let (recording, client) = recording_client();
        let room_event: WebhookEvent = serde_json::from_str(
            r#"{
                "type": "join",
                "timestamp": 1,
                "source": { "type": "room", "roomId": "R1" }
            }"#,
        )
        .unwrap();
        let enriched = enrich(room_event, &client);
        enriched.leave().unwrap().leave().await.unwrap();

        assert!(recording.left_groups.lock().unwrap().is_empty());
        assert_eq!(*recording.left_rooms.lock().unwrap(), vec!["R1".to_string()]);
    }

    #[test]
    fn test_deref_exposes_event_fields() {
        let (_, client) = recording_client();
        let enriched = enrich(text_message_event(), &client);
        assert_eq!(enriched.timestamp, 1462629479859);
        assert!(matches!(enriched.kind, EventKind::Message { .. }));
    }
}
