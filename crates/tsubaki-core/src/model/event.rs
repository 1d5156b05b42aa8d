//! LINE webhook event types.
//!
//! A webhook delivery carries a batch of events. Every event shares a small
//! set of common fields (`replyToken`, `timestamp`, `source`) and adds a
//! type-specific payload discriminated by the platform's `type` field.
//!
//! # Event Hierarchy
//!
//! ```text
//! WebhookEvent { reply_token?, timestamp, source? }
//! └── EventKind                         ← discriminated by "type"
//!     ├── Message { message }           ← content discriminated by its own "type"
//!     ├── Follow / Unfollow
//!     ├── Join / Leave
//!     ├── Postback { postback }
//!     ├── Beacon { beacon }
//!     ├── AccountLink { link }
//!     ├── MemberJoined / MemberLeft { members }
//!     └── Unknown                       ← any type this crate does not model
//! ```
//!
//! Deserialization is tolerant: fields this crate does not model are ignored,
//! and an unrecognized `type` maps to [`EventKind::Unknown`] instead of
//! failing the whole batch.

use serde::{Deserialize, Serialize};

use crate::model::message::{MessageContent, MessageKind};

/// A single inbound webhook event.
///
/// Common fields live here; the type-specific payload is in [`kind`](Self::kind).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    /// Token permitting exactly one reply to this event.
    ///
    /// Absent for event types that cannot be replied to (e.g. unfollow).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_token: Option<String>,
    /// Event time in epoch milliseconds.
    pub timestamp: i64,
    /// Where the event originated (user, group, or room chat).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    /// The type-specific payload.
    #[serde(flatten)]
    pub kind: EventKind,
}

impl WebhookEvent {
    /// Returns the platform name of this event's type.
    pub fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    /// Returns the message content if this is a message event.
    pub fn message(&self) -> Option<&MessageContent> {
        match &self.kind {
            EventKind::Message { message } => Some(message),
            _ => None,
        }
    }

    /// Returns the message subtype if this is a message event.
    pub fn message_kind(&self) -> Option<MessageKind> {
        self.message().map(MessageContent::kind)
    }
}

/// The type-specific payload of a webhook event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EventKind {
    /// A user sent a message.
    Message {
        /// The message content, discriminated by its own `type` field.
        message: MessageContent,
    },
    /// A user added the bot as a friend, or unblocked it.
    Follow,
    /// A user blocked the bot. Carries no reply token.
    Unfollow,
    /// The bot joined a group or room.
    Join,
    /// The bot left a group or room. Carries no reply token.
    Leave,
    /// A user triggered a postback action on a rich control.
    Postback {
        /// The postback payload.
        postback: Postback,
    },
    /// A user entered the range of a beacon bound to the channel.
    Beacon {
        /// The beacon payload.
        beacon: Beacon,
    },
    /// An account-link flow completed.
    AccountLink {
        /// The link outcome.
        link: AccountLink,
    },
    /// Users joined a group or room the bot is in.
    MemberJoined {
        /// The joined members.
        joined: MemberList,
    },
    /// Users left a group or room the bot is in.
    MemberLeft {
        /// The departed members.
        left: MemberList,
    },
    /// Any event type this crate does not model.
    #[serde(other)]
    Unknown,
}

impl EventKind {
    /// Returns the platform name of this event type.
    pub fn event_type(&self) -> &'static str {
        match self {
            EventKind::Message { .. } => "message",
            EventKind::Follow => "follow",
            EventKind::Unfollow => "unfollow",
            EventKind::Join => "join",
            EventKind::Leave => "leave",
            EventKind::Postback { .. } => "postback",
            EventKind::Beacon { .. } => "beacon",
            EventKind::AccountLink { .. } => "accountLink",
            EventKind::MemberJoined { .. } => "memberJoined",
            EventKind::MemberLeft { .. } => "memberLeft",
            EventKind::Unknown => "unknown",
        }
    }
}

/// The chat an event originated from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Source {
    /// A one-to-one chat with a user.
    #[serde(rename_all = "camelCase")]
    User {
        /// The user's ID.
        user_id: String,
    },
    /// A group chat.
    #[serde(rename_all = "camelCase")]
    Group {
        /// The group's ID.
        group_id: String,
        /// The acting user's ID, when the platform discloses it.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_id: Option<String>,
    },
    /// A multi-person room chat.
    #[serde(rename_all = "camelCase")]
    Room {
        /// The room's ID.
        room_id: String,
        /// The acting user's ID, when the platform discloses it.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_id: Option<String>,
    },
}

impl Source {
    /// Returns the acting user's ID, if present.
    pub fn user_id(&self) -> Option<&str> {
        match self {
            Source::User { user_id } => Some(user_id),
            Source::Group { user_id, .. } | Source::Room { user_id, .. } => user_id.as_deref(),
        }
    }

    /// Returns the group ID for group sources.
    pub fn group_id(&self) -> Option<&str> {
        match self {
            Source::Group { group_id, .. } => Some(group_id),
            _ => None,
        }
    }

    /// Returns the room ID for room sources.
    pub fn room_id(&self) -> Option<&str> {
        match self {
            Source::Room { room_id, .. } => Some(room_id),
            _ => None,
        }
    }
}

/// Payload of a postback event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Postback {
    /// The postback data string defined by the action that triggered it.
    pub data: String,
    /// Datetime-picker parameters, when the action was a datetime picker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<PostbackParams>,
}

/// Datetime-picker selections attached to a postback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostbackParams {
    /// Selected date (`YYYY-MM-dd`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Selected time (`HH:mm`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Selected datetime (`YYYY-MM-ddTHH:mm`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
}

/// Payload of a beacon event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beacon {
    /// Hardware ID of the beacon.
    pub hwid: String,
    /// Beacon event type ("enter", "leave", or "banner").
    #[serde(rename = "type")]
    pub beacon_type: String,
    /// Device message in hex, for beacons that broadcast one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dm: Option<String>,
}

/// Payload of an account-link event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountLink {
    /// "ok" if the link succeeded, "failed" otherwise.
    pub result: String,
    /// The nonce issued during the link flow.
    pub nonce: String,
}

/// Members referenced by a member-joined or member-left event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberList {
    /// The affected members, each a user source.
    pub members: Vec<Source>,
}
