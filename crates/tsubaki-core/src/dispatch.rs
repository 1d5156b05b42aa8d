//! Event classification and handler dispatch.
//!
//! This module provides the [`Dispatcher`], which routes enriched events to
//! registered handlers by [`Classification`].
//!
//! # Classification-based Dispatch
//!
//! Every event classifies as its event type. Message events additionally
//! classify as their message subtype, so a single text message can reach
//! both a generic `Message` handler and a `MessageKind(Text)` handler.
//! When an event is dispatched:
//!
//! 1. Handlers registered for the event's classification run in
//!    registration order
//! 2. For message events, handlers for the message subtype run next,
//!    also in registration order
//! 3. An event with no registered handler is dropped silently
//!
//! ```rust,ignore
//! use tsubaki_core::{Classification, Dispatcher, MessageKind};
//!
//! let mut dispatcher = Dispatcher::new();
//!
//! // Runs for every message, regardless of subtype
//! dispatcher.on(Classification::Message, |event| {
//!     println!("message at {}", event.timestamp);
//! });
//!
//! // Runs for text messages only, after the generic handler
//! dispatcher.on(Classification::MessageKind(MessageKind::Text), |event| {
//!     println!("text: {:?}", event.message());
//! });
//! ```

use std::collections::HashMap;

use tracing::{Level, debug, span};

use crate::enrich::EnrichedEvent;
use crate::model::{EventKind, MessageKind, WebhookEvent};

/// A dispatch key: an event type, or a message subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Any message event, regardless of content subtype.
    Message,
    /// A message event with the given content subtype.
    MessageKind(MessageKind),
    /// A user added the bot as a friend, or unblocked it.
    Follow,
    /// A user blocked the bot.
    Unfollow,
    /// The bot joined a group or room.
    Join,
    /// The bot left a group or room.
    Leave,
    /// A user triggered a postback action.
    Postback,
    /// A user entered the range of a beacon.
    Beacon,
    /// An account link completed.
    AccountLink,
    /// Users joined a group or room the bot is in.
    MemberJoined,
    /// Users left a group or room the bot is in.
    MemberLeft,
    /// An event type this crate does not model.
    Unknown,
}

impl Classification {
    /// The classification of `event`'s type.
    ///
    /// Message events classify as [`Classification::Message`] here; their
    /// subtype key is derived separately during dispatch.
    pub fn of(event: &WebhookEvent) -> Classification {
        match &event.kind {
            EventKind::Message { .. } => Classification::Message,
            EventKind::Follow => Classification::Follow,
            EventKind::Unfollow => Classification::Unfollow,
            EventKind::Join => Classification::Join,
            EventKind::Leave => Classification::Leave,
            EventKind::Postback { .. } => Classification::Postback,
            EventKind::Beacon { .. } => Classification::Beacon,
            EventKind::AccountLink { .. } => Classification::AccountLink,
            EventKind::MemberJoined { .. } => Classification::MemberJoined,
            EventKind::MemberLeft { .. } => Classification::MemberLeft,
            EventKind::Unknown => Classification::Unknown,
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Message => f.write_str("message"),
            Classification::MessageKind(kind) => write!(f, "message.{kind}"),
            Classification::Follow => f.write_str("follow"),
            Classification::Unfollow => f.write_str("unfollow"),
            Classification::Join => f.write_str("join"),
            Classification::Leave => f.write_str("leave"),
            Classification::Postback => f.write_str("postback"),
            Classification::Beacon => f.write_str("beacon"),
            Classification::AccountLink => f.write_str("accountLink"),
            Classification::MemberJoined => f.write_str("memberJoined"),
            Classification::MemberLeft => f.write_str("memberLeft"),
            Classification::Unknown => f.write_str("unknown"),
        }
    }
}

/// A registered event handler.
pub type EventHandler = Box<dyn Fn(&EnrichedEvent) + Send + Sync>;

/// Routes enriched events to handlers by classification.
///
/// Handlers for the same classification run in the order they were
/// registered. Message events are delivered twice: first to the generic
/// [`Classification::Message`] handlers, then to the handlers for the
/// message's subtype.
///
/// Handlers run synchronously on the dispatching task; a handler that
/// needs to await should spawn its own task.
#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<Classification, Vec<EventHandler>>,
}

impl Dispatcher {
    /// Creates a new, empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers a handler for a classification.
    pub fn on(
        &mut self,
        classification: Classification,
        handler: impl Fn(&EnrichedEvent) + Send + Sync + 'static,
    ) {
        self.handlers
            .entry(classification)
            .or_default()
            .push(Box::new(handler));
    }

    /// Returns the total number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    /// Dispatches an event to the handlers registered for it.
    ///
    /// Returns `true` if at least one handler ran, `false` if the event
    /// was dropped for lack of one.
    pub fn dispatch(&self, event: &EnrichedEvent) -> bool {
        let classification = Classification::of(event.event());
        let span = span!(Level::DEBUG, "dispatch", event = %classification);
        let _enter = span.enter();

        let mut any_handled = self.emit(classification, event);
        if let Some(kind) = event.event().message_kind() {
            any_handled |= self.emit(Classification::MessageKind(kind), event);
        }

        if !any_handled {
            debug!("no handler registered, dropping event");
        }
        any_handled
    }

    fn emit(&self, classification: Classification, event: &EnrichedEvent) -> bool {
        let Some(handlers) = self.handlers.get(&classification) else {
            return false;
        };
        for handler in handlers {
            handler(event);
        }
        !handlers.is_empty()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handler_count", &self.handler_count())
            .finish()
    }
}
