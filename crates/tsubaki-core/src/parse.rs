//! Webhook payload parsing: the pipeline entry point.
//!
//! Parsing takes the decoded body of a webhook request, walks its event
//! list in order, and drives each event through enrichment and dispatch.
//! Verification is not performed here; the transport boundary checks the
//! signature before the body reaches this module, and trusted callers may
//! feed payloads in directly.
//!
//! A payload without events is a no-op. An event that cannot be decoded
//! is logged and skipped, and the remaining events still go out in order.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::action::BoxedActionClient;
use crate::dispatch::Dispatcher;
use crate::enrich::enrich;
use crate::model::WebhookEvent;

/// The top-level body of a webhook request.
///
/// Events are kept as raw JSON values so that one undecodable event does
/// not take down the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// The bot user ID the payload was delivered to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// The events in delivery order.
    #[serde(default)]
    pub events: Vec<Value>,
}

/// Parses a decoded payload and dispatches its events in order.
///
/// Returns the number of events that reached the dispatcher. Events that
/// fail to decode are logged and skipped; the rest are still dispatched.
pub fn parse_payload(
    dispatcher: &Dispatcher,
    client: &BoxedActionClient,
    payload: WebhookPayload,
) -> usize {
    let total = payload.events.len();
    let mut dispatched = 0;

    for (index, raw) in payload.events.into_iter().enumerate() {
        let event: WebhookEvent = match serde_json::from_value(raw) {
            Ok(event) => event,
            Err(err) => {
                warn!(index, error = %err, "skipping undecodable webhook event");
                continue;
            }
        };
        dispatcher.dispatch(&enrich(event, client));
        dispatched += 1;
    }

    if total > 0 {
        debug!(dispatched, total, "webhook payload processed");
    }
    dispatched
}

/// Parses a payload from a JSON value.
///
/// A `null` value is treated as an absent payload and ignored without
/// logging; any other undecodable value is logged and ignored.
pub fn parse_value(dispatcher: &Dispatcher, client: &BoxedActionClient, body: Value) -> usize {
    if body.is_null() {
        return 0;
    }
    match serde_json::from_value(body) {
        Ok(payload) => parse_payload(dispatcher, client, payload),
        Err(err) => {
            warn!(error = %err, "discarding undecodable webhook payload");
            0
        }
    }
}

/// Parses a payload from raw JSON bytes, as received on the wire.
pub fn parse_slice(dispatcher: &Dispatcher, client: &BoxedActionClient, body: &[u8]) -> usize {
    match serde_json::from_slice(body) {
        Ok(payload) => parse_payload(dispatcher, client, payload),
        Err(err) => {
            warn!(error = %err, "discarding undecodable webhook payload");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::action::{ActionClient, ApiResult};
    use crate::dispatch::Classification;
    use crate::model::{MessageKind, OutgoingMessages, UserProfile};

    struct NullClient;

    #[async_trait]
    impl ActionClient for NullClient {
        async fn reply(
            &self,
            _reply_token: &str,
            _messages: OutgoingMessages,
            _notification_disabled: bool,
        ) -> ApiResult<Value> {
            Ok(Value::Null)
        }

        async fn push(
            &self,
            _to: &str,
            _messages: OutgoingMessages,
            _notification_disabled: bool,
        ) -> ApiResult<Value> {
            Ok(Value::Null)
        }

        async fn multicast(
            &self,
            _to: &[String],
            _messages: OutgoingMessages,
            _notification_disabled: bool,
        ) -> ApiResult<Value> {
            Ok(Value::Null)
        }

        async fn user_profile(&self, user_id: &str) -> ApiResult<UserProfile> {
            Ok(UserProfile {
                display_name: String::new(),
                user_id: user_id.to_string(),
                picture_url: None,
                status_message: None,
            })
        }

        async fn message_content(&self, _message_id: &str) -> ApiResult<Vec<u8>> {
            Ok(Vec::new())
        }

        async fn leave_group(&self, _group_id: &str) -> ApiResult<Value> {
            Ok(Value::Null)
        }

        async fn leave_room(&self, _room_id: &str) -> ApiResult<Value> {
            Ok(Value::Null)
        }

        async fn get(&self, _path: &str) -> ApiResult<Value> {
            Ok(Value::Null)
        }

        async fn post(&self, _path: &str, _body: Value) -> ApiResult<Value> {
            Ok(Value::Null)
        }
    }

    fn null_client() -> BoxedActionClient {
        Arc::new(NullClient)
    }

    fn text_event(id: &str, text: &str) -> Value {
        json!({
            "replyToken": "r",
            "type": "message",
            "timestamp": 1462629479859u64,
            "source": { "type": "user", "userId": "U1" },
            "message": { "id": id, "type": "text", "text": text }
        })
    }

    #[test]
    fn test_events_dispatch_in_payload_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();
        let log = Arc::clone(&seen);
        dispatcher.on(Classification::Message, move |event| {
            log.lock()
                .unwrap()
                .push(event.message().unwrap().as_text().unwrap().to_string());
        });

        let payload = json!({
            "events": [
                text_event("1", "first"),
                text_event("2", "second"),
                text_event("3", "third")
            ]
        });
        let dispatched = parse_value(&dispatcher, &null_client(), payload);

        assert_eq!(dispatched, 3);
        assert_eq!(*seen.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_text_event_reaches_message_and_text_but_not_follow() {
        let hits = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();

        let log = Arc::clone(&hits);
        dispatcher.on(Classification::Message, move |_| {
            log.lock().unwrap().push("message");
        });
        let log = Arc::clone(&hits);
        dispatcher.on(Classification::MessageKind(MessageKind::Text), move |_| {
            log.lock().unwrap().push("message.text");
        });
        dispatcher.on(Classification::Follow, |_| {
            panic!("follow handler must not see a message event");
        });

        parse_value(
            &dispatcher,
            &null_client(),
            json!({ "events": [text_event("1", "hi")] }),
        );

        assert_eq!(*hits.lock().unwrap(), vec!["message", "message.text"]);
    }

    #[test]
    fn test_absent_payload_or_events_is_a_no_op() {
        let dispatcher = Dispatcher::new();
        let client = null_client();

        assert_eq!(parse_value(&dispatcher, &client, Value::Null), 0);
        assert_eq!(parse_value(&dispatcher, &client, json!({})), 0);
        assert_eq!(parse_value(&dispatcher, &client, json!({ "events": [] })), 0);
    }

    #[test]
    fn test_malformed_body_is_a_no_op() {
        let dispatcher = Dispatcher::new();
        let client = null_client();

        assert_eq!(parse_slice(&dispatcher, &client, b"not json"), 0);
        assert_eq!(parse_slice(&dispatcher, &client, b""), 0);
        assert_eq!(
            parse_value(&dispatcher, &client, json!({ "events": "nope" })),
            0
        );
    }

    #[test]
    fn test_undecodable_event_is_skipped_and_rest_dispatched() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = Dispatcher::new();
        let log = Arc::clone(&seen);
        dispatcher.on(Classification::Message, move |event| {
            log.lock()
                .unwrap()
                .push(event.message().unwrap().id().to_string());
        });

        // The middle event has no timestamp and fails to decode.
        let payload = json!({
            "events": [
                text_event("1", "a"),
                { "type": "message", "message": { "id": "x", "type": "text", "text": "b" } },
                text_event("3", "c")
            ]
        });
        let dispatched = parse_value(&dispatcher, &null_client(), payload);

        assert_eq!(dispatched, 2);
        assert_eq!(*seen.lock().unwrap(), vec!["1", "3"]);
    }

    #[test]
    fn test_unrecognized_event_type_dispatches_as_unknown() {
        let hits = Arc::new(Mutex::new(0));
        let mut dispatcher = Dispatcher::new();
        let counter = Arc::clone(&hits);
        dispatcher.on(Classification::Unknown, move |_| {
            *counter.lock().unwrap() += 1;
        });

        let payload = json!({
            "events": [{ "type": "videoPlayComplete", "timestamp": 1 }]
        });
        assert_eq!(parse_value(&dispatcher, &null_client(), payload), 1);
        assert_eq!(*hits.lock().unwrap(), 1);
    }

    #[test]
    fn test_parse_slice_accepts_wire_bytes() {
        let seen = Arc::new(Mutex::new(0));
        let mut dispatcher = Dispatcher::new();
        let counter = Arc::clone(&seen);
        dispatcher.on(Classification::Message, move |_| {
            *counter.lock().unwrap() += 1;
        });

        let body = serde_json::to_vec(&json!({ "events": [text_event("1", "hi")] })).unwrap();
        assert_eq!(parse_slice(&dispatcher, &null_client(), &body), 1);
        assert_eq!(*seen.lock().unwrap(), 1);
    }
}
