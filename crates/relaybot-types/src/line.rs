//! LINE Messaging API wire types.
//!
//! Inbound: the webhook batch (`POST /callback`). Only text message events are
//! modeled in detail; every other event or message type deserializes to an
//! `Unsupported` variant so a batch never fails because of content we ignore.
//!
//! Outbound: the reply request body for `/v2/bot/message/reply`.

use serde::{Deserialize, Serialize};

/// A webhook delivery: one destination, zero or more events.
///
/// `events` is required; a body without it is not a webhook delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: Option<String>,
    pub events: Vec<WebhookEvent>,
}

/// A single webhook event, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebhookEvent {
    Message(MessageEvent),
    #[serde(other)]
    Unsupported,
}

/// A `message` event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEvent {
    /// Absent on events delivered in standby mode.
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub source: Option<EventSource>,
    pub message: EventMessage,
}

impl MessageEvent {
    /// The sender's user id, if the platform supplied one.
    pub fn user_id(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.user_id.as_deref())
    }

    /// The text body, if this is a text message.
    pub fn text(&self) -> Option<&str> {
        match &self.message {
            EventMessage::Text { text } => Some(text),
            EventMessage::Unsupported => None,
        }
    }
}

/// The message body of a `message` event, tagged by `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventMessage {
    Text {
        #[serde(default)]
        text: String,
    },
    #[serde(other)]
    Unsupported,
}

/// Where an event came from. Group and room sources carry the sender's
/// `userId` too when the user has consented to share it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Body of a reply API call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    pub reply_token: String,
    pub messages: Vec<OutboundMessage>,
}

/// A message sent back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
    Text { text: String },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        OutboundMessage::Text { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "destination": "Uxxxxxxxx",
        "events": [
            {
                "type": "message",
                "mode": "active",
                "timestamp": 1462629479859,
                "webhookEventId": "01FZ74A0TDDPYRVKNK77XKC3ZR",
                "deliveryContext": {"isRedelivery": false},
                "replyToken": "nHuyWiB7yP5Zw52FIkcQobQuGDXCTA",
                "source": {"type": "user", "userId": "U4af4980629"},
                "message": {"id": "444573844083572737", "type": "text", "text": " hello "}
            },
            {
                "type": "message",
                "replyToken": "b60d432864f44d079f6d8efe86cf404b",
                "source": {"type": "group", "groupId": "Ca56f94637c", "userId": "U4af4980629"},
                "message": {"id": "325708", "type": "sticker", "packageId": "1", "stickerId": "1"}
            },
            {
                "type": "follow",
                "replyToken": "85cbe770fa8b4f45bbe077b1d4be4a36",
                "source": {"type": "user", "userId": "U4af4980629"}
            }
        ]
    }"#;

    #[test]
    fn test_parse_mixed_batch() {
        let payload: WebhookPayload = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(payload.destination.as_deref(), Some("Uxxxxxxxx"));
        assert_eq!(payload.events.len(), 3);

        let WebhookEvent::Message(first) = &payload.events[0] else {
            panic!("expected message event");
        };
        assert_eq!(
            first.reply_token.as_deref(),
            Some("nHuyWiB7yP5Zw52FIkcQobQuGDXCTA")
        );
        assert_eq!(first.user_id(), Some("U4af4980629"));
        assert_eq!(first.text(), Some(" hello "));

        let WebhookEvent::Message(sticker) = &payload.events[1] else {
            panic!("expected message event");
        };
        assert!(sticker.text().is_none());
        assert_eq!(sticker.user_id(), Some("U4af4980629"));

        assert!(matches!(payload.events[2], WebhookEvent::Unsupported));
    }

    #[test]
    fn test_parse_empty_verification_batch() {
        // The console's "Verify" button sends an empty event list.
        let payload: WebhookPayload =
            serde_json::from_str(r#"{"destination":"U1","events":[]}"#).unwrap();
        assert!(payload.events.is_empty());
    }

    #[test]
    fn test_parse_rejects_body_without_events() {
        assert!(serde_json::from_str::<WebhookPayload>("{}").is_err());
        assert!(serde_json::from_str::<WebhookPayload>(r#"{"destination":"U1"}"#).is_err());
    }

    #[test]
    fn test_parse_standby_message_without_reply_token() {
        let payload: WebhookPayload = serde_json::from_str(
            r#"{"destination":"U1","events":[
                {"type":"message","mode":"standby","source":{"type":"user","userId":"U2"},
                 "message":{"id":"1","type":"text","text":"hi"}}
            ]}"#,
        )
        .unwrap();
        let WebhookEvent::Message(event) = &payload.events[0] else {
            panic!("expected message event");
        };
        assert!(event.reply_token.is_none());
        assert_eq!(event.text(), Some("hi"));
    }

    #[test]
    fn test_reply_request_shape() {
        let body = ReplyRequest {
            reply_token: "tok".to_string(),
            messages: vec![OutboundMessage::text("hi!")],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "replyToken": "tok",
                "messages": [{"type": "text", "text": "hi!"}]
            })
        );
    }
}
