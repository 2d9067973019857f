//! MCP message bus shared by every container
//!
//! The bus is an append-only log. Messages are never edited or removed and
//! their insertion order is the order every reader sees. Retention is
//! unbounded; a long-lived deployment would need a cap.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Creation-ordered message identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{:06}", self.0)
    }
}

/// What a message carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Context,
    Code,
    Request,
    Response,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Context => write!(f, "context"),
            MessageKind::Code => write!(f, "code"),
            MessageKind::Request => write!(f, "request"),
            MessageKind::Response => write!(f, "response"),
        }
    }
}

impl std::str::FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "context" => Ok(MessageKind::Context),
            "code" => Ok(MessageKind::Code),
            "request" => Ok(MessageKind::Request),
            "response" => Ok(MessageKind::Response),
            other => Err(format!("unknown message kind '{}'", other)),
        }
    }
}

/// A published MCP message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpMessage {
    pub id: MessageId,
    pub from: String,
    pub to: String,
    pub kind: MessageKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A message before publication. The bus fills in `id` and `created_at`
/// when they are left empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    pub id: Option<MessageId>,
    pub from: String,
    pub to: String,
    pub kind: MessageKind,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl MessageDraft {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        kind: MessageKind,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            from: from.into(),
            to: to.into(),
            kind,
            content: content.into(),
            created_at: None,
        }
    }
}

/// Criteria for [`MessageBus::filter`]; unset fields match anything
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    pub from: Option<String>,
    pub to: Option<String>,
    pub kind: Option<MessageKind>,
}

impl MessageFilter {
    fn matches(&self, message: &McpMessage) -> bool {
        self.from.as_deref().map_or(true, |f| f == message.from)
            && self.to.as_deref().map_or(true, |t| t == message.to)
            && self.kind.map_or(true, |k| k == message.kind)
    }
}

/// Append-only store of MCP messages
#[derive(Debug, Clone)]
pub struct MessageBus {
    messages: Vec<McpMessage>,
    next_id: u64,
}

impl MessageBus {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a message and return the stored record
    pub fn publish(&mut self, draft: MessageDraft, now: DateTime<Utc>) -> &McpMessage {
        let id = match draft.id {
            Some(id) => {
                self.next_id = self.next_id.max(id.0 + 1);
                id
            }
            None => {
                let id = MessageId(self.next_id);
                self.next_id += 1;
                id
            }
        };

        let message = McpMessage {
            id,
            from: draft.from,
            to: draft.to,
            kind: draft.kind,
            content: draft.content,
            created_at: draft.created_at.unwrap_or(now),
        };
        debug!(
            message_id = %message.id,
            from = %message.from,
            to = %message.to,
            kind = %message.kind,
            "MCP message published"
        );

        self.messages.push(message);
        let index = self.messages.len() - 1;
        &self.messages[index]
    }

    /// Every message in publication order
    pub fn list(&self) -> &[McpMessage] {
        &self.messages
    }

    pub fn iter(&self) -> impl Iterator<Item = &McpMessage> {
        self.messages.iter()
    }

    pub fn get(&self, id: MessageId) -> Option<&McpMessage> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Messages matching a filter, in publication order
    pub fn filter<'a>(&'a self, filter: &'a MessageFilter) -> impl Iterator<Item = &'a McpMessage> + 'a {
        self.messages.iter().filter(move |m| filter.matches(m))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_assigns_sequential_ids() {
        let mut bus = MessageBus::new();
        let now = Utc::now();
        let first = bus
            .publish(MessageDraft::new("a", "b", MessageKind::Context, "one"), now)
            .id;
        let second = bus
            .publish(MessageDraft::new("b", "a", MessageKind::Response, "two"), now)
            .id;
        assert!(first < second);
        assert_eq!(bus.len(), 2);
        assert_eq!(bus.list()[0].content, "one");
        assert_eq!(bus.list()[1].content, "two");
    }

    #[test]
    fn test_publish_keeps_preset_fields() {
        let mut bus = MessageBus::new();
        let stamp = Utc::now() - chrono::Duration::hours(1);
        let mut draft = MessageDraft::new("a", "b", MessageKind::Code, "fn main() {}");
        draft.id = Some(MessageId(41));
        draft.created_at = Some(stamp);

        let stored = bus.publish(draft, Utc::now()).clone();
        assert_eq!(stored.id, MessageId(41));
        assert_eq!(stored.created_at, stamp);

        let next = bus
            .publish(MessageDraft::new("a", "b", MessageKind::Code, "x"), Utc::now())
            .id;
        assert_eq!(next, MessageId(42));
    }

    #[test]
    fn test_list_is_repeatable() {
        let mut bus = MessageBus::new();
        bus.publish(MessageDraft::new("a", "b", MessageKind::Request, "q"), Utc::now());
        let first: Vec<McpMessage> = bus.list().to_vec();
        let second: Vec<McpMessage> = bus.list().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_filter_by_recipient_and_kind() {
        let mut bus = MessageBus::new();
        let now = Utc::now();
        bus.publish(MessageDraft::new("a", "b", MessageKind::Context, "1"), now);
        bus.publish(MessageDraft::new("a", "c", MessageKind::Context, "2"), now);
        bus.publish(MessageDraft::new("c", "b", MessageKind::Code, "3"), now);

        let to_b = MessageFilter {
            to: Some("b".to_string()),
            ..Default::default()
        };
        let contents: Vec<&str> = bus.filter(&to_b).map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["1", "3"]);

        let code = MessageFilter {
            kind: Some(MessageKind::Code),
            ..Default::default()
        };
        assert_eq!(bus.filter(&code).count(), 1);
    }

    #[test]
    fn test_message_id_display() {
        assert_eq!(MessageId(7).to_string(), "msg-000007");
    }
}
