//! Conversation, message, and sentiment types for Rendezvous.
//!
//! These types model a user's exchanges with the assistant: the
//! conversation that groups them, each persisted message/response pair,
//! and the sentiment label attached to the inbound text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Sentiment label attached to a message's inbound text.
///
/// `Empty` exists for rows written without a label; the classifier itself
/// only ever produces the other three.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (sentiment IN ('positive', 'neutral', 'negative', ''))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    #[serde(rename = "")]
    Empty,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::Empty => "",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            "" => Ok(Sentiment::Empty),
            other => Err(format!("invalid sentiment: '{other}'")),
        }
    }
}

impl Default for Sentiment {
    fn default() -> Self {
        Sentiment::Empty
    }
}

/// A conversation between one user and the assistant.
///
/// Conversations are created lazily by the chat service on a user's first
/// message and are never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One persisted exchange: the user's inbound text, the assistant's reply,
/// the sentiment of the inbound text, and an optional attachment path.
///
/// Messages are ordered by `created_at` within a conversation (ties broken
/// by the time-sortable `id`) and are immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    /// Inbound text from the user (may be empty when only a file was sent).
    pub message: String,
    /// Outbound text generated by the assistant.
    pub response: String,
    pub sentiment: Sentiment,
    /// Path of the stored attachment relative to the content root.
    pub file: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when appending a message.
///
/// The id and timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub message: String,
    pub response: String,
    pub sentiment: Sentiment,
    pub file: Option<String>,
}

/// An uploaded file attached to an inbound chat message.
#[derive(Clone)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

impl fmt::Debug for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attachment")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_roundtrip() {
        for sentiment in [
            Sentiment::Positive,
            Sentiment::Neutral,
            Sentiment::Negative,
            Sentiment::Empty,
        ] {
            let s = sentiment.to_string();
            let parsed: Sentiment = s.parse().unwrap();
            assert_eq!(sentiment, parsed);
        }
    }

    #[test]
    fn test_sentiment_serde() {
        let json = serde_json::to_string(&Sentiment::Positive).unwrap();
        assert_eq!(json, "\"positive\"");
        let empty = serde_json::to_string(&Sentiment::Empty).unwrap();
        assert_eq!(empty, "\"\"");
        let parsed: Sentiment = serde_json::from_str("\"negative\"").unwrap();
        assert_eq!(parsed, Sentiment::Negative);
    }

    #[test]
    fn test_sentiment_rejects_unknown_label() {
        assert!("ecstatic".parse::<Sentiment>().is_err());
    }

    #[test]
    fn test_chat_message_serialize_null_file() {
        let msg = ChatMessage {
            id: Uuid::now_v7(),
            conversation_id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            message: "hello".to_string(),
            response: "hi".to_string(),
            sentiment: Sentiment::Neutral,
            file: None,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert!(value["file"].is_null());
        assert_eq!(value["sentiment"], "neutral");
    }

    #[test]
    fn test_attachment_debug_hides_bytes() {
        let attachment = Attachment::new("notes.txt", b"secret contents".to_vec());
        let debug = format!("{attachment:?}");
        assert!(debug.contains("notes.txt"));
        assert!(!debug.contains("secret contents"));
    }
}
