//! Group chat and assistant conversation logs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: RecordId,
    pub sender_name: String,
    /// Text, or base64 media payload for audio/video messages.
    pub content: String,
    pub media_type: MediaType,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn text(sender: impl Into<String>, content: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self::with_media(sender, content, MediaType::Text, at)
    }

    pub fn with_media(
        sender: impl Into<String>,
        content: impl Into<String>,
        media_type: MediaType,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RecordId::generate(),
            sender_name: sender.into(),
            content: content.into(),
            media_type,
            timestamp: at,
        }
    }

    pub fn is_media(&self) -> bool {
        self.media_type != MediaType::Text
    }
}

impl Identifiable for ChatMessage {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaType {
    Text,
    Audio,
    Video,
}

/// One turn of the legal-assistant conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotMessage {
    pub id: RecordId,
    pub sender: BotSender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl BotMessage {
    pub fn new(sender: BotSender, text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: RecordId::generate(),
            sender,
            text: text.into(),
            timestamp: at,
        }
    }
}

impl Identifiable for BotMessage {
    fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BotSender {
    User,
    Bot,
}
