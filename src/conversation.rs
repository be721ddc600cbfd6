//! Conversation state
//!
//! Messages exchanged with the assistant plus the trip details accumulated
//! from the user's turns. The [`Message`] JSON shape is the one stored in the
//! backend `negotiations.messages` column.

use crate::extract::TripDetails;
use crate::types::{ConversationId, MessageId, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person typing
    User,
    /// The assistant
    Agent,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a new user message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Create a new assistant message
    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Sender::Agent, text)
    }

    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
        }
    }
}

/// One user's chat with the assistant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: ConversationId,
    pub role: Role,
    pub messages: Vec<Message>,
    /// Trip details merged from every user turn so far
    #[serde(default)]
    pub details: TripDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new(role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            role,
            messages: Vec::new(),
            details: TripDetails::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Append a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.touch();
    }

    /// Fold newly extracted details into the accumulated record
    pub fn merge_details(&mut self, details: TripDetails) {
        self.details.merge(details);
    }

    /// Keep only the newest `max` messages
    pub fn trim_history(&mut self, max: usize) {
        if self.messages.len() > max {
            let excess = self.messages.len() - max;
            self.messages.drain(..excess);
        }
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Update the last-modified timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
