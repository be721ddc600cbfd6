//! Error types for tripdesk
//!
//! Extraction and response selection never fail. Errors only appear at the
//! edges: building rule books, moving negotiations between states, loading
//! fixtures and configuration, and the conversation store.

use crate::negotiation::NegotiationStatus;
use crate::types::{ConversationId, NegotiationId};
use thiserror::Error;

/// Main error type for tripdesk operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AssistantError {
    /// Conversation not found
    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    /// Rule construction failed
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Negotiation update failed
    #[error("Negotiation error: {0}")]
    Negotiation(#[from] NegotiationError),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading a fixture or config file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Errors raised while building response rules
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RuleError {
    /// A rule would render an empty response
    #[error("Rule '{0}' has an empty response template")]
    EmptyTemplate(String),

    /// Regex pattern did not compile
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Keyword condition without keywords
    #[error("Rule '{0}' has a keyword condition with no keywords")]
    EmptyKeywords(String),

    /// Rule book has no fallback response
    #[error("Rule book for {0} has an empty fallback response")]
    EmptyFallback(String),
}

/// Errors raised by negotiation state changes
#[derive(Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum NegotiationError {
    /// The negotiation is already closed
    #[error("Negotiation {id} is {status:?} and can no longer change")]
    Closed {
        id: NegotiationId,
        status: NegotiationStatus,
    },

    /// Rates must be positive and finite
    #[error("Invalid rate {rate} for negotiation {id}")]
    InvalidRate { id: NegotiationId, rate: f64 },
}

/// Conversation storage errors
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum StorageError {
    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Resource already exists
    #[error("Resource already exists: {0}")]
    AlreadyExists(String),
}

/// Type alias for tripdesk Result
pub type Result<T> = std::result::Result<T, AssistantError>;

/// Type alias for Storage Result
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Type alias for Rule Result
pub type RuleResult<T> = std::result::Result<T, RuleError>;

/// Type alias for Negotiation Result
pub type NegotiationResult<T> = std::result::Result<T, NegotiationError>;
