//! Conversation storage backends
//!
//! The assistant keeps conversations behind the [`ConversationStore`] trait so
//! a host application can swap the in-memory default for its own backend.

use crate::conversation::Conversation;
use crate::error::StorageResult;
use crate::types::ConversationId;
use async_trait::async_trait;

pub mod memory;

/// Trait for conversation storage backends
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Store a new conversation, failing if its ID is taken
    async fn create(&self, conversation: Conversation) -> StorageResult<ConversationId>;

    /// Get a conversation by ID; `None` when absent
    async fn get(&self, id: &ConversationId) -> StorageResult<Option<Conversation>>;

    /// Replace an existing conversation
    async fn update(
        &self,
        id: &ConversationId,
        conversation: Conversation,
    ) -> StorageResult<()>;

    /// Delete a conversation by ID
    async fn delete(&self, id: &ConversationId) -> StorageResult<()>;

    /// List all conversation IDs
    async fn list(&self) -> StorageResult<Vec<ConversationId>>;

    /// Check if a conversation exists
    async fn exists(&self, id: &ConversationId) -> StorageResult<bool> {
        Ok(self.get(id).await?.is_some())
    }
}
