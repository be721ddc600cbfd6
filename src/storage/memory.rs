//! In-memory conversation storage
//!
//! A HashMap behind an async RwLock. Clones share the same map.

use crate::conversation::Conversation;
use crate::error::{StorageError, StorageResult};
use crate::storage::ConversationStore;
use crate::types::ConversationId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory conversation storage
///
/// # Examples
///
/// ```
/// use tripdesk::storage::ConversationStore;
/// use tripdesk::{Conversation, InMemoryConversationStore, Role};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryConversationStore::new();
///     let id = store.create(Conversation::new(Role::Traveler)).await?;
///
///     assert!(store.get(&id).await?.is_some());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    conversations: Arc<RwLock<HashMap<ConversationId, Conversation>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }

    /// Drop every conversation
    pub async fn clear(&self) {
        self.conversations.write().await.clear();
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn create(&self, conversation: Conversation) -> StorageResult<ConversationId> {
        let id = conversation.id;
        let mut conversations = self.conversations.write().await;

        if conversations.contains_key(&id) {
            return Err(StorageError::AlreadyExists(format!(
                "Conversation with ID {} already exists",
                id
            )));
        }

        conversations.insert(id, conversation);
        Ok(id)
    }

    async fn get(&self, id: &ConversationId) -> StorageResult<Option<Conversation>> {
        let conversations = self.conversations.read().await;
        Ok(conversations.get(id).cloned())
    }

    async fn update(
        &self,
        id: &ConversationId,
        conversation: Conversation,
    ) -> StorageResult<()> {
        let mut conversations = self.conversations.write().await;

        match conversations.get_mut(id) {
            Some(slot) => {
                *slot = conversation;
                Ok(())
            }
            None => Err(StorageError::NotFound(format!(
                "Conversation with ID {} not found",
                id
            ))),
        }
    }

    async fn delete(&self, id: &ConversationId) -> StorageResult<()> {
        let mut conversations = self.conversations.write().await;

        if conversations.remove(id).is_none() {
            return Err(StorageError::NotFound(format!(
                "Conversation with ID {} not found",
                id
            )));
        }

        Ok(())
    }

    async fn list(&self) -> StorageResult<Vec<ConversationId>> {
        let conversations = self.conversations.read().await;
        Ok(conversations.keys().copied().collect())
    }

    async fn exists(&self, id: &ConversationId) -> StorageResult<bool> {
        let conversations = self.conversations.read().await;
        Ok(conversations.contains_key(id))
    }
}
