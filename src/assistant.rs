//! Assistant façade
//!
//! Ties the pure pipeline (extract, select, render) to conversation history,
//! per-conversation trip details, and the short "thinking" pause shown before
//! a reply appears.

use crate::conversation::{Conversation, Message};
use crate::error::{AssistantError, Result};
use crate::extract::TripDetails;
use crate::itinerary::{generate_sample_itinerary, SampleItinerary};
use crate::responder::{Responder, RuleBook, CREATE_ITINERARY_RULE};
use crate::rule::{ResponseRule, RuleMatch};
use crate::storage::memory::InMemoryConversationStore;
use crate::storage::ConversationStore;
use crate::types::{ConversationId, Role, RuleId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

/// Log level for assistant operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Matching `tracing` level, for subscriber setup in the host application
    pub fn as_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Assistant configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Pause before each reply, in milliseconds when serialized
    #[serde(
        default = "default_thinking_delay",
        serialize_with = "serialize_millis",
        deserialize_with = "deserialize_millis"
    )]
    pub thinking_delay: Duration,

    #[serde(default = "default_max_history")]
    pub max_history: usize,

    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_thinking_delay() -> Duration {
    Duration::from_millis(800)
}

fn default_max_history() -> usize {
    100
}

fn serialize_millis<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(duration.as_millis() as u64)
}

fn deserialize_millis<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let millis = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(millis))
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            thinking_delay: default_thinking_delay(),
            max_history: default_max_history(),
            log_level: LogLevel::default(),
        }
    }
}

impl AssistantConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AssistantConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_history < 2 {
            return Err(AssistantError::Configuration(
                "max_history must keep at least one exchange (2 messages)".to_string(),
            ));
        }
        Ok(())
    }
}

/// What the assistant said and why
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantReply {
    pub text: String,
    /// `None` when the role's fallback answered
    pub matched_rule: Option<RuleMatch>,
    /// Trip details accumulated in the conversation so far
    pub details: TripDetails,
    /// Sample plan attached when an itinerary was just created
    pub itinerary: Option<SampleItinerary>,
}

/// Rule-based travel assistant.
///
/// # Examples
///
/// ```
/// use tripdesk::{Assistant, AssistantConfig, Role};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> tripdesk::Result<()> {
/// let assistant = Assistant::builder()
///     .name("Desk")
///     .config(AssistantConfig {
///         thinking_delay: Duration::ZERO,
///         ..Default::default()
///     })
///     .build()?;
///
/// let id = assistant.start_conversation(Role::Agent).await?;
/// let reply = assistant
///     .reply(id, "Create a 3-day trip to Phuket called Sea Breeze for 2 people")
///     .await?;
/// assert_eq!(reply.itinerary.map(|i| i.days.len()), Some(3));
/// # Ok(())
/// # }
/// ```
pub struct Assistant {
    name: String,
    responder: Arc<RwLock<Responder>>,
    config: AssistantConfig,
    store: Arc<dyn ConversationStore>,
    /// One lock per conversation, held from read to write-back of a turn
    turns: Mutex<HashMap<ConversationId, Arc<Mutex<()>>>>,
}

impl Assistant {
    pub fn builder() -> AssistantBuilder {
        AssistantBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Open a conversation for `role`
    pub async fn start_conversation(&self, role: Role) -> Result<ConversationId> {
        let id = self.store.create(Conversation::new(role)).await?;
        info!(assistant = %self.name, conversation_id = %id, role = %role, "Conversation started");
        Ok(id)
    }

    pub async fn get_conversation(&self, id: &ConversationId) -> Result<Option<Conversation>> {
        Ok(self.store.get(id).await?)
    }

    /// Close and discard a conversation
    pub async fn end_conversation(&self, id: &ConversationId) -> Result<()> {
        if !self.store.exists(id).await? {
            return Err(AssistantError::ConversationNotFound(*id));
        }
        self.store.delete(id).await?;
        self.turns.lock().await.remove(id);
        info!(conversation_id = %id, "Conversation ended");
        Ok(())
    }

    /// Append a rule to the end of `role`'s chain, ahead of the fallback only
    pub async fn add_rule(&self, role: Role, rule: ResponseRule) -> Result<RuleId> {
        let mut responder = self.responder.write().await;
        Ok(responder.book_mut(role).push(rule)?)
    }

    /// Insert a rule at `position` in `role`'s chain
    pub async fn insert_rule(
        &self,
        role: Role,
        position: usize,
        rule: ResponseRule,
    ) -> Result<RuleId> {
        let mut responder = self.responder.write().await;
        Ok(responder.book_mut(role).chain_mut().insert(position, rule)?)
    }

    async fn turn_lock(&self, id: ConversationId) -> Arc<Mutex<()>> {
        self.turns.lock().await.entry(id).or_default().clone()
    }

    /// Answer one user message.
    ///
    /// Turns on the same conversation run one at a time, so overlapping
    /// calls never overwrite each other's messages or details.
    pub async fn reply(&self, id: ConversationId, text: &str) -> Result<AssistantReply> {
        if text.trim().is_empty() {
            return Err(AssistantError::InvalidInput("message is empty".to_string()));
        }

        let turn = self.turn_lock(id).await;
        let _turn = turn.lock().await;

        let Some(mut conversation) = self.store.get(&id).await? else {
            self.turns.lock().await.remove(&id);
            return Err(AssistantError::ConversationNotFound(id));
        };

        info!(
            conversation_id = %id,
            role = %conversation.role,
            message_length = text.len(),
            "Processing message"
        );

        let selection = {
            let responder = self.responder.read().await;
            conversation.merge_details(responder.extract(text));
            responder.select(text, conversation.role, Some(&conversation.details))
        };

        let itinerary = match (&selection.matched, &conversation.details.destination) {
            (Some(m), Some(destination)) if m.rule_name == CREATE_ITINERARY_RULE => {
                let duration = conversation.details.duration.as_deref().unwrap_or_default();
                Some(generate_sample_itinerary(destination, duration))
            }
            _ => None,
        };

        if !self.config.thinking_delay.is_zero() {
            debug!(delay_ms = self.config.thinking_delay.as_millis() as u64, "Thinking");
            tokio::time::sleep(self.config.thinking_delay).await;
        }

        conversation.push(Message::user(text));
        conversation.push(Message::agent(selection.text.clone()));
        conversation.trim_history(self.config.max_history);

        let details = conversation.details.clone();
        self.store.update(&id, conversation).await?;

        Ok(AssistantReply {
            text: selection.text,
            matched_rule: selection.matched,
            details,
            itinerary,
        })
    }
}

/// Builder for Assistant
pub struct AssistantBuilder {
    name: Option<String>,
    config: AssistantConfig,
    store: Option<Arc<dyn ConversationStore>>,
    responder: Responder,
}

impl AssistantBuilder {
    pub fn new() -> Self {
        Self {
            name: None,
            config: AssistantConfig::default(),
            store: None,
            responder: Responder::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn config(mut self, config: AssistantConfig) -> Self {
        self.config = config;
        self
    }

    pub fn store(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the built-in rule book for the book's role
    pub fn rule_book(mut self, book: RuleBook) -> Self {
        self.responder = self.responder.with_rule_book(book);
        self
    }

    pub fn responder(mut self, responder: Responder) -> Self {
        self.responder = responder;
        self
    }

    pub fn build(self) -> Result<Assistant> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| AssistantError::Configuration("Assistant name is required".to_string()))?;
        self.config.validate()?;

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryConversationStore::new()));

        Ok(Assistant {
            name,
            responder: Arc::new(RwLock::new(self.responder)),
            config: self.config,
            store,
            turns: Mutex::new(HashMap::new()),
        })
    }
}

impl Default for AssistantBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleCondition;

    fn quick_config() -> AssistantConfig {
        AssistantConfig {
            thinking_delay: Duration::ZERO,
            ..Default::default()
        }
    }

    fn assistant() -> Assistant {
        Assistant::builder()
            .name("Test Desk")
            .config(quick_config())
            .build()
            .unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = AssistantConfig::default();
        assert_eq!(config.thinking_delay, Duration::from_millis(800));
        assert_eq!(config.max_history, 100);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_config_from_json() {
        let config =
            AssistantConfig::from_json_str(r#"{"thinking_delay": 250, "log_level": "debug"}"#)
                .unwrap();
        assert_eq!(config.thinking_delay, Duration::from_millis(250));
        assert_eq!(config.max_history, 100);
        assert_eq!(config.log_level, LogLevel::Debug);

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["thinking_delay"], 250);
    }

    #[test]
    fn test_config_rejects_tiny_history() {
        let err = AssistantConfig::from_json_str(r#"{"max_history": 1}"#).unwrap_err();
        assert!(matches!(err, AssistantError::Configuration(_)));
    }

    #[test]
    fn test_builder_requires_name() {
        let err = Assistant::builder().build().err().unwrap();
        assert!(matches!(err, AssistantError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_reply_accumulates_details() {
        let assistant = assistant();
        let id = assistant.start_conversation(Role::Agent).await.unwrap();

        assistant.reply(id, "Thinking about Bali").await.unwrap();
        let reply = assistant
            .reply(id, "Plan a 5 day trip for 2 adults")
            .await
            .unwrap();

        assert_eq!(reply.details.destination.as_deref(), Some("Bali, Indonesia"));
        assert_eq!(reply.details.number_of_travelers.as_deref(), Some("2"));
        assert_eq!(
            reply.matched_rule.as_ref().map(|m| m.rule_name.as_str()),
            Some(CREATE_ITINERARY_RULE)
        );
        assert_eq!(reply.itinerary.unwrap().days.len(), 5);

        let conversation = assistant.get_conversation(&id).await.unwrap().unwrap();
        assert_eq!(conversation.messages.len(), 4);
    }

    #[tokio::test]
    async fn test_reply_unknown_conversation() {
        let assistant = assistant();
        let err = assistant
            .reply(ConversationId::new(), "hello")
            .await
            .unwrap_err();
        assert!(matches!(err, AssistantError::ConversationNotFound(_)));
    }

    #[tokio::test]
    async fn test_reply_rejects_blank_message() {
        let assistant = assistant();
        let id = assistant.start_conversation(Role::Traveler).await.unwrap();
        let err = assistant.reply(id, "   ").await.unwrap_err();
        assert!(matches!(err, AssistantError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_history_is_trimmed() {
        let assistant = Assistant::builder()
            .name("Short Memory")
            .config(AssistantConfig {
                thinking_delay: Duration::ZERO,
                max_history: 4,
                ..Default::default()
            })
            .build()
            .unwrap();
        let id = assistant.start_conversation(Role::Traveler).await.unwrap();
        for _ in 0..5 {
            assistant.reply(id, "what should I pack?").await.unwrap();
        }
        let conversation = assistant.get_conversation(&id).await.unwrap().unwrap();
        assert_eq!(conversation.messages.len(), 4);
    }

    #[tokio::test]
    async fn test_overlapping_replies_keep_both_turns() {
        let assistant = Assistant::builder()
            .name("Busy Desk")
            .config(AssistantConfig {
                thinking_delay: Duration::from_millis(50),
                ..Default::default()
            })
            .build()
            .unwrap();
        let id = assistant.start_conversation(Role::Traveler).await.unwrap();

        let (first, second) = tokio::join!(
            assistant.reply(id, "What should I pack for Bali?"),
            assistant.reply(id, "Travelling with 3 guests, weather?")
        );
        first.unwrap();
        second.unwrap();

        let conversation = assistant.get_conversation(&id).await.unwrap().unwrap();
        assert_eq!(conversation.messages.len(), 4);
        assert_eq!(conversation.details.destination.as_deref(), Some("Bali, Indonesia"));
        assert_eq!(conversation.details.number_of_travelers.as_deref(), Some("3"));
    }

    #[tokio::test]
    async fn test_added_rule_takes_effect() {
        let assistant = assistant();
        assistant
            .insert_rule(
                Role::Vendor,
                0,
                ResponseRule::new(
                    "loyalty",
                    RuleCondition::literal("loyalty"),
                    "Loyalty pricing noted.",
                ),
            )
            .await
            .unwrap();

        let id = assistant.start_conversation(Role::Vendor).await.unwrap();
        let reply = assistant
            .reply(id, "Do you have a loyalty rate?")
            .await
            .unwrap();
        assert_eq!(reply.text, "Loyalty pricing noted.");
    }

    #[tokio::test]
    async fn test_end_conversation() {
        let assistant = assistant();
        let id = assistant.start_conversation(Role::Agent).await.unwrap();
        assistant.end_conversation(&id).await.unwrap();
        assert!(assistant.get_conversation(&id).await.unwrap().is_none());
        assert!(matches!(
            assistant.end_conversation(&id).await.unwrap_err(),
            AssistantError::ConversationNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_thinking_delay_is_applied() {
        let assistant = Assistant::builder()
            .name("Slow Desk")
            .config(AssistantConfig {
                thinking_delay: Duration::from_millis(50),
                ..Default::default()
            })
            .build()
            .unwrap();
        let id = assistant.start_conversation(Role::Traveler).await.unwrap();

        let started = tokio::time::Instant::now();
        assistant.reply(id, "weather?").await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
