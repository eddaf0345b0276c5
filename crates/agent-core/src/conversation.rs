//! Conversation Management
//!
//! Persisted conversations, their messages, and the store interface the
//! orchestrator writes through. Tool-call intermediates never show up here;
//! only user turns and final assistant replies are kept.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AgentError, Result};

/// Title used until the title generator has produced one
pub const UNTITLED: &str = "Untitled conversation";

/// Unique conversation identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who wrote a persisted message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

/// A persisted message
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: Uuid,
    pub role: Author,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationMessage {
    fn new(role: Author, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Author::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Author::Assistant, content)
    }
}

/// A complete conversation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    /// Unique identifier
    pub id: ConversationId,

    /// Conversation title (generated or default)
    pub title: String,

    /// Messages in chronological order
    pub messages: Vec<ConversationMessage>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,

    /// Bumped by the store on every successful write
    #[serde(default)]
    pub revision: u64,
}

impl Conversation {
    /// Create a conversation opened by a user message
    pub fn start(first_message: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ConversationId::new(),
            title: UNTITLED.into(),
            messages: vec![ConversationMessage::user(first_message)],
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }

    /// Update the activity timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ConversationMessage::user(content));
        self.touch();
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ConversationMessage::assistant(content));
        self.touch();
    }

    /// User-authored messages, in order
    pub fn user_messages(&self) -> impl Iterator<Item = &ConversationMessage> {
        self.messages.iter().filter(|m| m.role == Author::User)
    }

    /// Message count
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn summary(&self) -> ConversationSummary {
        ConversationSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Conversation without its message bodies
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: ConversationId,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Conversation store trait for persistence
///
/// `update` is an optimistic write: it fails with `AgentError::Conflict`
/// when the stored revision differs from `conversation.revision`.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Persist a new conversation
    async fn create(&self, conversation: &Conversation) -> Result<()>;

    /// Replace an existing conversation
    async fn update(&self, conversation: &Conversation) -> Result<()>;

    /// Load a conversation by ID, `AgentError::NotFound` if absent
    async fn describe(&self, id: &ConversationId) -> Result<Conversation>;

    /// All conversations, newest activity first
    async fn list(&self) -> Result<Vec<ConversationSummary>>;
}

/// Shared revision check for store implementations
pub fn check_revision(stored: &Conversation, incoming: &Conversation) -> Result<()> {
    if stored.revision == incoming.revision {
        Ok(())
    } else {
        Err(AgentError::Conflict {
            id: incoming.id.to_string(),
            expected: incoming.revision,
            found: stored.revision,
        })
    }
}

/// Sort summaries by `updated_at` descending
pub fn newest_first(summaries: &mut [ConversationSummary]) {
    summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

/// In-memory conversation store (for development/testing)
pub struct MemoryConversationStore {
    conversations: RwLock<HashMap<ConversationId, Conversation>>,
}

impl Default for MemoryConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self {
            conversations: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn create(&self, conversation: &Conversation) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        if conversations.contains_key(&conversation.id) {
            return Err(AgentError::Store(format!(
                "conversation {} already exists",
                conversation.id
            )));
        }
        let mut stored = conversation.clone();
        stored.revision += 1;
        conversations.insert(stored.id.clone(), stored);
        Ok(())
    }

    async fn update(&self, conversation: &Conversation) -> Result<()> {
        let mut conversations = self.conversations.write().await;
        let stored = conversations
            .get_mut(&conversation.id)
            .ok_or_else(|| AgentError::NotFound(conversation.id.to_string()))?;

        check_revision(stored, conversation)?;

        *stored = conversation.clone();
        stored.revision += 1;
        Ok(())
    }

    async fn describe(&self, id: &ConversationId) -> Result<Conversation> {
        let conversations = self.conversations.read().await;
        conversations
            .get(id)
            .cloned()
            .ok_or_else(|| AgentError::NotFound(id.to_string()))
    }

    async fn list(&self) -> Result<Vec<ConversationSummary>> {
        let conversations = self.conversations.read().await;
        let mut result: Vec<_> = conversations.values().map(Conversation::summary).collect();
        newest_first(&mut result);
        Ok(result)
    }
}
