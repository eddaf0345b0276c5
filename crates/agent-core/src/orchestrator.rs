//! Conversation Orchestration
//!
//! Entry points behind the RPC surface. A new conversation runs title and
//! reply generation as two concurrent tasks; a continuation runs the reply
//! alone. The store only ever sees complete user + assistant pairs.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use crate::conversation::{Conversation, ConversationId, ConversationStore, ConversationSummary};
use crate::error::{AgentError, Result};
use crate::reasoning::Agent;
use crate::title::TitleGenerator;

/// Title and reply generation as seen by the orchestrator
#[async_trait]
pub trait Assistant: Send + Sync {
    async fn title(&self, conversation: &Conversation, cancel: &CancellationToken) -> Result<String>;

    async fn reply(&self, conversation: &Conversation, cancel: &CancellationToken) -> Result<String>;
}

/// Assistant backed by the reasoning loop and the title generator
pub struct AgentAssistant {
    agent: Agent,
    titles: TitleGenerator,
}

impl AgentAssistant {
    pub const fn new(agent: Agent, titles: TitleGenerator) -> Self {
        Self { agent, titles }
    }
}

#[async_trait]
impl Assistant for AgentAssistant {
    async fn title(&self, conversation: &Conversation, cancel: &CancellationToken) -> Result<String> {
        self.titles.generate(conversation, cancel).await
    }

    async fn reply(&self, conversation: &Conversation, cancel: &CancellationToken) -> Result<String> {
        self.agent.reply(conversation, cancel).await
    }
}

/// Result of starting a conversation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StartedConversation {
    pub conversation_id: ConversationId,
    pub title: String,
    pub reply: String,
}

pub struct ConversationService {
    assistant: Arc<dyn Assistant>,
    store: Arc<dyn ConversationStore>,
}

impl ConversationService {
    pub fn new(assistant: Arc<dyn Assistant>, store: Arc<dyn ConversationStore>) -> Self {
        Self { assistant, store }
    }

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.store
    }

    /// Create a conversation from its first user message
    ///
    /// Title failure keeps the default title; reply failure aborts and nothing
    /// is persisted.
    pub async fn start_conversation(
        &self,
        message: &str,
        cancel: &CancellationToken,
    ) -> Result<StartedConversation> {
        if message.trim().is_empty() {
            return Err(AgentError::InvalidArgument("message".into()));
        }

        let conversation = Arc::new(Conversation::start(message));

        // Dropping this future cancels both tasks through the guard.
        let scope = cancel.child_token();
        let _guard = scope.clone().drop_guard();

        let title_task = {
            let assistant = Arc::clone(&self.assistant);
            let conversation = Arc::clone(&conversation);
            let token = scope.clone();
            tokio::spawn(async move { assistant.title(&conversation, &token).await })
        };
        let reply_task = {
            let assistant = Arc::clone(&self.assistant);
            let conversation = Arc::clone(&conversation);
            let token = scope.clone();
            tokio::spawn(async move { assistant.reply(&conversation, &token).await })
        };

        let (title, reply) = tokio::join!(title_task, reply_task);
        let (title, reply) = (joined(title), joined(reply));

        let mut conversation =
            Arc::try_unwrap(conversation).unwrap_or_else(|shared| (*shared).clone());

        match title {
            Ok(title) => conversation.title = title,
            Err(e) => tracing::warn!(
                conversation_id = %conversation.id,
                error = %e,
                "Failed to generate conversation title, keeping default"
            ),
        }

        let reply = reply?;
        conversation.push_assistant(&reply);
        self.store.create(&conversation).await?;

        tracing::info!(conversation_id = %conversation.id, "Conversation started");

        Ok(StartedConversation {
            conversation_id: conversation.id,
            title: conversation.title,
            reply,
        })
    }

    /// Append a user message and the assistant's reply to an existing conversation
    pub async fn continue_conversation(
        &self,
        conversation_id: &str,
        message: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        if conversation_id.trim().is_empty() {
            return Err(AgentError::InvalidArgument("conversation_id".into()));
        }
        if message.trim().is_empty() {
            return Err(AgentError::InvalidArgument("message".into()));
        }

        let id = ConversationId::from_string(conversation_id);
        let mut conversation = self.store.describe(&id).await?;

        conversation.push_user(message);
        let reply = self.assistant.reply(&conversation, cancel).await?;
        conversation.push_assistant(&reply);

        self.store.update(&conversation).await?;

        Ok(reply)
    }

    pub async fn describe_conversation(&self, conversation_id: &str) -> Result<Conversation> {
        if conversation_id.trim().is_empty() {
            return Err(AgentError::InvalidArgument("conversation_id".into()));
        }
        self.store
            .describe(&ConversationId::from_string(conversation_id))
            .await
    }

    pub async fn list_conversations(&self) -> Result<Vec<ConversationSummary>> {
        self.store.list().await
    }
}

fn joined(result: std::result::Result<Result<String>, JoinError>) -> Result<String> {
    result.unwrap_or_else(|e| Err(AgentError::Other(format!("generation task failed: {e}"))))
}
