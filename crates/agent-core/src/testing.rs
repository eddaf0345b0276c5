//! Test doubles shared by the unit tests of this crate.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Barrier;
use tokio_util::sync::CancellationToken;

use crate::conversation::{
    Conversation, ConversationId, ConversationStore, ConversationSummary, MemoryConversationStore,
};
use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::orchestrator::Assistant;
use crate::provider::{Completion, GenerationOptions, LlmProvider, ModelInfo};
use crate::tool::{Tool, ToolDefinition, ToolResult, ToolSchema};

/// Provider that replays queued completions, then an optional fallback
#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<Completion>>>,
    fallback: Option<Completion>,
    delay: Option<Duration>,
    requests: Mutex<Vec<Vec<Message>>>,
    tool_counts: Mutex<Vec<usize>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<Result<Completion>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        }
    }

    pub fn repeating(completion: Completion) -> Self {
        Self {
            fallback: Some(completion),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }

    pub fn tool_counts(&self) -> Vec<usize> {
        self.tool_counts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
        _options: &GenerationOptions,
    ) -> Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(messages.to_vec());
        self.tool_counts.lock().unwrap().push(tools.len());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(response) => response,
            None => self.fallback.clone().ok_or(AgentError::NoModelOutput),
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        Ok(Vec::new())
    }
}

/// Returns its raw arguments verbatim, optionally prefixed
#[derive(Default)]
pub struct EchoTool {
    prefix: String,
    calls: Arc<AtomicUsize>,
}

impl EchoTool {
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "echo".into(),
            description: "Echo the arguments back".into(),
            parameters: Vec::new(),
        }
    }

    async fn execute(&self, arguments: &str) -> Result<ToolResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ToolResult::success("echo", format!("{}{}", self.prefix, arguments)))
    }
}

/// Sleeps before answering; counts how many executions began
pub struct SlowTool {
    delay: Duration,
    started: Arc<AtomicUsize>,
}

impl SlowTool {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            started: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn started(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.started)
    }
}

#[async_trait]
impl Tool for SlowTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "slow".into(),
            description: "Answers after a delay".into(),
            parameters: Vec::new(),
        }
    }

    async fn execute(&self, _arguments: &str) -> Result<ToolResult> {
        self.started.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(ToolResult::success("slow", "done"))
    }
}

type ErrorFactory = Box<dyn Fn() -> AgentError + Send + Sync>;

/// Assistant with canned title/reply results
pub struct MockAssistant {
    title: String,
    reply: String,
    title_error: Option<ErrorFactory>,
    reply_error: Option<ErrorFactory>,
    barrier: Option<Barrier>,
    honor_cancel: bool,
}

impl MockAssistant {
    pub fn new(title: &str, reply: &str) -> Self {
        Self {
            title: title.into(),
            reply: reply.into(),
            title_error: None,
            reply_error: None,
            barrier: None,
            honor_cancel: false,
        }
    }

    pub fn failing_title(mut self, error: impl Fn() -> AgentError + Send + Sync + 'static) -> Self {
        self.title_error = Some(Box::new(error));
        self
    }

    pub fn failing_reply(mut self, error: impl Fn() -> AgentError + Send + Sync + 'static) -> Self {
        self.reply_error = Some(Box::new(error));
        self
    }

    /// Title and reply each wait until the other has started
    pub fn rendezvous(mut self) -> Self {
        self.barrier = Some(Barrier::new(2));
        self
    }

    pub fn honoring_cancellation(mut self) -> Self {
        self.honor_cancel = true;
        self
    }

    async fn respond(
        &self,
        value: &str,
        error: Option<&ErrorFactory>,
        cancel: &CancellationToken,
    ) -> Result<String> {
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if self.honor_cancel && cancel.is_cancelled() {
            return Err(AgentError::Cancelled);
        }
        match error {
            Some(make) => Err(make()),
            None => Ok(value.to_string()),
        }
    }
}

#[async_trait]
impl Assistant for MockAssistant {
    async fn title(&self, _conversation: &Conversation, cancel: &CancellationToken) -> Result<String> {
        self.respond(&self.title, self.title_error.as_ref(), cancel).await
    }

    async fn reply(&self, _conversation: &Conversation, cancel: &CancellationToken) -> Result<String> {
        self.respond(&self.reply, self.reply_error.as_ref(), cancel).await
    }
}

/// Memory store that counts writes
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryConversationStore,
    creates: AtomicUsize,
    updates: AtomicUsize,
}

impl RecordingStore {
    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConversationStore for RecordingStore {
    async fn create(&self, conversation: &Conversation) -> Result<()> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(conversation).await
    }

    async fn update(&self, conversation: &Conversation) -> Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update(conversation).await
    }

    async fn describe(&self, id: &ConversationId) -> Result<Conversation> {
        self.inner.describe(id).await
    }

    async fn list(&self) -> Result<Vec<ConversationSummary>> {
        self.inner.list().await
    }
}
