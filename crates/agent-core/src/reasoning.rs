//! Reasoning Loop
//!
//! Implements the bounded ReAct (Reason + Act) loop that turns a conversation
//! into one assistant reply. The loop is an explicit state machine:
//!
//! ```text
//! AwaitingModel ──tool calls──▶ ExecutingTools ──results appended──▶ AwaitingModel
//!       │
//!       ├── final text ──▶ Done
//!       └── ceiling hit ──▶ Exhausted
//! ```
//!
//! Round-trips and tool calls within a round-trip run strictly in order, so
//! tool results always follow the assistant message that requested them.

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::conversation::{Author, Conversation};
use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::provider::{GenerationOptions, LlmProvider};
use crate::tool::{ToolCall, ToolDefinition, ToolRegistry};

/// Round-trips to the model allowed for one reply
pub const MAX_ITERATIONS: usize = 15;

/// Reply returned when the iteration ceiling is reached
pub const MAX_ITERATIONS_REPLY: &str = "I'm sorry, I couldn't finish working on that request. \
Could you try rephrasing it or breaking it into smaller questions?";

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, concise travel assistant. \
Use the available tools for weather, forecasts, airports, public holidays and the current date or time \
instead of guessing. Provide accurate, safe and clear answers.";

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System prompt prepended to every request
    pub system_prompt: String,

    /// Maximum model round-trips before giving up
    pub max_iterations: usize,

    /// Generation options
    pub generation: GenerationOptions,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: MAX_ITERATIONS,
            generation: GenerationOptions::default(),
        }
    }
}

/// State of one reply run
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoopState {
    AwaitingModel,
    ExecutingTools(Vec<ToolCall>),
    Done(String),
    Exhausted,
}

impl LoopState {
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Exhausted)
    }
}

/// Outcome of a finished reply run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyOutcome {
    pub reply: String,
    pub round_trips: usize,
    pub exhausted: bool,
}

/// Race `fut` against the caller's cancellation
pub(crate) async fn cancellable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(AgentError::Cancelled),
        result = fut => result,
    }
}

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults(provider: Arc<dyn LlmProvider>, tools: Arc<ToolRegistry>) -> Self {
        Self::new(provider, tools, AgentConfig::default())
    }

    /// System prompt followed by the persisted turns, mapped 1:1
    pub fn build_messages(&self, conversation: &Conversation) -> Vec<Message> {
        let mut messages = Vec::with_capacity(conversation.message_count() + 1);
        messages.push(Message::system(&self.config.system_prompt));
        messages.extend(conversation.messages.iter().map(|m| match m.role {
            Author::User => Message::user(&m.content),
            Author::Assistant => Message::assistant(&m.content),
        }));
        messages
    }

    /// Produce the assistant's reply for `conversation`
    pub async fn reply(
        &self,
        conversation: &Conversation,
        cancel: &CancellationToken,
    ) -> Result<String> {
        self.run(conversation, cancel).await.map(|outcome| outcome.reply)
    }

    /// Drive the loop to a terminal state
    pub async fn run(
        &self,
        conversation: &Conversation,
        cancel: &CancellationToken,
    ) -> Result<ReplyOutcome> {
        if conversation.is_empty() {
            return Err(AgentError::EmptyConversation);
        }

        tracing::info!(conversation_id = %conversation.id, "Generating reply");

        let mut run = ReplyRun::new(self, self.build_messages(conversation));
        while !run.state.is_terminal() {
            run.step(cancel).await?;
        }

        Ok(run.finish())
    }
}

/// In-flight state of one reply; owns its private message list
struct ReplyRun<'a> {
    agent: &'a Agent,
    messages: Vec<Message>,
    definitions: Vec<ToolDefinition>,
    round_trips: usize,
    state: LoopState,
}

impl<'a> ReplyRun<'a> {
    fn new(agent: &'a Agent, messages: Vec<Message>) -> Self {
        Self {
            agent,
            messages,
            definitions: agent.tools.definitions(),
            round_trips: 0,
            state: LoopState::AwaitingModel,
        }
    }

    async fn step(&mut self, cancel: &CancellationToken) -> Result<()> {
        let state = std::mem::replace(&mut self.state, LoopState::AwaitingModel);
        self.state = match state {
            LoopState::AwaitingModel => self.ask_model(cancel).await?,
            LoopState::ExecutingTools(calls) => self.execute_tools(calls, cancel).await?,
            terminal => terminal,
        };
        Ok(())
    }

    async fn ask_model(&mut self, cancel: &CancellationToken) -> Result<LoopState> {
        if self.round_trips >= self.agent.config.max_iterations {
            return Ok(LoopState::Exhausted);
        }
        self.round_trips += 1;

        let completion = cancellable(
            cancel,
            self.agent.provider.complete(
                &self.messages,
                &self.definitions,
                &self.agent.config.generation,
            ),
        )
        .await?;

        if !completion.requests_tools() {
            if completion.content.trim().is_empty() {
                return Err(AgentError::NoModelOutput);
            }
            return Ok(LoopState::Done(completion.content));
        }

        self.messages.push(Message::assistant_with_tool_calls(
            completion.content,
            completion.tool_calls.clone(),
        ));
        Ok(LoopState::ExecutingTools(completion.tool_calls))
    }

    async fn execute_tools(
        &mut self,
        calls: Vec<ToolCall>,
        cancel: &CancellationToken,
    ) -> Result<LoopState> {
        for call in calls {
            tracing::info!(
                tool = %call.name,
                args = %call.arguments,
                round_trip = self.round_trips,
                "Tool call received"
            );

            let result = cancellable(
                cancel,
                self.agent.tools.execute(&call.name, &call.arguments),
            )
            .await?;

            if !result.success {
                tracing::warn!(tool = %call.name, output = %result.output, "Tool reported failure");
            }

            self.messages.push(Message::tool(result.output, call.id));
        }
        Ok(LoopState::AwaitingModel)
    }

    fn finish(self) -> ReplyOutcome {
        match self.state {
            LoopState::Done(reply) => ReplyOutcome {
                reply,
                round_trips: self.round_trips,
                exhausted: false,
            },
            _ => {
                tracing::warn!(
                    round_trips = self.round_trips,
                    "Iteration ceiling reached without a final answer"
                );
                ReplyOutcome {
                    reply: MAX_ITERATIONS_REPLY.into(),
                    round_trips: self.round_trips,
                    exhausted: true,
                }
            }
        }
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = Some(temp);
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}
