//! # agent-core
//!
//! Agent orchestration engine: tool registry, bounded reasoning loop, title
//! generation, and the conversation orchestrator that ties them to storage.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                     ConversationService                          │
//! │   ┌──────────────┐      ┌──────────────┐     ┌────────────────┐  │
//! │   │    Title     │      │   Reasoning  │     │ Conversation   │  │
//! │   │  Generator   │      │     Loop     │     │    Store       │  │
//! │   └──────┬───────┘      └──┬────────┬──┘     └────────────────┘  │
//! │          │                 │        │                            │
//! │   ┌──────┴─────────────────┴──┐  ┌──┴──────────┐                 │
//! │   │    LlmProvider (Strategy) │  │ ToolRegistry│                 │
//! │   └───────────────────────────┘  └─────────────┘                 │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait enables swapping between OpenAI, Ollama, or any
//! other OpenAI-compatible backend without changing agent logic.

pub mod conversation;
pub mod error;
pub mod message;
pub mod orchestrator;
pub mod provider;
pub mod reasoning;
pub mod title;
pub mod tool;

#[cfg(test)]
mod testing;

pub use conversation::{
    Author, Conversation, ConversationId, ConversationMessage, ConversationStore,
    ConversationSummary, MemoryConversationStore,
};
pub use error::{AgentError, Result};
pub use message::{Message, Role};
pub use orchestrator::{AgentAssistant, Assistant, ConversationService, StartedConversation};
pub use provider::{Completion, GenerationOptions, LlmProvider};
pub use reasoning::{Agent, AgentBuilder, AgentConfig};
pub use title::{TitleConfig, TitleGenerator};
pub use tool::{Tool, ToolCall, ToolDefinition, ToolRegistry, ToolResult, ToolSchema};
pub use tokio_util::sync::CancellationToken;
