//! # agent-runtime
//!
//! Concrete backends for the travel-chat agent system.
//!
//! ## Providers
//!
//! - **OpenAI** (default): `/chat/completions` with function calling; also
//!   works against Ollama, vLLM or any OpenAI-compatible server
//!
//! ## Stores
//!
//! - **File** (default): one JSON document per conversation
//! - **Memory**: re-exported from `agent-core`, for tests and ephemeral runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::{FileConversationStore, OpenAiProvider};
//!
//! let provider = Arc::new(OpenAiProvider::from_env()?);
//! let store = Arc::new(FileConversationStore::open("./data/conversations").await?);
//! let agent = AgentBuilder::new()
//!     .provider(provider)
//!     .build()?;
//! ```

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "file-store")]
pub mod file_store;

#[cfg(feature = "openai")]
pub use openai::{OpenAiConfig, OpenAiProvider};

#[cfg(feature = "file-store")]
pub use file_store::FileConversationStore;

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, ConversationService, ConversationStore, LlmProvider,
    MemoryConversationStore, Message, Result, Role, Tool, ToolRegistry,
};
