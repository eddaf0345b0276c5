//! Title Generation
//!
//! One-shot summary of what the user is asking about. Only user turns are
//! sent; the model is told to summarize, not answer.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::conversation::Conversation;
use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::provider::{GenerationOptions, LlmProvider};
use crate::reasoning::cancellable;

/// Title for a conversation that has no messages
pub const EMPTY_CONVERSATION_TITLE: &str = "An empty conversation";

const TITLE_SYSTEM_PROMPT: &str = "You write titles for chat conversations. \
Summarize the TOPIC of the user's messages in at most 8 words. Do NOT answer the question. \
Reply with the title only: no quotes, no trailing punctuation, no emojis. \
Examples: Weather in Barcelona, Today's Date, Upcoming Public Holidays.";

#[derive(Clone, Debug)]
pub struct TitleConfig {
    pub system_prompt: String,
    /// Titles are cut to this many characters
    pub max_chars: usize,
    pub generation: GenerationOptions,
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            system_prompt: TITLE_SYSTEM_PROMPT.into(),
            max_chars: 80,
            generation: GenerationOptions::for_model("gpt-4o-mini"),
        }
    }
}

pub struct TitleGenerator {
    provider: Arc<dyn LlmProvider>,
    config: TitleConfig,
}

impl TitleGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, config: TitleConfig) -> Self {
        Self { provider, config }
    }

    pub fn with_defaults(provider: Arc<dyn LlmProvider>) -> Self {
        Self::new(provider, TitleConfig::default())
    }

    pub async fn generate(
        &self,
        conversation: &Conversation,
        cancel: &CancellationToken,
    ) -> Result<String> {
        if conversation.is_empty() {
            return Ok(EMPTY_CONVERSATION_TITLE.into());
        }

        tracing::info!(conversation_id = %conversation.id, "Generating title");

        let mut messages = vec![Message::system(&self.config.system_prompt)];
        messages.extend(conversation.user_messages().map(|m| Message::user(&m.content)));

        let completion = cancellable(
            cancel,
            self.provider.complete(&messages, &[], &self.config.generation),
        )
        .await
        .map_err(|e| match e {
            AgentError::Cancelled => AgentError::Cancelled,
            other => AgentError::TitleGeneration(other.to_string()),
        })?;

        let title = sanitize_title(&completion.content, self.config.max_chars);
        if title.is_empty() {
            return Err(AgentError::TitleGeneration(
                "model returned an empty title".into(),
            ));
        }
        Ok(title)
    }
}

/// Single line, no surrounding quotes or dashes, at most `max_chars` chars
pub fn sanitize_title(raw: &str, max_chars: usize) -> String {
    let single_line = raw.replace(['\r', '\n'], " ");
    let trimmed = single_line.trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '"' | '\''));
    trimmed.chars().take(max_chars).collect::<String>().trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use crate::provider::Completion;
    use crate::testing::ScriptedProvider;

    #[test]
    fn test_sanitize_title() {
        assert_eq!(sanitize_title("\"Weather in Barcelona\"\n", 80), "Weather in Barcelona");
        assert_eq!(sanitize_title("- Trip\nPlanning -", 80), "Trip Planning");
        assert_eq!(sanitize_title("   ", 80), "");

        let long = "word ".repeat(40);
        let title = sanitize_title(&long, 80);
        assert!(title.chars().count() <= 80);
        assert!(!title.contains('\n'));
    }

    #[test]
    fn test_sanitize_counts_characters_not_bytes() {
        let title = sanitize_title(&"é".repeat(100), 80);
        assert_eq!(title.chars().count(), 80);
    }

    #[tokio::test]
    async fn test_empty_conversation_skips_model() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let generator = TitleGenerator::with_defaults(provider.clone());
        let mut conversation = Conversation::start("x");
        conversation.messages.clear();

        let title = generator
            .generate(&conversation, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(title, EMPTY_CONVERSATION_TITLE);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_only_user_messages_are_sent() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(Completion::text(
            "'Barcelona Weather'",
        ))]));
        let generator = TitleGenerator::with_defaults(provider.clone());
        let mut conversation = Conversation::start("Weather in Barcelona?");
        conversation.push_assistant("It is sunny.");

        let title = generator
            .generate(&conversation, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(title, "Barcelona Weather");
        let request = &provider.requests()[0];
        assert_eq!(request.len(), 2);
        assert_eq!(request[0].role, Role::System);
        assert_eq!(request[1].content, "Weather in Barcelona?");
        assert!(provider.tool_counts().iter().all(|&n| n == 0));
    }

    #[tokio::test]
    async fn test_blank_title_fails() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(Completion::text(" \"\" "))]));
        let generator = TitleGenerator::with_defaults(provider);

        let err = generator
            .generate(&Conversation::start("hi"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::TitleGeneration(_)));
    }

    #[tokio::test]
    async fn test_provider_error_becomes_title_error() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(AgentError::Provider(
            "boom".into(),
        ))]));
        let generator = TitleGenerator::with_defaults(provider);

        let err = generator
            .generate(&Conversation::start("hi"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::TitleGeneration(msg) if msg.contains("boom")));
    }
}
