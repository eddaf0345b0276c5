//! Server Configuration
//!
//! Read from the environment (optionally seeded from `.env`).

use std::path::PathBuf;
use std::time::Duration;

use agent_runtime::OpenAiConfig;
use travel_tools::holidays::DEFAULT_CALENDAR_LINK;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Deadline for a single RPC; `None` waits for the model indefinitely
    pub request_timeout: Option<Duration>,
    /// File store root; `None` keeps conversations in memory
    pub conversation_dir: Option<PathBuf>,
    pub reply_model: String,
    pub title_model: String,
    pub weather_api_key: Option<String>,
    pub holiday_calendar_link: String,
    pub openai: OpenAiConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".into(),
            request_timeout: None,
            conversation_dir: None,
            reply_model: "gpt-4.1".into(),
            title_model: "gpt-4o-mini".into(),
            weather_api_key: None,
            holiday_calendar_link: DEFAULT_CALENDAR_LINK.into(),
            openai: OpenAiConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            bind_addr: non_blank("BIND_ADDR").unwrap_or(defaults.bind_addr),
            request_timeout: non_blank("REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|&secs| secs > 0)
                .map(Duration::from_secs),
            conversation_dir: non_blank("CONVERSATION_DIR").map(PathBuf::from),
            reply_model: non_blank("OPENAI_MODEL").unwrap_or(defaults.reply_model),
            title_model: non_blank("OPENAI_TITLE_MODEL").unwrap_or(defaults.title_model),
            weather_api_key: non_blank("WEATHER_API_KEY"),
            holiday_calendar_link: non_blank("HOLIDAY_CALENDAR_LINK")
                .unwrap_or(defaults.holiday_calendar_link),
            openai: OpenAiConfig::from_lookup(&lookup),
        }
    }
}
