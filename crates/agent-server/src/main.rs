//! travel-chat HTTP Server
//!
//! Axum-based server exposing the chat service RPCs and a health check.
//! The assistant answers travel questions with weather, forecast, airport
//! and public-holiday tools.

mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;
use std::time::Instant;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{
    tool::{TimeInZoneTool, TodayDateTool, ToolRegistry},
    AgentAssistant, AgentBuilder, ConversationService, ConversationStore, GenerationOptions,
    LlmProvider, MemoryConversationStore, TitleConfig, TitleGenerator,
};
use agent_runtime::{FileConversationStore, OpenAiProvider};
use travel_tools::TravelServices;

use crate::config::ServerConfig;
use crate::routes::{router, RPC_PREFIX};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();
    let config = ServerConfig::from_env();

    // Initialize LLM provider
    let provider: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::from_config(config.openai.clone())?);

    match provider.health_check().await {
        Ok(true) => tracing::info!(base_url = %config.openai.base_url, "✓ Connected to LLM provider"),
        Ok(false) | Err(_) => {
            tracing::warn!(base_url = %config.openai.base_url, "⚠ LLM provider not reachable - replies will fail");
            tracing::warn!("  Set OPENAI_API_KEY (and OPENAI_BASE_URL for a local server) in .env");
        }
    }

    // Initialize tools
    let mut tools = ToolRegistry::new();
    tools.register(TodayDateTool);
    tools.register(TimeInZoneTool);
    TravelServices::http(config.weather_api_key.clone(), &config.holiday_calendar_link)?
        .register(&mut tools);

    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }
    if config.weather_api_key.is_none() {
        tracing::warn!("⚠ WEATHER_API_KEY not set - weather tools will report an error");
    }

    // Conversation storage
    let store: Arc<dyn ConversationStore> = match &config.conversation_dir {
        Some(dir) => Arc::new(FileConversationStore::open(dir).await?),
        None => {
            tracing::info!("CONVERSATION_DIR not set - conversations are kept in memory");
            Arc::new(MemoryConversationStore::new())
        }
    };

    // Agent and title generator
    let agent = AgentBuilder::new()
        .provider(Arc::clone(&provider))
        .tools(tools)
        .model(&config.reply_model)
        .build()?;
    let titles = TitleGenerator::new(
        Arc::clone(&provider),
        TitleConfig {
            generation: GenerationOptions::for_model(&config.title_model),
            ..Default::default()
        },
    );
    let service = ConversationService::new(Arc::new(AgentAssistant::new(agent, titles)), store);

    // Build application state
    let state = AppState {
        service: Arc::new(service),
        request_timeout: config.request_timeout,
        llm_configured: config.openai.api_key.is_some(),
        weather_configured: config.weather_api_key.is_some(),
        started_at: Instant::now(),
    };

    let app = router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 travel-chat server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /        - Greeting");
    tracing::info!("  GET  /health  - Health check");
    for method in [
        "StartConversation",
        "ContinueConversation",
        "DescribeConversation",
        "ListConversations",
    ] {
        tracing::info!("  POST {}/{}", RPC_PREFIX, method);
    }
    tracing::info!("");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
