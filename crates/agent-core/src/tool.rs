//! Tool System
//!
//! Extensible tool framework for agent capabilities.
//! Tools are registered once at startup and invoked by the reasoning loop.
//! The registry is read-only afterwards and is shared between conversations
//! behind an `Arc`.

use async_trait::async_trait;
use chrono::SecondsFormat;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// Tool call request from the LLM
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Correlation id assigned by the provider
    pub id: String,

    /// Tool identifier
    pub name: String,

    /// Raw, still-unparsed argument payload (JSON text)
    #[serde(default)]
    pub arguments: String,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// Result from tool execution
///
/// A failed result is still plain text for the model to read; only an `Err`
/// from [`Tool::execute`] aborts the reasoning loop.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,

    /// Whether execution succeeded
    pub success: bool,

    /// Output (success message or error)
    pub output: String,
}

impl ToolResult {
    pub fn success(name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: true,
            output: output.into(),
        }
    }

    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            success: false,
            output: error.into(),
        }
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, integer, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,

    /// Default value if not provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,

    /// Enum of allowed values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<serde_json::Value>>,
}

impl ParameterSchema {
    pub fn required(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: description.into(),
            required: true,
            default: None,
            enum_values: None,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type, description)
        }
    }
}

/// Tool definition schema (for LLM function calling)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,
}

impl ToolSchema {
    /// Render the parameters as a JSON Schema object
    pub fn json_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            let mut property = serde_json::Map::new();
            property.insert("type".into(), json!(param.param_type));
            if !param.description.is_empty() {
                property.insert("description".into(), json!(param.description));
            }
            if let Some(values) = &param.enum_values {
                property.insert("enum".into(), json!(values));
            }
            if let Some(default) = &param.default {
                property.insert("default".into(), default.clone());
            }
            properties.insert(param.name.clone(), serde_json::Value::Object(property));

            if param.required {
                required.push(param.name.clone());
            }
        }

        let mut schema = json!({ "type": "object", "properties": properties });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }

    pub fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone(),
            parameters: self.json_schema(),
        }
    }
}

/// What the model is told about a tool on every request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Tool trait - implement to add new capabilities
///
/// `execute` receives the raw argument payload exactly as the model produced
/// it. Malformed arguments and downstream API failures must come back as an
/// `Ok` result (usually [`ToolResult::failure`]) so the model can correct
/// itself on the next round-trip.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for LLM function calling
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with the raw JSON arguments
    async fn execute(&self, arguments: &str) -> Result<ToolResult>;
}

/// Deserialize tool arguments, treating an empty payload as `{}`
pub fn parse_arguments<T: DeserializeOwned>(raw: &str) -> serde_json::Result<T> {
    let raw = raw.trim();
    if raw.is_empty() {
        serde_json::from_str("{}")
    } else {
        serde_json::from_str(raw)
    }
}

/// Registry for available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a new tool; a later registration under the same name wins
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_arc(Arc::new(tool));
    }

    /// Register a shared tool
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.schema().name;
        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::warn!(tool = %name, "Tool registered twice, keeping the latest");
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Definitions advertised to the model; order is unspecified
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.schema().definition()).collect()
    }

    /// Route a call to the named tool
    pub async fn execute(&self, name: &str, arguments: &str) -> Result<ToolResult> {
        let tool = self
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;

        tool.execute(arguments).await
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

// ============================================================================
// Built-in Tools
// ============================================================================

/// Today's date tool - returns the local date and time
pub struct TodayDateTool;

#[async_trait]
impl Tool for TodayDateTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_today_date".into(),
            description: "Get today's date and time in RFC3339 format".into(),
            parameters: Vec::new(),
        }
    }

    async fn execute(&self, _arguments: &str) -> Result<ToolResult> {
        let now = chrono::Local::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        Ok(ToolResult::success("get_today_date", now))
    }
}

/// Time zone tool - current time in an IANA zone
pub struct TimeInZoneTool;

#[derive(Deserialize)]
struct TimeInZoneArgs {
    timezone: String,
}

#[async_trait]
impl Tool for TimeInZoneTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_time_in_zone".into(),
            description: "Get current time in a specific IANA time zone (e.g., 'America/New_York', 'Europe/London', 'Asia/Tokyo')".into(),
            parameters: vec![ParameterSchema::required(
                "timezone",
                "string",
                "IANA time zone name (e.g. America/New_York)",
            )],
        }
    }

    async fn execute(&self, arguments: &str) -> Result<ToolResult> {
        let Ok(args) = parse_arguments::<TimeInZoneArgs>(arguments) else {
            return Ok(ToolResult::failure(
                "get_time_in_zone",
                "failed to parse timezone parameter",
            ));
        };

        match args.timezone.parse::<chrono_tz::Tz>() {
            Ok(tz) => {
                let now = chrono::Utc::now()
                    .with_timezone(&tz)
                    .to_rfc3339_opts(SecondsFormat::Secs, true);
                Ok(ToolResult::success("get_time_in_zone", now))
            }
            Err(e) => Ok(ToolResult::failure(
                "get_time_in_zone",
                format!("invalid timezone '{}': {}", args.timezone, e),
            )),
        }
    }
}
