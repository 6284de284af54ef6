//! Tool System
//!
//! The contract between an agent loop and the capabilities it can call.
//! Tools describe themselves with a [`ToolSchema`], receive a [`ToolCall`]
//! and answer with a [`ToolResult`]. Failures cross this boundary as
//! plain text so the agent can reason about them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// Tool call request from the LLM
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool identifier
    pub name: String,

    /// Arguments as key-value pairs
    #[serde(default)]
    pub arguments: HashMap<String, Value>,

    /// Optional call ID for tracking
    #[serde(default)]
    pub id: Option<String>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: HashMap::new(),
            id: None,
        }
    }

    /// Add an argument
    #[must_use]
    pub fn arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Result from tool execution
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,

    /// Call ID (if provided in request)
    pub id: Option<String>,

    /// Whether execution succeeded
    pub success: bool,

    /// Output (summary text or error message)
    pub output: String,

    /// Structured data (if applicable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ToolResult {
    pub fn success(name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: true,
            output: output.into(),
            data: None,
        }
    }

    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            success: false,
            output: error.into(),
            data: None,
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach the call's ID, if it had one
    #[must_use]
    pub fn for_call(mut self, call: &ToolCall) -> Self {
        self.id.clone_from(&call.id);
        self
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
    pub default: Option<Value>,

    /// Enum of allowed values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    /// JSON Schema format hint (e.g. "date")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl ParameterSchema {
    /// JSON Schema fragment for this parameter
    pub fn to_json_schema(&self) -> Value {
        let mut property = Map::new();
        property.insert("type".into(), json!(self.param_type));
        property.insert("description".into(), json!(self.description));
        if let Some(default) = &self.default {
            property.insert("default".into(), default.clone());
        }
        if let Some(values) = &self.enum_values {
            property.insert("enum".into(), json!(values));
        }
        if let Some(format) = &self.format {
            property.insert("format".into(), json!(format));
        }
        Value::Object(property)
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

    /// Category for grouping
    #[serde(default)]
    pub category: Option<String>,

    /// Whether tool has side effects
    #[serde(default)]
    pub has_side_effects: bool,
}

impl ToolSchema {
    /// Render as a function-calling definition:
    /// `{"name", "description", "parameters": {JSON Schema object}}`
    pub fn to_function_definition(&self) -> Value {
        let properties: Map<String, Value> = self
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.to_json_schema()))
            .collect();
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "name": self.name,
            "description": self.description,
            "parameters": {
                "type": "object",
                "properties": properties,
                "required": required,
            },
        })
    }
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for LLM function calling
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult>;

    /// Validate arguments before execution (optional)
    fn validate(&self, call: &ToolCall) -> Result<()> {
        let schema = self.schema();

        for param in &schema.parameters {
            let present = call
                .arguments
                .get(&param.name)
                .is_some_and(|v| !v.is_null());
            if param.required && !present {
                return Err(AgentError::ToolValidation(format!(
                    "Missing required parameter: {}",
                    param.name
                )));
            }
        }

        Ok(())
    }
}

/// Registry for available tools
///
/// Read-only once built; share it behind an `Arc`.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_boxed(Arc::new(tool));
    }

    /// Register a shared tool
    pub fn register_boxed(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        if self.tools.insert(schema.name.clone(), tool).is_some() {
            tracing::warn!(tool = %schema.name, "Replaced previously registered tool");
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Execute a tool call
    pub async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
        let tool = self.get(&call.name).ok_or_else(|| {
            AgentError::ToolNotFound(call.name.clone())
        })?;

        tool.validate(call)?;

        tool.execute(call).await.map(|r| r.for_call(call))
    }

    /// Execute a tool call, folding every error into a failed [`ToolResult`]
    pub async fn call(&self, call: &ToolCall) -> ToolResult {
        match self.execute(call).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool call failed");
                ToolResult::failure(call.name.clone(), e.user_message()).for_call(call)
            }
        }
    }

    /// Get all tool schemas, ordered by name
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Function-calling definitions for every registered tool
    pub fn function_definitions(&self) -> Vec<Value> {
        self.schemas()
            .iter()
            .map(ToolSchema::to_function_definition)
            .collect()
    }

    /// Get tool names, ordered
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

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "echo".into(),
                description: "Echo the given text".into(),
                parameters: vec![
                    ParameterSchema {
                        name: "text".into(),
                        param_type: "string".into(),
                        description: "Text to echo".into(),
                        required: true,
                        default: None,
                        enum_values: None,
                        format: None,
                    },
                    ParameterSchema {
                        name: "mode".into(),
                        param_type: "string".into(),
                        description: "Output mode".into(),
                        required: false,
                        default: Some(json!("plain")),
                        enum_values: Some(vec![json!("plain"), json!("upper")]),
                        format: None,
                    },
                ],
                category: Some("test".into()),
                has_side_effects: false,
            }
        }

        async fn execute(&self, call: &ToolCall) -> Result<ToolResult> {
            let text = call
                .arguments
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default();
            Ok(ToolResult::success("echo", text))
        }
    }

    #[test]
    fn test_tool_registry() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names(), vec!["echo"]);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("unknown").is_none());
    }

    #[tokio::test]
    async fn test_execute_attaches_call_id() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let call = ToolCall::new("echo").arg("text", "hi").with_id("call-1");
        let result = registry.execute(&call).await.unwrap();
        assert!(result.success);
        assert_eq!(result.output, "hi");
        assert_eq!(result.id.as_deref(), Some("call-1"));
    }

    #[tokio::test]
    async fn test_call_folds_errors_into_failures() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let missing = registry.call(&ToolCall::new("echo").arg("text", Value::Null)).await;
        assert!(!missing.success);
        assert!(missing.output.contains("text"));

        let unknown = registry.call(&ToolCall::new("nope")).await;
        assert!(!unknown.success);
        assert!(unknown.output.contains("nope"));
    }

    #[test]
    fn test_function_definition_shape() {
        let def = EchoTool.schema().to_function_definition();
        assert_eq!(def["name"], "echo");
        assert_eq!(def["parameters"]["type"], "object");
        assert_eq!(def["parameters"]["required"], json!(["text"]));
        assert_eq!(def["parameters"]["properties"]["mode"]["enum"], json!(["plain", "upper"]));
        assert_eq!(def["parameters"]["properties"]["mode"]["default"], "plain");
    }
}
