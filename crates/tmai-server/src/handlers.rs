//! HTTP Handlers

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use serde_json::Value;

use agent_core::{ToolCall, ToolResult};
use tmai_tools::{ErrorKind, ToolError, ToolOutput};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub tools: usize,
    pub base_url: String,
}

#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    /// Function-calling definitions, ordered by tool name
    pub tools: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(err: &ToolError) -> ApiError {
    let (status, code) = match err.kind() {
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::Network => (StatusCode::BAD_GATEWAY, "NETWORK_ERROR"),
        ErrorKind::Api => (StatusCode::BAD_GATEWAY, "API_ERROR"),
        ErrorKind::Parse => (StatusCode::BAD_GATEWAY, "PARSE_ERROR"),
        ErrorKind::Config => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
    };
    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        tools: state.client.len(),
        base_url: state.client.settings().base_url().to_string(),
    })
}

/// Tool definitions for LLM function calling
pub async fn list_tools(State(state): State<AppState>) -> Json<ToolsResponse> {
    let tools = state
        .client
        .specs()
        .map(|spec| spec.schema().to_function_definition())
        .collect();
    Json(ToolsResponse { tools })
}

/// Invoke one tool with a JSON object of arguments
pub async fn invoke_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(args): Json<HashMap<String, Value>>,
) -> Result<Json<ToolOutput>, ApiError> {
    let tool = state.client.get(&name).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Unknown tool: {name}"),
                code: "TOOL_NOT_FOUND".into(),
            }),
        )
    })?;

    tool.invoke(&args).await.map(Json).map_err(|e| {
        tracing::warn!(tool = %name, error = %e, "Tool invocation failed");
        error_response(&e)
    })
}

/// Agent-style call: failures come back as a `ToolResult`, not an HTTP error
pub async fn call_tool(
    State(state): State<AppState>,
    Json(mut call): Json<ToolCall>,
) -> Json<ToolResult> {
    if call.id.is_none() {
        call.id = Some(uuid::Uuid::new_v4().to_string());
    }
    Json(state.client.call(&call).await)
}
