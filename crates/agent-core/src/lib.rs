//! # agent-core
//!
//! The tool contract shared by agent frameworks and tool providers.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ToolCall    ┌──────────────┐   execute   ┌──────────┐
//! │ Agent / HTTP │ ────────────▶ │ ToolRegistry │ ──────────▶ │ dyn Tool │
//! │    caller    │ ◀──────────── │              │ ◀────────── │          │
//! └──────────────┘   ToolResult  └──────────────┘             └──────────┘
//! ```
//!
//! Tools describe themselves with a [`ToolSchema`] that renders as a
//! function-calling definition, so any LLM runtime can drive them.

pub mod error;
pub mod tool;

pub use error::{AgentError, Result};
pub use tool::{ParameterSchema, Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
