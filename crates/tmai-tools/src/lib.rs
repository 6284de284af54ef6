//! # tmai-tools
//!
//! Token Metrics crypto-data endpoints as agent tools.
//!
//! ## Architecture
//!
//! ```text
//! ToolCall ─▶ TokenMetricsClient ─▶ EndpointTool (one per ToolSpec)
//!                                     │
//!          validate ─▶ build ─▶ page/fetch ─▶ normalize ─▶ ToolOutput
//!             │          │          │             │
//!          schema    request    pagination    normalize
//!                               transport
//! ```
//!
//! Every endpoint is a row in [`catalog`]; the pipeline is shared. Errors
//! of any stage come back as a [`ToolError`], and cross the
//! `agent_core::Tool` boundary as a failed result with a readable message.
//!
//! ```no_run
//! # async fn demo() -> tmai_tools::Result<()> {
//! use std::collections::HashMap;
//! use tmai_tools::TokenMetricsClient;
//!
//! let client = TokenMetricsClient::from_env()?;
//! let mut args = HashMap::new();
//! args.insert("top_k".to_string(), serde_json::json!(10));
//! let output = client.invoke("get_top_tokens", &args).await?;
//! println!("{}", output.summary);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod request;
pub mod schema;
pub mod spec;
pub mod transport;

pub use adapter::{EndpointTool, ToolOutput};
pub use catalog::catalog;
pub use client::{ClientBuilder, TokenMetricsClient};
pub use config::{ClientConfig, ClientSettings};
pub use error::{ErrorKind, Result, ToolError};
pub use normalize::Record;
pub use schema::{ParamKind, ParamSpec, ParamValue};
pub use spec::{DateRange, PageConfig, ToolSpec};
pub use transport::{HttpTransport, MockTransport, Transport};
