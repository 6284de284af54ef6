//! API Transport
//!
//! The seam between the tool pipeline and the network.

mod http;
mod mock;

pub use http::HttpTransport;
pub use mock::MockTransport;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::request::ApiRequest;

/// Transport trait (Strategy pattern)
///
/// Sends one request and returns the decoded JSON body. Implementations
/// map every failure to a [`crate::ToolError`] and never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a GET and decode the body
    async fn get(&self, request: &ApiRequest) -> Result<Value>;

    /// Transport name, for logs
    fn name(&self) -> &str;
}
