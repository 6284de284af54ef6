//! Application State

use std::sync::Arc;

use tmai_tools::TokenMetricsClient;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Token Metrics tools, one per endpoint
    pub client: Arc<TokenMetricsClient>,
}
