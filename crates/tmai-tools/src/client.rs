//! Token Metrics Client
//!
//! Owns the resolved settings and one [`EndpointTool`] per catalog entry.
//! Construction fails without an API key, so a built client is always
//! usable. Read-only afterwards; share it behind an `Arc`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use agent_core::{ToolCall, ToolRegistry, ToolResult};

use crate::adapter::{EndpointTool, ToolOutput};
use crate::catalog::catalog;
use crate::config::{ClientConfig, ClientSettings};
use crate::error::{Result, ToolError};
use crate::spec::ToolSpec;
use crate::transport::{HttpTransport, Transport};

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

pub struct TokenMetricsClient {
    settings: Arc<ClientSettings>,
    tools: BTreeMap<&'static str, Arc<EndpointTool>>,
}

impl fmt::Debug for TokenMetricsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenMetricsClient")
            .field("settings", &self.settings)
            .field("tools", &self.names())
            .finish()
    }
}

impl TokenMetricsClient {
    /// Client over the live API
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Client configured entirely from the environment
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::default())
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn get(&self, name: &str) -> Option<Arc<EndpointTool>> {
        self.tools.get(name).cloned()
    }

    /// Tool names, ordered
    pub fn names(&self) -> Vec<&'static str> {
        self.tools.keys().copied().collect()
    }

    pub fn specs(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.values().map(|t| t.spec())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool by name
    pub async fn invoke(&self, name: &str, args: &HashMap<String, Value>) -> Result<ToolOutput> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::validation(format!("unknown tool '{name}'")))?;
        tool.invoke(args).await
    }

    /// Invoke a tool for an agent; never fails, errors become messages
    pub async fn call(&self, call: &ToolCall) -> ToolResult {
        match self.get(&call.name) {
            Some(tool) => tool.call(call).await,
            None => ToolResult::failure(
                call.name.clone(),
                format!("Error: unknown tool '{}'", call.name),
            )
            .for_call(call),
        }
    }

    /// Every tool, registered with an agent framework registry
    pub fn tool_registry(&self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        for tool in self.tools.values() {
            registry.register_boxed(tool.clone());
        }
        registry
    }
}

/// Builder for [`TokenMetricsClient`]
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Arc<dyn Transport>>,
    specs: Option<Vec<ToolSpec>>,
    env: Option<EnvLookup>,
}

impl ClientBuilder {
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config = self.config.with_api_key(api_key);
        self
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config = self.config.with_base_url(base_url);
        self
    }

    /// Replace the HTTP transport (tests, offline demos)
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Replace the built-in catalog
    #[must_use]
    pub fn specs(mut self, specs: Vec<ToolSpec>) -> Self {
        self.specs = Some(specs);
        self
    }

    /// Resolve settings against `lookup` instead of the process environment
    #[must_use]
    pub fn env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + 'static,
    {
        self.env = Some(Box::new(lookup));
        self
    }

    pub fn build(self) -> Result<TokenMetricsClient> {
        let settings = match self.env {
            Some(lookup) => self.config.resolve_with(lookup)?,
            None => self.config.resolve()?,
        };
        let settings = Arc::new(settings);

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&settings)?),
        };

        let mut tools = BTreeMap::new();
        for spec in self.specs.unwrap_or_else(catalog) {
            let name = spec.name;
            let tool = EndpointTool::new(spec, settings.clone(), transport.clone());
            if tools.insert(name, Arc::new(tool)).is_some() {
                return Err(ToolError::config(format!("duplicate tool name '{name}'")));
            }
        }

        info!(
            tools = tools.len(),
            base_url = settings.base_url(),
            transport = transport.name(),
            "Token Metrics client ready"
        );

        Ok(TokenMetricsClient { settings, tools })
    }
}
