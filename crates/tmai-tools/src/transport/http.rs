//! HTTP Transport
//!
//! reqwest-backed transport for the live Token Metrics API.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, error};

use super::Transport;
use crate::config::ClientSettings;
use crate::error::{Result, ToolError};
use crate::request::ApiRequest;

const API_KEY_HEADER: &str = "x-api-key";
const USER_AGENT: &str = concat!("tmai-tools/", env!("CARGO_PKG_VERSION"));

/// Longest body excerpt quoted in a parse error
const BODY_EXCERPT: usize = 120;

/// Sends requests with the client's API key and timeout
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let mut key = HeaderValue::from_str(settings.api_key())
            .map_err(|_| ToolError::config("API key contains characters not allowed in a header"))?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ToolError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &ApiRequest) -> Result<Value> {
        debug!(path = %request.path, query = ?request.query, "Sending API request");

        let response = self
            .client
            .request(request.method.clone(), &request.url)
            .query(&request.query)
            .send()
            .await
            .map_err(|e| {
                let err = ToolError::from_transport(&e);
                error!(path = %request.path, error = %err, "API request failed");
                err
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ToolError::from_transport(&e))?;

        if !status.is_success() {
            let err = ToolError::from_status(status.as_u16(), &body);
            error!(path = %request.path, status = status.as_u16(), error = %err, "API returned an error");
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| {
            ToolError::parse("a JSON document", format!("{e} in {:?}", excerpt(&body)))
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn excerpt(body: &str) -> String {
    let mut text: String = body.trim().chars().take(BODY_EXCERPT).collect();
    if body.trim().chars().count() > BODY_EXCERPT {
        text.push_str("...");
    }
    text
}
