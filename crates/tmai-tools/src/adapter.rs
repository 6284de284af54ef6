//! Endpoint Adapter
//!
//! [`EndpointTool`] runs one [`ToolSpec`] through the pipeline:
//! validate, build, fetch (paging when the endpoint pages), normalize.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use agent_core::{Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema};

use crate::config::ClientSettings;
use crate::error::Result;
use crate::normalize::{Record, SummaryStyle, extract_records, summarize};
use crate::pagination::PaginationDriver;
use crate::request::RequestBuilder;
use crate::schema::{ParamValue, ValidatedParams};
use crate::spec::{PageConfig, ToolSpec};
use crate::transport::Transport;

/// Normalized result of one invocation
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToolOutput {
    pub tool: String,
    pub records: Vec<Record>,
    pub summary: String,
    /// Requests issued
    pub pages: usize,
    /// Paging stopped at the page budget with data still expected
    pub truncated: bool,
}

impl ToolOutput {
    /// Records as a JSON array
    pub fn records_json(&self) -> Value {
        Value::Array(self.records.iter().cloned().map(Value::Object).collect())
    }
}

/// Agent tool backed by one API endpoint
pub struct EndpointTool {
    spec: ToolSpec,
    settings: Arc<ClientSettings>,
    transport: Arc<dyn Transport>,
}

impl EndpointTool {
    pub fn new(spec: ToolSpec, settings: Arc<ClientSettings>, transport: Arc<dyn Transport>) -> Self {
        Self {
            spec,
            settings,
            transport,
        }
    }

    pub fn name(&self) -> &'static str {
        self.spec.name
    }

    pub fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    /// Run the tool. Nothing is sent when validation fails.
    pub async fn invoke(&self, args: &HashMap<String, Value>) -> Result<ToolOutput> {
        let params = self.spec.validate(args)?;
        let builder = RequestBuilder::new(self.settings.base_url());
        let request = builder.build(&self.spec, &params);

        let (records, pages, truncated) = match &self.spec.pagination {
            Some(pager) => {
                let windows = builder.date_windows(&self.spec, &params, request);
                let outcome = PaginationDriver::new(
                    self.transport.as_ref(),
                    pager,
                    self.settings.max_pages(),
                )
                .with_cap(cap(pager, &params))
                .run(&windows)
                .await?;
                (outcome.records, outcome.requests, outcome.truncated)
            }
            None => {
                let body = self.transport.get(&request).await?;
                (extract_records(&body)?, 1, false)
            }
        };

        let style = SummaryStyle {
            tool: self.spec.name,
            empty_message: self.spec.empty_message,
            fields: self.spec.summary_fields,
            preview_rows: self.settings.preview_rows(),
        };
        let summary = summarize(&records, &style, truncated);

        info!(
            tool = self.spec.name,
            transport = self.transport.name(),
            records = records.len(),
            pages,
            truncated,
            "Tool completed"
        );

        Ok(ToolOutput {
            tool: self.spec.name.to_string(),
            records,
            summary,
            pages,
            truncated,
        })
    }

    /// Run the tool for an agent: the summary on success, the error's
    /// message on failure
    pub async fn call(&self, call: &ToolCall) -> ToolResult {
        let result = match self.invoke(&call.arguments).await {
            Ok(output) => {
                ToolResult::success(self.spec.name, output.summary.clone()).with_data(output.records_json())
            }
            Err(e) => {
                warn!(tool = self.spec.name, kind = ?e.kind(), error = %e, "Tool failed");
                ToolResult::failure(self.spec.name, e.user_message())
            }
        };
        result.for_call(call)
    }
}

fn cap(pager: &PageConfig, params: &ValidatedParams) -> Option<usize> {
    pager
        .cap_param
        .and_then(|name| params.get(name))
        .and_then(ParamValue::as_int)
        .and_then(|n| usize::try_from(n).ok())
}

#[async_trait]
impl Tool for EndpointTool {
    fn schema(&self) -> ToolSchema {
        self.spec.schema()
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        Ok(self.call(call).await)
    }

    /// Checked inside [`EndpointTool::invoke`], so bad input comes back
    /// as a failed result rather than an error
    fn validate(&self, _call: &ToolCall) -> CoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::catalog;
    use crate::config::ClientConfig;
    use crate::error::{ErrorKind, ToolError};
    use crate::transport::MockTransport;
    use serde_json::json;

    fn settings() -> Arc<ClientSettings> {
        Arc::new(
            ClientConfig::new()
                .with_api_key("k")
                .with_base_url("https://api.example.com/v2")
                .resolve_with(|_| None)
                .unwrap(),
        )
    }

    fn tool(name: &str, transport: Arc<MockTransport>) -> EndpointTool {
        let spec = catalog().into_iter().find(|s| s.name == name).unwrap();
        EndpointTool::new(spec, settings(), transport)
    }

    fn args(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_price_lookup() {
        let transport = Arc::new(MockTransport::fixed(json!({
            "success": true,
            "data": [{"TOKEN_ID": 3375, "TOKEN_NAME": "Bitcoin", "TOKEN_SYMBOL": "BTC", "CURRENT_PRICE": 97000}],
        })));
        let price = tool("get_crypto_price", transport.clone());

        let output = price.invoke(&args(json!({"token_id": "3375"}))).await.unwrap();
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.pages, 1);
        assert!(output.summary.starts_with("1 record(s) from get_crypto_price:"));
        assert!(output.summary.contains("CURRENT_PRICE: 97000"));

        let sent = &transport.requests()[0];
        assert_eq!(sent.url, "https://api.example.com/v2/price");
        assert_eq!(sent.query_value("token_id"), Some("3375"));
    }

    #[tokio::test]
    async fn test_missing_required_sends_nothing() {
        let transport = Arc::new(MockTransport::fixed(json!({"data": []})));
        let price = tool("get_crypto_price", transport.clone());

        let err = price.invoke(&args(json!({}))).await.unwrap_err();
        assert_eq!(err, ToolError::missing("token_id"));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_result_message() {
        let transport = Arc::new(MockTransport::fixed(json!({"success": true, "data": []})));
        let price = tool("get_crypto_price", transport);

        let output = price.invoke(&args(json!({"token_id": "1"}))).await.unwrap();
        assert!(output.records.is_empty());
        assert_eq!(output.summary, "No price data found for the specified tokens.");
    }

    #[tokio::test]
    async fn test_top_tokens_respects_top_k() {
        let rows: Vec<Value> = (0..300).map(|i| json!({"TOKEN_ID": i})).collect();
        let transport = Arc::new(MockTransport::dataset(rows));
        let top = tool("get_top_tokens", transport.clone());

        let output = top.invoke(&args(json!({"top_k": 10}))).await.unwrap();
        assert_eq!(output.records.len(), 10);
        assert_eq!(transport.request_count(), 1);
        let sent = &transport.requests()[0];
        assert_eq!(sent.query_value("limit"), Some("10"));
        assert_eq!(sent.query_value("top_k"), Some("10"));
    }

    #[tokio::test]
    async fn test_token_info_uneven_limit() {
        let rows: Vec<Value> = (0..300).map(|i| json!({"TOKEN_ID": i})).collect();
        let transport = Arc::new(MockTransport::dataset(rows));
        let info = tool("get_token_info", transport.clone());

        let output = info.invoke(&args(json!({"limit": 120}))).await.unwrap();
        let ids: Vec<i64> = output
            .records
            .iter()
            .map(|r| r["TOKEN_ID"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, (0..120).collect::<Vec<i64>>());
        assert_eq!(output.pages, 3);
        assert!(transport.requests().iter().all(|r| r.query_value("page").is_some()));
    }

    #[tokio::test]
    async fn test_top_tokens_rejects_non_positive() {
        let transport = Arc::new(MockTransport::fixed(json!({"data": []})));
        let top = tool("get_top_tokens", transport.clone());

        let err = top.invoke(&args(json!({"top_k": 0}))).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_long_range_is_chunked() {
        let transport = Arc::new(MockTransport::fixed(json!({"data": [{"DATE": "x"}]})));
        let ohlcv = tool("get_daily_ohlcv", transport.clone());

        let output = ohlcv
            .invoke(&args(json!({
                "symbol": "BTC",
                "start_date": "2023-01-01",
                "end_date": "2023-03-31",
            })))
            .await
            .unwrap();

        let starts: Vec<String> = transport
            .requests()
            .iter()
            .map(|r| r.query_value("startDate").unwrap().to_string())
            .collect();
        assert_eq!(starts, ["2023-01-01", "2023-01-31", "2023-03-02"]);
        assert_eq!(output.records.len(), 3);
    }

    #[tokio::test]
    async fn test_api_error_surfaces_as_failure() {
        let transport = Arc::new(MockTransport::new(|_| {
            Err(ToolError::from_status(401, r#"{"message": "Invalid API key"}"#))
        }));
        let sentiment = tool("get_market_sentiment", transport);

        let result = sentiment.call(&ToolCall::new("get_market_sentiment").with_id("c1")).await;
        assert!(!result.success);
        assert_eq!(result.output, "API Error (401): Invalid API key");
        assert_eq!(result.id.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn test_success_carries_records() {
        let transport = Arc::new(MockTransport::fixed(json!({"data": {"answer": "BTC is up"}})));
        let agent = tool("ask_tmai_agent", transport);

        let call = ToolCall::new("ask_tmai_agent").arg("user_query", "How is BTC?");
        let result = agent.execute(&call).await.unwrap();
        assert!(result.success);
        assert_eq!(result.data.unwrap()[0]["answer"], "BTC is up");
    }
}
