//! Tool Specifications
//!
//! A [`ToolSpec`] is everything that distinguishes one endpoint tool from
//! another. The pipeline itself lives in [`crate::adapter`].

use std::collections::HashMap;

use agent_core::ToolSchema;
use serde_json::Value;

use crate::error::{Result, ToolError};
use crate::schema::{self, ParamSpec, ValidatedParams};

/// How a paginated endpoint pages
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageConfig {
    /// Query parameter carrying the page number
    pub page_param: &'static str,
    /// Query parameter carrying the page size
    pub limit_param: &'static str,
    /// Records requested per page
    pub page_size: usize,
    /// Number of the first page
    pub first_page: u64,
    /// Tool parameter holding the caller's record cap, if any
    pub cap_param: Option<&'static str>,
}

impl PageConfig {
    pub const fn new(page_size: usize) -> Self {
        Self {
            page_param: "page",
            limit_param: "limit",
            page_size,
            first_page: 1,
            cap_param: None,
        }
    }

    #[must_use]
    pub const fn capped_by(mut self, param: &'static str) -> Self {
        self.cap_param = Some(param);
        self
    }

    #[must_use]
    pub const fn first_page(mut self, first_page: u64) -> Self {
        self.first_page = first_page;
        self
    }

    /// Parameters the pager sets on every request. A cap parameter that is
    /// not one of these is still forwarded to the API.
    pub fn owns(&self, name: &str) -> bool {
        name == self.page_param || name == self.limit_param
    }
}

/// Start/end date parameters of an endpoint
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: &'static str,
    pub end: &'static str,
    /// Longest span (in days) the API serves in one query
    pub chunk_days: Option<u32>,
}

impl DateRange {
    pub const fn new(start: &'static str, end: &'static str) -> Self {
        Self {
            start,
            end,
            chunk_days: None,
        }
    }

    #[must_use]
    pub const fn chunked(mut self, days: u32) -> Self {
        self.chunk_days = Some(days);
        self
    }
}

/// Declaration of one endpoint tool
#[derive(Clone, Debug)]
pub struct ToolSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Endpoint path relative to the base URL, with a leading slash
    pub path: &'static str,
    pub category: &'static str,
    pub params: Vec<ParamSpec>,
    pub pagination: Option<PageConfig>,
    pub date_range: Option<DateRange>,
    /// At least one of these parameters must be supplied
    pub one_of: &'static [&'static str],
    /// Summary text when the API returns no records
    pub empty_message: &'static str,
    /// Fields shown in the summary; empty means all
    pub summary_fields: &'static [&'static str],
}

impl ToolSpec {
    pub fn new(name: &'static str, path: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            path,
            category: "market_data",
            params: Vec::new(),
            pagination: None,
            date_range: None,
            one_of: &[],
            empty_message: "No data found for the specified criteria.",
            summary_fields: &[],
        }
    }

    #[must_use]
    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    #[must_use]
    pub fn params(mut self, params: impl IntoIterator<Item = ParamSpec>) -> Self {
        self.params.extend(params);
        self
    }

    #[must_use]
    pub fn paginated(mut self, config: PageConfig) -> Self {
        self.pagination = Some(config);
        self
    }

    #[must_use]
    pub fn dates(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    #[must_use]
    pub fn require_one_of(mut self, names: &'static [&'static str]) -> Self {
        self.one_of = names;
        self
    }

    #[must_use]
    pub fn category(mut self, category: &'static str) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn empty_message(mut self, message: &'static str) -> Self {
        self.empty_message = message;
        self
    }

    #[must_use]
    pub fn summary_fields(mut self, fields: &'static [&'static str]) -> Self {
        self.summary_fields = fields;
        self
    }

    pub fn find_param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Validate caller arguments, including the cross-field rules
    pub fn validate(&self, args: &HashMap<String, Value>) -> Result<ValidatedParams> {
        let params = schema::validate(&self.params, args)?;

        if !self.one_of.is_empty() && !self.one_of.iter().any(|name| params.contains(name)) {
            return Err(ToolError::validation(format!(
                "provide at least one of {}",
                self.one_of.join(", ")
            )));
        }

        if let Some(range) = &self.date_range {
            let start = params.get(range.start).and_then(|v| v.as_date());
            let end = params.get(range.end).and_then(|v| v.as_date());
            if let (Some(start), Some(end)) = (start, end) {
                if start > end {
                    return Err(ToolError::validation(format!(
                        "{} ({start}) must not be after {} ({end})",
                        range.start, range.end
                    )));
                }
            }
        }

        Ok(params)
    }

    /// Schema handed to the agent framework
    pub fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name.to_string(),
            description: self.description.to_string(),
            parameters: self.params.iter().map(ParamSpec::to_schema).collect(),
            category: Some(self.category.to_string()),
            has_side_effects: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    fn levels() -> ToolSpec {
        ToolSpec::new("levels", "/levels", "Levels")
            .param(ParamSpec::string("token_id", "ids"))
            .param(ParamSpec::string("symbol", "symbols"))
            .param(ParamSpec::date("start_date", "start").wire("startDate"))
            .param(ParamSpec::date("end_date", "end").wire("endDate"))
            .dates(DateRange::new("start_date", "end_date"))
            .require_one_of(&["token_id", "symbol"])
    }

    #[test]
    fn test_one_of_group() {
        let err = levels().validate(&args(json!({}))).unwrap_err();
        assert!(err.to_string().contains("token_id, symbol"));

        assert!(levels().validate(&args(json!({"symbol": "BTC"}))).is_ok());
    }

    #[test]
    fn test_reversed_dates_rejected() {
        let err = levels()
            .validate(&args(json!({
                "symbol": "BTC",
                "start_date": "2024-02-01",
                "end_date": "2024-01-01",
            })))
            .unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));
    }

    #[test]
    fn test_pager_owned_params() {
        let config = PageConfig::new(50).capped_by("top_k");
        assert!(config.owns("page"));
        assert!(config.owns("limit"));
        assert!(!config.owns("top_k"));
        assert!(!config.owns("symbol"));
    }

    #[test]
    fn test_schema_carries_params() {
        let schema = levels().schema();
        assert_eq!(schema.name, "levels");
        assert_eq!(schema.parameters.len(), 4);
        assert!(!schema.has_side_effects);
    }
}
