//! Request Builder
//!
//! Turns validated parameters into the GET request for an endpoint.
//! Credentials are not part of an [`ApiRequest`]; the transport adds them.

use chrono::NaiveDate;
use reqwest::Method;

use crate::pagination::date_chunks;
use crate::schema::{DATE_FORMAT, ValidatedParams};
use crate::spec::ToolSpec;

/// A single outgoing API call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Endpoint path, e.g. `/price`
    pub path: String,
    /// Absolute URL without query string
    pub url: String,
    /// Query pairs in declaration order
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn get(base_url: &str, path: &str) -> Self {
        Self {
            method: Method::GET,
            path: path.to_string(),
            url: format!("{}{}", base_url.trim_end_matches('/'), path),
            query: Vec::new(),
        }
    }

    /// Value of a query parameter
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a query parameter, replacing any existing value
    pub fn set_query(&mut self, key: &str, value: impl ToString) {
        let value = value.to_string();
        match self.query.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => self.query.push((key.to_string(), value)),
        }
    }

    #[must_use]
    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.set_query(key, value);
        self
    }
}

/// Builds [`ApiRequest`]s against one base URL
#[derive(Clone, Copy, Debug)]
pub struct RequestBuilder<'a> {
    base_url: &'a str,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(base_url: &'a str) -> Self {
        Self { base_url }
    }

    /// Request for `spec` carrying every supplied parameter under its wire
    /// name. Paging parameters are left for the pagination driver.
    pub fn build(&self, spec: &ToolSpec, params: &ValidatedParams) -> ApiRequest {
        let mut request = ApiRequest::get(self.base_url, spec.path);

        for (name, value) in params.iter() {
            if spec.pagination.as_ref().is_some_and(|p| p.owns(name)) {
                continue;
            }
            let wire = spec.find_param(name).map_or(name, |p| p.wire_name);
            request.set_query(wire, value);
        }

        request
    }

    /// Split `base` into one request per date window when the endpoint
    /// limits how long a range it serves. Windows come out in
    /// chronological order.
    pub fn date_windows(
        &self,
        spec: &ToolSpec,
        params: &ValidatedParams,
        base: ApiRequest,
    ) -> Vec<ApiRequest> {
        let Some(range) = &spec.date_range else {
            return vec![base];
        };
        let Some(days) = range.chunk_days else {
            return vec![base];
        };
        let start = params.get(range.start).and_then(|v| v.as_date());
        let end = params.get(range.end).and_then(|v| v.as_date());
        let (Some(start), Some(end)) = (start, end) else {
            return vec![base];
        };

        let start_wire = spec.find_param(range.start).map_or(range.start, |p| p.wire_name);
        let end_wire = spec.find_param(range.end).map_or(range.end, |p| p.wire_name);

        date_chunks(start, end, days)
            .into_iter()
            .map(|(from, to)| {
                base.clone()
                    .with_query(start_wire, format_date(from))
                    .with_query(end_wire, format_date(to))
            })
            .collect()
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ParamSpec;
    use crate::spec::{DateRange, PageConfig};
    use serde_json::{Value, json};
    use std::collections::HashMap;

    fn args(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    fn ohlcv() -> ToolSpec {
        ToolSpec::new("ohlcv", "/daily-ohlcv", "Daily candles")
            .param(ParamSpec::string("symbol", "symbols"))
            .param(ParamSpec::date("start_date", "start").wire("startDate"))
            .param(ParamSpec::date("end_date", "end").wire("endDate"))
            .param(ParamSpec::int("limit", "cap").default_value(100))
            .paginated(PageConfig::new(100).capped_by("limit"))
            .dates(DateRange::new("start_date", "end_date").chunked(29))
    }

    #[test]
    fn test_url_and_wire_names() {
        let spec = ohlcv();
        let params = spec
            .validate(&args(json!({
                "symbol": "BTC,ETH",
                "start_date": "2023-06-01",
                "end_date": "2023-06-07",
            })))
            .unwrap();
        let request = RequestBuilder::new("https://api.example.com/v2/").build(&spec, &params);

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, "https://api.example.com/v2/daily-ohlcv");
        assert_eq!(
            request.query,
            vec![
                ("symbol".to_string(), "BTC,ETH".to_string()),
                ("startDate".to_string(), "2023-06-01".to_string()),
                ("endDate".to_string(), "2023-06-07".to_string()),
            ]
        );
        // the cap is the pager's business
        assert_eq!(request.query_value("limit"), None);
    }

    #[test]
    fn test_set_query_replaces() {
        let request = ApiRequest::get("http://x", "/p")
            .with_query("page", 1)
            .with_query("page", 2);
        assert_eq!(request.query, vec![("page".to_string(), "2".to_string())]);
    }

    #[test]
    fn test_long_ranges_become_windows() {
        let spec = ohlcv();
        let params = spec
            .validate(&args(json!({
                "symbol": "BTC",
                "start_date": "2023-01-01",
                "end_date": "2023-03-01",
            })))
            .unwrap();
        let builder = RequestBuilder::new("http://x");
        let base = builder.build(&spec, &params);
        let windows = builder.date_windows(&spec, &params, base);

        let bounds: Vec<(&str, &str)> = windows
            .iter()
            .map(|r| (r.query_value("startDate").unwrap(), r.query_value("endDate").unwrap()))
            .collect();
        assert_eq!(bounds, vec![("2023-01-01", "2023-01-30"), ("2023-01-31", "2023-03-01")]);
        assert!(windows.iter().all(|r| r.query_value("symbol") == Some("BTC")));
    }

    #[test]
    fn test_open_ranges_stay_single() {
        let spec = ohlcv();
        let params = spec
            .validate(&args(json!({"start_date": "2023-01-01"})))
            .unwrap();
        let builder = RequestBuilder::new("http://x");
        let base = builder.build(&spec, &params);
        assert_eq!(builder.date_windows(&spec, &params, base.clone()), vec![base]);
    }
}
