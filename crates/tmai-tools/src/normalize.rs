//! Response Normalizer
//!
//! Checks the shape of an API payload, pulls out its records and renders
//! the text summary an agent reads.

use serde_json::{Map, Value};

use crate::error::{Result, ToolError};

/// One result row, field names exactly as the API sent them
pub type Record = Map<String, Value>;

/// Extract the records from a decoded response body.
///
/// Accepted shapes: `{"data": [...]}`, `{"data": {...}}`, `{"data": null}`,
/// a bare array of objects, or a bare object that is not an envelope.
pub fn extract_records(body: &Value) -> Result<Vec<Record>> {
    match body {
        Value::Array(items) => objects(items),
        Value::Object(map) => {
            if map.get("success") == Some(&Value::Bool(false)) {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("request was not successful");
                return Err(ToolError::Api {
                    status: 200,
                    message: message.to_string(),
                });
            }

            match map.get("data") {
                Some(Value::Array(items)) => objects(items),
                Some(Value::Object(record)) => Ok(vec![record.clone()]),
                Some(Value::Null) => Ok(Vec::new()),
                Some(other) => Err(ToolError::parse(
                    "'data' holding an array or object",
                    describe(other),
                )),
                None if map.contains_key("success") => Err(ToolError::parse(
                    "an envelope with a 'data' field",
                    "an envelope without 'data'",
                )),
                None => Ok(vec![map.clone()]),
            }
        }
        other => Err(ToolError::parse("a JSON object or array", describe(other))),
    }
}

/// Whether the server says more pages follow `page`, if it says anything
pub fn more_hint(body: &Value, page: u64) -> Option<bool> {
    let flag = body
        .get("has_more")
        .or_else(|| body.get("hasMore"))
        .and_then(Value::as_bool);
    if flag.is_some() {
        return flag;
    }
    body.pointer("/pagination/totalPages")
        .and_then(Value::as_u64)
        .filter(|total| *total > 0)
        .map(|total| page < total)
}

fn objects(items: &[Value]) -> Result<Vec<Record>> {
    items
        .iter()
        .map(|item| match item {
            Value::Object(record) => Ok(record.clone()),
            other => Err(ToolError::parse(
                "an array of objects",
                format!("an array containing {}", describe(other)),
            )),
        })
        .collect()
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
    .to_string()
}

/// Options for [`summarize`]
#[derive(Clone, Copy, Debug)]
pub struct SummaryStyle<'a> {
    pub tool: &'a str,
    pub empty_message: &'a str,
    /// Preferred fields; all fields are shown when none of these are present
    pub fields: &'a [&'a str],
    pub preview_rows: usize,
}

/// Human-readable digest of `records`
pub fn summarize(records: &[Record], style: &SummaryStyle<'_>, truncated: bool) -> String {
    if records.is_empty() {
        return style.empty_message.to_string();
    }

    let mut lines = vec![format!("{} record(s) from {}:", records.len(), style.tool)];
    lines.extend(
        records
            .iter()
            .take(style.preview_rows)
            .map(|record| format!("- {}", render_row(record, style.fields))),
    );

    let hidden = records.len().saturating_sub(style.preview_rows);
    if hidden > 0 {
        lines.push(format!("... and {hidden} more"));
    }
    if truncated {
        lines.push("(page limit reached; more data may be available)".to_string());
    }

    lines.join("\n")
}

fn render_row(record: &Record, fields: &[&str]) -> String {
    let chosen: Vec<(&str, &Value)> = fields
        .iter()
        .filter_map(|f| record.get(*f).map(|v| (*f, v)))
        .collect();

    let pairs: Vec<(&str, &Value)> = if chosen.is_empty() {
        record.iter().map(|(k, v)| (k.as_str(), v)).collect()
    } else {
        chosen
    };

    pairs
        .into_iter()
        .map(|(field, value)| format!("{field}: {}", render_value(value)))
        .collect::<Vec<_>>()
        .join(" || ")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "N/A".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
