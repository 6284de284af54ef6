//! Parameter Schema
//!
//! Declares the inputs a tool accepts and turns loosely-typed JSON
//! arguments (as an LLM produces them) into checked [`ParamValue`]s.
//! Arguments the schema does not mention are ignored.

use std::collections::HashMap;
use std::fmt;

use agent_core::tool::ParameterSchema;
use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::error::{Result, ToolError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Semantic type of a parameter
#[derive(Clone, Debug, PartialEq)]
pub enum ParamKind {
    String,
    Int,
    Float,
    /// Calendar date, `YYYY-MM-DD`
    Date,
    /// One of a fixed set of string values
    Enum(&'static [&'static str]),
}

impl ParamKind {
    /// JSON Schema type name
    pub fn json_type(&self) -> &'static str {
        match self {
            Self::String | Self::Date | Self::Enum(_) => "string",
            Self::Int => "integer",
            Self::Float => "number",
        }
    }
}

/// One declared parameter
#[derive(Clone, Debug)]
pub struct ParamSpec {
    /// Tool-facing name
    pub name: &'static str,
    /// Query-string name sent to the API
    pub wire_name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    pub default: Option<Value>,
    /// Inclusive lower bound for numeric kinds
    pub min: Option<f64>,
    pub description: &'static str,
}

impl ParamSpec {
    fn new(name: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            wire_name: name,
            kind,
            required: false,
            default: None,
            min: None,
            description,
        }
    }

    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::String, description)
    }

    pub fn int(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::Int, description)
    }

    pub fn float(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::Float, description)
    }

    pub fn date(name: &'static str, description: &'static str) -> Self {
        Self::new(name, ParamKind::Date, description)
    }

    pub fn choice(
        name: &'static str,
        values: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self::new(name, ParamKind::Enum(values), description)
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn wire(mut self, wire_name: &'static str) -> Self {
        self.wire_name = wire_name;
        self
    }

    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Describe for function calling
    pub fn to_schema(&self) -> ParameterSchema {
        ParameterSchema {
            name: self.name.to_string(),
            param_type: self.kind.json_type().to_string(),
            description: self.description.to_string(),
            required: self.required,
            default: self.default.clone(),
            enum_values: match &self.kind {
                ParamKind::Enum(values) => Some(values.iter().map(|v| json!(v)).collect()),
                _ => None,
            },
            format: matches!(self.kind, ParamKind::Date).then(|| "date".to_string()),
        }
    }

    /// Coerce a caller-supplied value to this parameter's kind
    pub fn coerce(&self, value: &Value) -> Result<ParamValue> {
        let coerced = match &self.kind {
            ParamKind::String => ParamValue::Str(self.coerce_string(value)?),
            ParamKind::Int => ParamValue::Int(self.coerce_int(value)?),
            ParamKind::Float => ParamValue::Float(self.coerce_float(value)?),
            ParamKind::Date => ParamValue::Date(self.coerce_date(value)?),
            ParamKind::Enum(allowed) => ParamValue::Str(self.coerce_enum(value, allowed)?),
        };
        self.check_min(&coerced)?;
        Ok(coerced)
    }

    fn coerce_string(&self, value: &Value) -> Result<String> {
        match value {
            Value::String(s) => Ok(s.trim().to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            // "Comma-separated" fields often arrive as lists
            Value::Array(items) => {
                let parts = items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => Ok(s.trim().to_string()),
                        Value::Number(n) => Ok(n.to_string()),
                        other => Err(self.type_error("a string or list of strings", other)),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(parts.join(","))
            }
            other => Err(self.type_error("a string", other)),
        }
    }

    fn coerce_int(&self, value: &Value) -> Result<i64> {
        let parsed = match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < 9.0e15)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| self.type_error("an integer", value))
    }

    fn coerce_float(&self, value: &Value) -> Result<f64> {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed
            .filter(|f| f.is_finite())
            .ok_or_else(|| self.type_error("a number", value))
    }

    fn coerce_date(&self, value: &Value) -> Result<NaiveDate> {
        value
            .as_str()
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok())
            .ok_or_else(|| {
                ToolError::validation(format!(
                    "{} must be in YYYY-MM-DD format, got {}",
                    self.name,
                    preview(value)
                ))
            })
    }

    fn coerce_enum(&self, value: &Value, allowed: &[&str]) -> Result<String> {
        let candidate = match value {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        };
        candidate
            .filter(|c| allowed.contains(&c.as_str()))
            .ok_or_else(|| {
                ToolError::validation(format!(
                    "{} must be one of {}, got {}",
                    self.name,
                    allowed.join(", "),
                    preview(value)
                ))
            })
    }

    fn check_min(&self, value: &ParamValue) -> Result<()> {
        let Some(min) = self.min else {
            return Ok(());
        };
        let number = match value {
            ParamValue::Int(i) => *i as f64,
            ParamValue::Float(f) => *f,
            _ => return Ok(()),
        };
        if number < min {
            return Err(ToolError::validation(format!(
                "{} must be at least {min}, got {value}",
                self.name
            )));
        }
        Ok(())
    }

    fn type_error(&self, expected: &str, value: &Value) -> ToolError {
        ToolError::validation(format!(
            "{} must be {expected}, got {}",
            self.name,
            preview(value)
        ))
    }
}

/// A validated, typed argument
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
}

impl ParamValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
        }
    }
}

/// Arguments after validation, in declaration order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidatedParams {
    values: Vec<(&'static str, ParamValue)>,
}

impl ValidatedParams {
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.values.iter().map(|(n, v)| (*n, v))
    }
}

/// Validate `args` against `params`.
///
/// Required parameters that are absent (or null, or blank strings) fail;
/// absent optional parameters take their default when they have one.
pub fn validate(params: &[ParamSpec], args: &HashMap<String, Value>) -> Result<ValidatedParams> {
    let mut values = Vec::with_capacity(params.len());

    for param in params {
        match args.get(param.name).filter(|v| !is_blank(v)) {
            Some(value) => values.push((param.name, param.coerce(value)?)),
            None if param.required => return Err(ToolError::missing(param.name)),
            None => {
                if let Some(default) = &param.default {
                    values.push((param.name, param.coerce(default)?));
                }
            }
        }
    }

    Ok(ValidatedParams { values })
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn preview(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() > 60 {
        format!("{}...", text.chars().take(60).collect::<String>())
    } else {
        text
    }
}
