// SPDX-License-Identifier: PMPL-1.0-or-later
//! Typed values carried by value and range queries.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A literal compared against document content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum QueryValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
}

impl QueryValue {
    /// The JSON scalar kind a value query uses for this literal.
    pub fn json_kind(&self) -> &'static str {
        match self {
            QueryValue::Integer(_) | QueryValue::Decimal(_) => "number",
            QueryValue::Boolean(_) => "boolean",
            _ => "string",
        }
    }

    /// JSON form used in rendered queries. Temporal values render as their
    /// lexical string form.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            QueryValue::Text(s) => serde_json::Value::String(s.clone()),
            QueryValue::Integer(i) => serde_json::Value::from(*i),
            QueryValue::Decimal(d) => serde_json::Number::from_f64(*d)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| serde_json::Value::String(d.to_string())),
            QueryValue::Boolean(b) => serde_json::Value::Bool(*b),
            QueryValue::DateTime(_) | QueryValue::Date(_) => {
                serde_json::Value::String(self.to_string())
            }
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Text(s) => write!(f, "{}", s),
            QueryValue::Integer(i) => write!(f, "{}", i),
            QueryValue::Decimal(d) => write!(f, "{}", d),
            QueryValue::Boolean(b) => write!(f, "{}", b),
            QueryValue::DateTime(dt) => {
                write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            QueryValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Text(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Text(s)
    }
}

impl From<i64> for QueryValue {
    fn from(i: i64) -> Self {
        QueryValue::Integer(i)
    }
}

impl From<f64> for QueryValue {
    fn from(d: f64) -> Self {
        QueryValue::Decimal(d)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Boolean(b)
    }
}

impl From<DateTime<Utc>> for QueryValue {
    fn from(dt: DateTime<Utc>) -> Self {
        QueryValue::DateTime(dt)
    }
}
