// SPDX-License-Identifier: PMPL-1.0-or-later
//! Live values held by criteria predicate fields.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::fmt;

use critql_query::QueryValue;

/// The runtime value of one predicate field.
///
/// Integer and floating-point widths are kept distinct so range type
/// inference can name the matching index type.
#[derive(Debug, Clone, PartialEq)]
pub enum CriteriaValue {
    Text(String),
    /// Several free-text fragments; word fields join them with spaces.
    TextList(Vec<String>),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    /// Any other JSON shape. Compiles through its string form.
    Other(serde_json::Value),
}

impl CriteriaValue {
    pub fn is_temporal(&self) -> bool {
        matches!(self, CriteriaValue::DateTime(_) | CriteriaValue::Date(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            CriteriaValue::Int(_)
                | CriteriaValue::Long(_)
                | CriteriaValue::Float(_)
                | CriteriaValue::Double(_)
        )
    }

    /// String form used for word tokenizing and string fallbacks.
    pub fn to_text(&self) -> String {
        match self {
            CriteriaValue::Text(s) => s.clone(),
            CriteriaValue::TextList(items) => items.join(" "),
            CriteriaValue::Other(serde_json::Value::String(s)) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Typed query literals for this value; lists yield one literal per item.
    pub fn to_query_values(&self) -> Vec<QueryValue> {
        match self {
            CriteriaValue::Text(s) => vec![QueryValue::Text(s.clone())],
            CriteriaValue::TextList(items) => {
                items.iter().cloned().map(QueryValue::Text).collect()
            }
            CriteriaValue::Int(i) => vec![QueryValue::Integer(i64::from(*i))],
            CriteriaValue::Long(i) => vec![QueryValue::Integer(*i)],
            CriteriaValue::Float(f) => vec![QueryValue::Decimal(f64::from(*f))],
            CriteriaValue::Double(d) => vec![QueryValue::Decimal(*d)],
            CriteriaValue::Boolean(b) => vec![QueryValue::Boolean(*b)],
            CriteriaValue::DateTime(dt) => vec![QueryValue::DateTime(*dt)],
            CriteriaValue::Date(d) => vec![QueryValue::Date(*d)],
            CriteriaValue::Other(_) => vec![QueryValue::Text(self.to_text())],
        }
    }

    /// Decode a JSON value. `null` decodes to `None`.
    ///
    /// With `temporal_hint`, strings that parse as RFC 3339 date-times or
    /// ISO dates decode as temporal values.
    pub fn from_json(value: &serde_json::Value, temporal_hint: bool) -> Option<Self> {
        use serde_json::Value;

        match value {
            Value::Null => None,
            Value::Bool(b) => Some(CriteriaValue::Boolean(*b)),
            Value::Number(n) => Some(match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => match i32::try_from(i) {
                    Ok(small) => CriteriaValue::Int(small),
                    Err(_) => CriteriaValue::Long(i),
                },
                (None, Some(d)) => CriteriaValue::Double(d),
                (None, None) => CriteriaValue::Other(value.clone()),
            }),
            Value::String(s) => {
                if temporal_hint {
                    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                        return Some(CriteriaValue::DateTime(dt.with_timezone(&Utc)));
                    }
                    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                        return Some(CriteriaValue::Date(d));
                    }
                }
                Some(CriteriaValue::Text(s.clone()))
            }
            Value::Array(items) if items.iter().all(Value::is_string) => Some(
                CriteriaValue::TextList(
                    items
                        .iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect(),
                ),
            ),
            other => Some(CriteriaValue::Other(other.clone())),
        }
    }
}

impl fmt::Display for CriteriaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CriteriaValue::Text(s) => write!(f, "{}", s),
            CriteriaValue::TextList(items) => write!(f, "{}", items.join(" ")),
            CriteriaValue::Int(i) => write!(f, "{}", i),
            CriteriaValue::Long(i) => write!(f, "{}", i),
            CriteriaValue::Float(v) => write!(f, "{}", v),
            CriteriaValue::Double(v) => write!(f, "{}", v),
            CriteriaValue::Boolean(b) => write!(f, "{}", b),
            CriteriaValue::DateTime(dt) => {
                write!(f, "{}", dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            CriteriaValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CriteriaValue::Other(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for CriteriaValue {
    fn from(s: &str) -> Self {
        CriteriaValue::Text(s.to_string())
    }
}

impl From<String> for CriteriaValue {
    fn from(s: String) -> Self {
        CriteriaValue::Text(s)
    }
}

impl From<Vec<String>> for CriteriaValue {
    fn from(items: Vec<String>) -> Self {
        CriteriaValue::TextList(items)
    }
}

impl From<Vec<&str>> for CriteriaValue {
    fn from(items: Vec<&str>) -> Self {
        CriteriaValue::TextList(items.into_iter().map(str::to_string).collect())
    }
}

impl From<i32> for CriteriaValue {
    fn from(i: i32) -> Self {
        CriteriaValue::Int(i)
    }
}

impl From<i64> for CriteriaValue {
    fn from(i: i64) -> Self {
        CriteriaValue::Long(i)
    }
}

impl From<f32> for CriteriaValue {
    fn from(v: f32) -> Self {
        CriteriaValue::Float(v)
    }
}

impl From<f64> for CriteriaValue {
    fn from(v: f64) -> Self {
        CriteriaValue::Double(v)
    }
}

impl From<bool> for CriteriaValue {
    fn from(b: bool) -> Self {
        CriteriaValue::Boolean(b)
    }
}

impl From<DateTime<Utc>> for CriteriaValue {
    fn from(dt: DateTime<Utc>) -> Self {
        CriteriaValue::DateTime(dt)
    }
}

impl From<NaiveDate> for CriteriaValue {
    fn from(d: NaiveDate) -> Self {
        CriteriaValue::Date(d)
    }
}

impl From<serde_json::Value> for CriteriaValue {
    fn from(v: serde_json::Value) -> Self {
        CriteriaValue::Other(v)
    }
}
