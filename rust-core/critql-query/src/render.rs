// SPDX-License-Identifier: PMPL-1.0-or-later
//! JSON search envelope rendering.
//!
//! A combined query renders as
//!
//! ```json
//! { "search": { "query": { "and-query": { "queries": [...] } },
//!               "qtext": "...",
//!               "options": { "extract-document-data": {...}, "sort-order": [...] } } }
//! ```

use serde_json::{json, Map, Value};

use crate::combined::CombinedQuery;
use crate::element::Element;
use crate::error::QueryError;
use crate::sort::{SortIndex, SortOrder};
use crate::structured::StructuredQuery;
use crate::value::QueryValue;

fn element_entry(element: &Element, body: &mut Map<String, Value>) {
    match element {
        Element::JsonProperty(name) => {
            body.insert("json-property".into(), json!(name));
        }
        Element::XmlElement { namespace, name } => {
            body.insert(
                "element".into(),
                json!({ "name": name, "ns": namespace.clone().unwrap_or_default() }),
            );
        }
        Element::PathIndex(path) => {
            body.insert("path-index".into(), json!({ "text": path }));
        }
    }
}

fn values_json(values: &[QueryValue]) -> Value {
    Value::Array(values.iter().map(QueryValue::to_json).collect())
}

impl StructuredQuery {
    /// Render as a single-key JSON object named after the query kind.
    pub fn to_query_json(&self) -> Value {
        match self {
            StructuredQuery::And { queries } => json!({
                "and-query": { "queries": queries.iter().map(Self::to_query_json).collect::<Vec<_>>() }
            }),
            StructuredQuery::Or { queries } => json!({
                "or-query": { "queries": queries.iter().map(Self::to_query_json).collect::<Vec<_>>() }
            }),
            StructuredQuery::Not { query } => json!({ "not-query": query.to_query_json() }),
            StructuredQuery::Word {
                element,
                text,
                options,
                weight,
            } => {
                let mut body = Map::new();
                element_entry(element, &mut body);
                body.insert("text".into(), json!(text));
                body.insert("term-option".into(), json!(options));
                body.insert("weight".into(), json!(weight));
                json!({ "word-query": body })
            }
            StructuredQuery::Value {
                element,
                values,
                options,
                weight,
            } => {
                let mut body = Map::new();
                element_entry(element, &mut body);
                let kind = values.first().map(QueryValue::json_kind).unwrap_or("string");
                body.insert("type".into(), json!(kind));
                body.insert("text".into(), values_json(values));
                body.insert("term-option".into(), json!(options));
                body.insert("weight".into(), json!(weight));
                json!({ "value-query": body })
            }
            StructuredQuery::Range {
                index,
                value_type,
                operator,
                values,
                options,
            } => {
                let mut body = Map::new();
                element_entry(index, &mut body);
                body.insert("type".into(), json!(value_type));
                body.insert("range-operator".into(), json!(operator.to_string()));
                body.insert("value".into(), values_json(values));
                body.insert("range-option".into(), json!(options));
                json!({ "range-query": body })
            }
            StructuredQuery::Container { element, query } => {
                let mut body = Map::new();
                element_entry(element, &mut body);
                if let Value::Object(inner) = query.to_query_json() {
                    body.extend(inner);
                }
                json!({ "container-query": body })
            }
        }
    }
}

fn sort_order_json(order: &SortOrder) -> Value {
    match &order.index {
        SortIndex::Path(path) => json!({
            "direction": order.direction.to_string(),
            "path-index": { "text": path },
        }),
        SortIndex::Element(name) => json!({
            "direction": order.direction.to_string(),
            "element": { "name": name, "ns": "" },
        }),
    }
}

impl CombinedQuery {
    /// Render the full search envelope.
    pub fn to_search_json(&self) -> Value {
        let mut options = Map::new();

        for (name, value) in &self.options {
            options.insert(name.clone(), value.clone());
        }

        if let Some(limit) = self.limit {
            options.insert("page-length".into(), json!(limit));
        }

        if !self.extracts.is_empty() {
            options.insert(
                "extract-document-data".into(),
                json!({
                    "selected": self.selected.to_string(),
                    "extract-path": self.extracts,
                }),
            );
        }

        if !self.sort_orders.is_empty() {
            options.insert(
                "sort-order".into(),
                Value::Array(self.sort_orders.iter().map(sort_order_json).collect()),
            );
        }

        if !self.collections.is_empty() {
            options.insert(
                "additional-query".into(),
                json!({ "collection-query": { "uri": self.collections } }),
            );
        }

        let mut search = Map::new();
        search.insert("query".into(), self.structured.to_query_json());
        if self.has_term() {
            search.insert("qtext".into(), json!(self.qtext));
        }
        if let Some(name) = &self.options_name {
            search.insert("options-name".into(), json!(name));
        }
        if let Some(raw) = &self.raw_query {
            search.insert("raw-query".into(), raw.clone());
        }
        // The search endpoint rejects an envelope without an options node.
        search.insert("options".into(), Value::Object(options));

        json!({ "search": search })
    }

    /// Render the search envelope as a JSON string.
    pub fn to_search_string(&self, pretty: bool) -> Result<String, QueryError> {
        let value = self.to_search_json();
        let rendered = if pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(rendered)
    }
}
