// SPDX-License-Identifier: PMPL-1.0-or-later
//! Combined query: a structured query plus the search options that travel
//! with it (free text, extraction paths, sort orders, page length, scoping).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;
use crate::sort::SortOrder;
use crate::structured::StructuredQuery;

/// How extracted paths are returned for each matching document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectedMode {
    /// Only the extracted nodes, as a flat list.
    Include,
    /// The document without the extracted nodes.
    Exclude,
    /// The whole document.
    All,
    /// The extracted nodes with their ancestor hierarchy preserved.
    #[default]
    Hierarchical,
}

impl fmt::Display for SelectedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectedMode::Include => write!(f, "include"),
            SelectedMode::Exclude => write!(f, "exclude"),
            SelectedMode::All => write!(f, "all"),
            SelectedMode::Hierarchical => write!(f, "include-with-ancestors"),
        }
    }
}

impl FromStr for SelectedMode {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "include" => Ok(SelectedMode::Include),
            "exclude" => Ok(SelectedMode::Exclude),
            "all" => Ok(SelectedMode::All),
            "hierarchical" | "include-with-ancestors" => Ok(SelectedMode::Hierarchical),
            _ => Err(QueryError::UnknownSelectedMode(s.to_string())),
        }
    }
}

/// The unit a search backend executes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombinedQuery {
    /// Structured constraints; match-all when nothing was compiled.
    pub structured: StructuredQuery,
    /// Opaque query-language text intersected with `structured`.
    pub qtext: Option<String>,
    /// Absolute paths to extract from each result.
    pub extracts: Vec<String>,
    /// Shape of the extracted results.
    pub selected: SelectedMode,
    /// Name of a persisted server-side options profile.
    pub options_name: Option<String>,
    /// Caller-supplied pre-built query payload; never interpreted here.
    pub raw_query: Option<serde_json::Value>,
    /// Additional search options, keyed by option name.
    pub options: BTreeMap<String, serde_json::Value>,
    pub sort_orders: Vec<SortOrder>,
    /// Page length the backend should apply.
    pub limit: Option<usize>,
    /// Collections the search is scoped to.
    pub collections: Vec<String>,
}

impl CombinedQuery {
    pub fn new(structured: StructuredQuery) -> Self {
        Self {
            structured,
            ..Default::default()
        }
    }

    /// Replace the structured query.
    pub fn with_structured(mut self, structured: StructuredQuery) -> Self {
        self.structured = structured;
        self
    }

    /// AND the current structured query with `queries`.
    ///
    /// A match-all current query is dropped rather than nested.
    pub fn and_also(mut self, queries: impl IntoIterator<Item = StructuredQuery>) -> Self {
        let mut all: Vec<StructuredQuery> = Vec::new();
        let current = std::mem::take(&mut self.structured);
        if !current.is_match_all() {
            all.push(current);
        }
        all.extend(queries);
        self.structured = StructuredQuery::and(all);
        self
    }

    /// OR the current structured query with `queries`.
    pub fn or_also(mut self, queries: impl IntoIterator<Item = StructuredQuery>) -> Self {
        let mut all: Vec<StructuredQuery> = Vec::new();
        let current = std::mem::take(&mut self.structured);
        if !current.is_match_all() {
            all.push(current);
        }
        all.extend(queries);
        self.structured = StructuredQuery::or(all);
        self
    }

    pub fn with_term(mut self, qtext: impl Into<String>) -> Self {
        self.qtext = Some(qtext.into());
        self
    }

    pub fn with_extracts(mut self, extracts: Vec<String>, mode: SelectedMode) -> Self {
        self.extracts = extracts;
        self.selected = mode;
        self
    }

    pub fn with_options_name(mut self, name: impl Into<String>) -> Self {
        self.options_name = Some(name.into());
        self
    }

    pub fn with_raw_query(mut self, raw: serde_json::Value) -> Self {
        self.raw_query = Some(raw);
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(name.into(), value);
        self
    }

    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_orders.push(order);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Add collections, keeping any already present and skipping duplicates.
    pub fn with_collections<S: Into<String>>(mut self, collections: impl IntoIterator<Item = S>) -> Self {
        for collection in collections {
            let collection = collection.into();
            if !self.collections.contains(&collection) {
                self.collections.push(collection);
            }
        }
        self
    }

    pub fn has_term(&self) -> bool {
        self.qtext.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::sort::SortDirection;

    fn gender_value() -> StructuredQuery {
        StructuredQuery::value(
            Element::json_property("gender"),
            vec!["female".into()],
            vec!["exact".to_string()],
            1.0,
        )
    }

    #[test]
    fn test_default_is_match_all() {
        let q = CombinedQuery::default();
        assert!(q.structured.is_match_all());
        assert!(q.qtext.is_none());
        assert!(q.extracts.is_empty());
        assert_eq!(q.selected, SelectedMode::Hierarchical);
    }

    #[test]
    fn test_and_also_drops_match_all() {
        let q = CombinedQuery::default().and_also([gender_value()]);
        assert_eq!(q.structured, StructuredQuery::and([gender_value()]));
    }

    #[test]
    fn test_or_also_keeps_current() {
        let q = CombinedQuery::new(gender_value()).or_also([StructuredQuery::match_all()]);
        match q.structured {
            StructuredQuery::Or { queries } => {
                assert_eq!(queries.len(), 2);
                assert_eq!(queries[0], gender_value());
            }
            other => panic!("expected or-query, got {:?}", other),
        }
    }

    #[test]
    fn test_collections_deduplicate() {
        let q = CombinedQuery::default()
            .with_collections(["Person", "Person"])
            .with_collections(vec!["Other".to_string()]);
        assert_eq!(q.collections, vec!["Person".to_string(), "Other".to_string()]);
    }

    #[test]
    fn test_has_term_ignores_blank() {
        assert!(!CombinedQuery::default().with_term("   ").has_term());
        assert!(CombinedQuery::default().with_term("bob").has_term());
    }

    #[test]
    fn test_builder_chain() {
        let q = CombinedQuery::new(gender_value())
            .with_options_name("people")
            .with_limit(5)
            .with_sort_order(SortOrder::path("/name", SortDirection::Ascending))
            .with_option("return-metrics", serde_json::json!(false));
        assert_eq!(q.options_name.as_deref(), Some("people"));
        assert_eq!(q.limit, Some(5));
        assert_eq!(q.sort_orders.len(), 1);
        assert_eq!(q.options["return-metrics"], serde_json::json!(false));
    }

    #[test]
    fn test_selected_mode_parse() {
        assert_eq!("hierarchical".parse::<SelectedMode>().unwrap(), SelectedMode::Hierarchical);
        assert_eq!("INCLUDE".parse::<SelectedMode>().unwrap(), SelectedMode::Include);
        assert!("partial".parse::<SelectedMode>().is_err());
    }
}
