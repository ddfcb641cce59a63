// SPDX-License-Identifier: PMPL-1.0-or-later
//! The criteria contract.

use serde::{Deserialize, Serialize};

use critql_query::CombinedQuery;

use crate::schema::CriteriaSchema;
use crate::value::CriteriaValue;

/// Reserved control fields carried alongside predicate fields.
///
/// These never compile to predicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriteriaControls {
    /// Opaque query-language text, intersected with the predicates.
    pub free_text: Option<String>,
    /// Pre-built query payload. Passed through; `configure` merges it if needed.
    pub raw_query: Option<serde_json::Value>,
    /// Dot-paths to extract from each result.
    pub projection_fields: Vec<String>,
    /// Named server-side query-options profile.
    pub options_name: Option<String>,
}

impl CriteriaControls {
    pub fn with_free_text(mut self, text: impl Into<String>) -> Self {
        self.free_text = Some(text.into());
        self
    }

    pub fn with_raw_query(mut self, raw: serde_json::Value) -> Self {
        self.raw_query = Some(raw);
        self
    }

    pub fn with_projections<S: Into<String>>(mut self, paths: impl IntoIterator<Item = S>) -> Self {
        self.projection_fields = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_options_name(mut self, name: impl Into<String>) -> Self {
        self.options_name = Some(name.into());
        self
    }
}

/// A typed bag of search predicates.
///
/// Implementors expose a statically registered schema and the live value of
/// each predicate field. `configure` runs after compilation and its result is
/// the final query.
pub trait Criteria {
    fn schema(&self) -> &CriteriaSchema;

    /// Current value of a predicate field; `None` omits the field.
    fn value(&self, field: &str) -> Option<CriteriaValue>;

    fn controls(&self) -> &CriteriaControls;

    fn configure(&self, query: CombinedQuery) -> CombinedQuery {
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_controls_builder() {
        let controls = CriteriaControls::default()
            .with_free_text("bob")
            .with_projections(["name", "friends.name"])
            .with_options_name("people")
            .with_raw_query(json!({"query": {}}));
        assert_eq!(controls.free_text.as_deref(), Some("bob"));
        assert_eq!(controls.projection_fields, vec!["name", "friends.name"]);
        assert_eq!(controls.options_name.as_deref(), Some("people"));
        assert!(controls.raw_query.is_some());
    }

    #[test]
    fn test_controls_default_empty() {
        let controls = CriteriaControls::default();
        assert!(controls.free_text.is_none());
        assert!(controls.projection_fields.is_empty());
    }
}
