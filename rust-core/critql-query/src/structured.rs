// SPDX-License-Identifier: PMPL-1.0-or-later
//! The structured query tree.
//!
//! Leaves (`Word`, `Value`, `Range`) address a document node through an
//! [`Element`]; `Container` restricts its inner query to matches inside a
//! named property or element; `And`/`Or`/`Not` compose. An `And` with no
//! children matches every document.

use serde::{Deserialize, Serialize};

use crate::element::Element;
use crate::operator::RangeOperator;
use crate::value::QueryValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuredQuery {
    /// All children must match.
    And { queries: Vec<StructuredQuery> },
    /// At least one child must match.
    Or { queries: Vec<StructuredQuery> },
    /// The child must not match.
    Not { query: Box<StructuredQuery> },
    /// Word match against the text of a node; `*` is a wildcard.
    Word {
        element: Element,
        text: Vec<String>,
        options: Vec<String>,
        weight: f64,
    },
    /// Value match against the whole content of a node.
    Value {
        element: Element,
        values: Vec<QueryValue>,
        options: Vec<String>,
        weight: f64,
    },
    /// Typed comparison against a range index.
    Range {
        index: Element,
        value_type: String,
        operator: RangeOperator,
        values: Vec<QueryValue>,
        options: Vec<String>,
    },
    /// Inner query must match within the named node.
    Container {
        element: Element,
        query: Box<StructuredQuery>,
    },
}

impl StructuredQuery {
    /// The unconstrained query.
    pub fn match_all() -> Self {
        StructuredQuery::And { queries: Vec::new() }
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self, StructuredQuery::And { queries } if queries.is_empty())
    }

    pub fn and(queries: impl IntoIterator<Item = StructuredQuery>) -> Self {
        StructuredQuery::And {
            queries: queries.into_iter().collect(),
        }
    }

    pub fn or(queries: impl IntoIterator<Item = StructuredQuery>) -> Self {
        StructuredQuery::Or {
            queries: queries.into_iter().collect(),
        }
    }

    // Not an operator overload: negation of a query tree, not of a bool.
    #[allow(clippy::should_implement_trait)]
    pub fn not(query: StructuredQuery) -> Self {
        StructuredQuery::Not {
            query: Box::new(query),
        }
    }

    pub fn word(element: Element, text: Vec<String>, options: Vec<String>, weight: f64) -> Self {
        StructuredQuery::Word {
            element,
            text,
            options,
            weight,
        }
    }

    pub fn value(
        element: Element,
        values: Vec<QueryValue>,
        options: Vec<String>,
        weight: f64,
    ) -> Self {
        StructuredQuery::Value {
            element,
            values,
            options,
            weight,
        }
    }

    pub fn range(
        index: Element,
        value_type: impl Into<String>,
        operator: RangeOperator,
        values: Vec<QueryValue>,
        options: Vec<String>,
    ) -> Self {
        StructuredQuery::Range {
            index,
            value_type: value_type.into(),
            operator,
            values,
            options,
        }
    }

    pub fn container(element: Element, query: StructuredQuery) -> Self {
        StructuredQuery::Container {
            element,
            query: Box::new(query),
        }
    }

    /// Direct children of a composite or container query.
    pub fn children(&self) -> Vec<&StructuredQuery> {
        match self {
            StructuredQuery::And { queries } | StructuredQuery::Or { queries } => {
                queries.iter().collect()
            }
            StructuredQuery::Not { query } | StructuredQuery::Container { query, .. } => {
                vec![query.as_ref()]
            }
            _ => Vec::new(),
        }
    }

    /// Pre-order traversal of the tree.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a StructuredQuery)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Number of leaf (word, value, range) queries in the tree.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |q| {
            if matches!(
                q,
                StructuredQuery::Word { .. }
                    | StructuredQuery::Value { .. }
                    | StructuredQuery::Range { .. }
            ) {
                count += 1;
            }
        });
        count
    }
}

impl Default for StructuredQuery {
    fn default() -> Self {
        Self::match_all()
    }
}
