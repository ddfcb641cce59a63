// SPDX-License-Identifier: PMPL-1.0-or-later
//! critql Query Model
//!
//! The backend-agnostic structured query tree produced by the criteria
//! compiler, together with the combined query envelope (free text, extraction
//! paths, sort orders, options) that a search backend executes.

pub mod combined;
pub mod element;
pub mod error;
pub mod operator;
pub mod render;
pub mod sort;
pub mod structured;
pub mod value;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use combined::{CombinedQuery, SelectedMode};
pub use element::Element;
pub use error::QueryError;
pub use operator::RangeOperator;
pub use sort::{SortDirection, SortIndex, SortOrder};
pub use structured::StructuredQuery;
pub use value::QueryValue;

/// Serialization format of an entity's underlying documents.
///
/// Governs whether a field name compiles to a JSON property reference or an
/// XML element reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Json,
    Xml,
}

impl DocumentFormat {
    /// Both formats in canonical order.
    pub const ALL: [DocumentFormat; 2] = [DocumentFormat::Json, DocumentFormat::Xml];
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Json => write!(f, "json"),
            DocumentFormat::Xml => write!(f, "xml"),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(DocumentFormat::Json),
            "xml" => Ok(DocumentFormat::Xml),
            _ => Err(QueryError::UnknownFormat(s.to_string())),
        }
    }
}
