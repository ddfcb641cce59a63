// SPDX-License-Identifier: PMPL-1.0-or-later
//! Sort orders attached to a combined query.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

/// Range index a sort order reads values from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortIndex {
    /// Absolute path expression, e.g. `/name`.
    Path(String),
    /// Element (or JSON property) range index by local name.
    Element(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortOrder {
    pub index: SortIndex,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn path(path: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            index: SortIndex::Path(path.into()),
            direction,
        }
    }

    pub fn element(name: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            index: SortIndex::Element(name.into()),
            direction,
        }
    }
}
