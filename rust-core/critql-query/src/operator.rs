// SPDX-License-Identifier: PMPL-1.0-or-later
//! Range comparison operators.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::QueryError;

/// Comparison applied by a range query between the indexed value and the
/// query value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RangeOperator {
    Lt,
    Le,
    Gt,
    Ge,
    #[default]
    Eq,
    Ne,
}

impl RangeOperator {
    pub const ALL: [RangeOperator; 6] = [
        RangeOperator::Lt,
        RangeOperator::Le,
        RangeOperator::Gt,
        RangeOperator::Ge,
        RangeOperator::Eq,
        RangeOperator::Ne,
    ];

    /// Whether `indexed.cmp(query_value)` satisfies this operator.
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            RangeOperator::Lt => ordering == Ordering::Less,
            RangeOperator::Le => ordering != Ordering::Greater,
            RangeOperator::Gt => ordering == Ordering::Greater,
            RangeOperator::Ge => ordering != Ordering::Less,
            RangeOperator::Eq => ordering == Ordering::Equal,
            RangeOperator::Ne => ordering != Ordering::Equal,
        }
    }
}

impl fmt::Display for RangeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeOperator::Lt => write!(f, "LT"),
            RangeOperator::Le => write!(f, "LE"),
            RangeOperator::Gt => write!(f, "GT"),
            RangeOperator::Ge => write!(f, "GE"),
            RangeOperator::Eq => write!(f, "EQ"),
            RangeOperator::Ne => write!(f, "NE"),
        }
    }
}

impl FromStr for RangeOperator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "LT" | "<" => Ok(RangeOperator::Lt),
            "LE" | "<=" => Ok(RangeOperator::Le),
            "GT" | ">" => Ok(RangeOperator::Gt),
            "GE" | ">=" => Ok(RangeOperator::Ge),
            "EQ" | "=" | "==" => Ok(RangeOperator::Eq),
            "NE" | "!=" | "<>" => Ok(RangeOperator::Ne),
            _ => Err(QueryError::UnknownOperator(s.to_string())),
        }
    }
}
