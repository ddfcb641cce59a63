// SPDX-License-Identifier: PMPL-1.0-or-later
//! Criteria error types.
//!
//! Compilation itself never fails; these cover schema registration and
//! decoding criteria from JSON.

use thiserror::Error;

use crate::schema::StrategyKind;

#[derive(Error, Debug)]
pub enum CriteriaError {
    #[error("field '{field}' declares both {first} and {second} strategies")]
    ConflictingStrategy {
        field: String,
        first: StrategyKind,
        second: StrategyKind,
    },

    #[error("field '{0}' collides with a reserved control field")]
    ReservedField(String),

    #[error("criteria field name must not be empty")]
    EmptyFieldName,

    #[error("field '{field}' has a blank or malformed {what}")]
    BlankOverride { field: String, what: &'static str },

    #[error("field '{field}' has invalid weight {weight}")]
    InvalidWeight { field: String, weight: f64 },

    #[error("unknown field '{field}' for criteria on entity '{entity}'")]
    UnknownField { entity: String, field: String },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("criteria document must be a JSON object")]
    NotAnObject,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicting_strategy_display() {
        let err = CriteriaError::ConflictingStrategy {
            field: "name".to_string(),
            first: StrategyKind::Word,
            second: StrategyKind::Range,
        };
        assert_eq!(
            err.to_string(),
            "field 'name' declares both word and range strategies"
        );
    }

    #[test]
    fn test_unknown_field_display() {
        let err = CriteriaError::UnknownField {
            entity: "Person".to_string(),
            field: "shoeSize".to_string(),
        };
        assert!(err.to_string().contains("shoeSize"));
        assert!(err.to_string().contains("Person"));
    }

    #[test]
    fn test_invalid_weight_display() {
        let err = CriteriaError::InvalidWeight {
            field: "name".to_string(),
            weight: -1.0,
        };
        assert!(err.to_string().contains("-1"));
    }
}
