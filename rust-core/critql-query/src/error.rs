// SPDX-License-Identifier: PMPL-1.0-or-later
//! Query model error types.

use thiserror::Error;

/// Errors raised while parsing or rendering query model values.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("unknown document format: {0}")]
    UnknownFormat(String),

    #[error("unknown range operator: {0}")]
    UnknownOperator(String),

    #[error("unknown selected mode: {0}")]
    UnknownSelectedMode(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
