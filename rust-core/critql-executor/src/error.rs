// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Search backend error types.
//
// Backend failures pass through the executor unchanged; the compiler never
// produces or wraps them.

use thiserror::Error;

/// Errors a search backend may report.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend cannot evaluate the query it was given.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The backend is not reachable.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    /// A referenced document does not exist.
    #[error("document not found: {0}")]
    NotFound(String),

    /// Failed to serialize or deserialize a payload.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
