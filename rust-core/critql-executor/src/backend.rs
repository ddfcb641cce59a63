// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Search backend trait.
//
// A search backend executes combined queries produced by the criteria
// compiler. It owns transport, wire format and connection lifecycle; the
// compiler knows none of these.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use critql_query::CombinedQuery;

use crate::error::BackendError;
use crate::page::Page;

/// A stored document as returned by a search.
///
/// `content` is the raw document, or the extracted projection when the
/// query carries extract paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub uri: String,
    #[serde(default)]
    pub collections: Vec<String>,
    pub content: serde_json::Value,
}

impl Document {
    pub fn new(uri: impl Into<String>, content: serde_json::Value) -> Self {
        Self {
            uri: uri.into(),
            collections: Vec::new(),
            content,
        }
    }

    pub fn with_collections<S: Into<String>>(mut self, collections: impl IntoIterator<Item = S>) -> Self {
        self.collections = collections.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_collection(&self, collection: &str) -> bool {
        self.collections.iter().any(|c| c == collection)
    }
}

/// Executes compiled queries.
///
/// Implementations must be safe to share across threads and tokio tasks.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Matching documents in the window `[offset, offset + limit)`, with the
    /// total match count.
    async fn search(
        &self,
        query: &CombinedQuery,
        offset: usize,
        limit: usize,
    ) -> Result<Page<Document>, BackendError>;

    async fn count(&self, query: &CombinedQuery) -> Result<u64, BackendError>;

    async fn exists(&self, query: &CombinedQuery) -> Result<bool, BackendError>;

    /// Delete every matching document, returning how many were removed.
    async fn delete(&self, query: &CombinedQuery) -> Result<u64, BackendError>;

    /// A human-readable name for this backend, used in logging.
    fn name(&self) -> &str;
}
