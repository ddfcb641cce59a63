// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criteria executor.
//
// Compiles criteria, scopes the query to the entity's collection, layers
// sort and page parameters on top, and hands the query to a search backend.
// Backend errors are returned unchanged.

use std::sync::Arc;

use tracing::debug;

use critql_criteria::{absolute_path, Criteria, CriteriaCompiler};
use critql_query::{CombinedQuery, SortOrder};

use crate::backend::{Document, SearchBackend};
use crate::config::ExecutorConfig;
use crate::error::BackendError;
use crate::page::{Page, Pageable, Sort};

pub struct CriteriaExecutor<B: SearchBackend> {
    compiler: CriteriaCompiler,
    backend: Arc<B>,
    config: ExecutorConfig,
}

impl<B: SearchBackend> CriteriaExecutor<B> {
    pub fn new(compiler: CriteriaCompiler, backend: Arc<B>) -> Self {
        Self {
            compiler,
            backend,
            config: ExecutorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn compiler(&self) -> &CriteriaCompiler {
        &self.compiler
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Compile `criteria` and scope it to the entity's collection, if any.
    pub fn prepare<C: Criteria + ?Sized>(&self, criteria: &C) -> CombinedQuery {
        let query = self.compiler.compile(criteria);
        let entity = criteria.schema().entity();
        match self.compiler.metadata().collection_of(entity) {
            Some(collection) => query.with_collections([collection]),
            None => query,
        }
    }

    /// Sort keys as index sort orders for `entity`.
    pub fn sort_orders(&self, entity: &str, sort: &Sort) -> Vec<SortOrder> {
        let metadata = self.compiler.metadata();
        sort.orders()
            .iter()
            .map(|order| {
                if metadata.is_element_indexed(entity, &order.property) {
                    SortOrder::element(order.property.clone(), order.direction.into())
                } else {
                    SortOrder::path(absolute_path(&order.property), order.direction.into())
                }
            })
            .collect()
    }

    fn sorted<C: Criteria + ?Sized>(&self, criteria: &C, sort: &Sort) -> CombinedQuery {
        let entity = criteria.schema().entity();
        self.sort_orders(entity, sort)
            .into_iter()
            .fold(self.prepare(criteria), CombinedQuery::with_sort_order)
    }

    /// First page of matches at the default page size.
    pub async fn find_all<C: Criteria + ?Sized>(&self, criteria: &C) -> Result<Vec<Document>, BackendError> {
        self.find_all_sorted(criteria, &Sort::unsorted()).await
    }

    pub async fn find_all_sorted<C: Criteria + ?Sized>(
        &self,
        criteria: &C,
        sort: &Sort,
    ) -> Result<Vec<Document>, BackendError> {
        let limit = self.config.default_page_size;
        let query = self.sorted(criteria, sort).with_limit(limit);
        debug!(backend = self.backend.name(), limit, "Executing criteria search");
        Ok(self.backend.search(&query, 0, limit).await?.content)
    }

    pub async fn find_page<C: Criteria + ?Sized>(
        &self,
        criteria: &C,
        pageable: &Pageable,
    ) -> Result<Page<Document>, BackendError> {
        let query = self
            .sorted(criteria, &pageable.sort)
            .with_limit(pageable.page_size);
        debug!(
            backend = self.backend.name(),
            offset = pageable.offset,
            page_size = pageable.page_size,
            "Executing paged criteria search"
        );
        self.backend
            .search(&query, pageable.offset, pageable.page_size)
            .await
    }

    pub async fn count<C: Criteria + ?Sized>(&self, criteria: &C) -> Result<u64, BackendError> {
        let query = self.prepare(criteria);
        debug!(backend = self.backend.name(), "Counting criteria matches");
        self.backend.count(&query).await
    }

    pub async fn exists<C: Criteria + ?Sized>(&self, criteria: &C) -> Result<bool, BackendError> {
        let query = self.prepare(criteria);
        self.backend.exists(&query).await
    }

    /// Delete every match, returning how many documents were removed.
    pub async fn delete_all<C: Criteria + ?Sized>(&self, criteria: &C) -> Result<u64, BackendError> {
        let query = self.prepare(criteria);
        let deleted = self.backend.delete(&query).await?;
        debug!(backend = self.backend.name(), deleted, "Deleted criteria matches");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Direction, Order};
    use async_trait::async_trait;
    use critql_criteria::{
        CriteriaSchema, DynamicCriteria, EntityMetadata, EntityRegistry, WordOptions,
    };
    use critql_query::{DocumentFormat, SortDirection, SortIndex};
    use std::sync::Mutex;

    /// Records the last query it was asked to run.
    #[derive(Default)]
    struct RecordingBackend {
        last: Mutex<Option<(CombinedQuery, usize, usize)>>,
    }

    #[async_trait]
    impl SearchBackend for RecordingBackend {
        async fn search(
            &self,
            query: &CombinedQuery,
            offset: usize,
            limit: usize,
        ) -> Result<Page<Document>, BackendError> {
            *self.last.lock().unwrap() = Some((query.clone(), offset, limit));
            Ok(Page::empty(offset, limit))
        }

        async fn count(&self, _query: &CombinedQuery) -> Result<u64, BackendError> {
            Ok(0)
        }

        async fn exists(&self, _query: &CombinedQuery) -> Result<bool, BackendError> {
            Err(BackendError::Unavailable("offline".to_string()))
        }

        async fn delete(&self, _query: &CombinedQuery) -> Result<u64, BackendError> {
            Ok(0)
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn executor() -> CriteriaExecutor<RecordingBackend> {
        let registry = EntityRegistry::new().with_entity(
            "Person",
            EntityMetadata::new(DocumentFormat::Json)
                .with_collection("Person")
                .with_element_index("birthtime"),
        );
        CriteriaExecutor::new(
            CriteriaCompiler::new(Arc::new(registry)),
            Arc::new(RecordingBackend::default()),
        )
    }

    fn criteria() -> DynamicCriteria {
        let schema = CriteriaSchema::builder("Person")
            .word("name", WordOptions::default())
            .build()
            .unwrap();
        DynamicCriteria::new(Arc::new(schema))
            .with_value("name", "Bob")
            .unwrap()
    }

    #[test]
    fn test_prepare_scopes_collection() {
        let query = executor().prepare(&criteria());
        assert_eq!(query.collections, vec!["Person".to_string()]);
        assert!(query.sort_orders.is_empty());
    }

    #[test]
    fn test_sort_orders_pick_index_kind() {
        let sort = Sort::by(Direction::Desc, ["birthtime", "pets.name"]);
        let orders = executor().sort_orders("Person", &sort);
        assert_eq!(orders[0].index, SortIndex::Element("birthtime".to_string()));
        assert_eq!(orders[0].direction, SortDirection::Descending);
        assert_eq!(orders[1].index, SortIndex::Path("/pets/name".to_string()));
    }

    #[tokio::test]
    async fn test_find_all_uses_default_page() {
        let executor = executor();
        executor.find_all(&criteria()).await.unwrap();
        let (query, offset, limit) = executor.backend().last.lock().unwrap().clone().unwrap();
        assert_eq!((offset, limit), (0, 10));
        assert_eq!(query.limit, Some(10));
    }

    #[tokio::test]
    async fn test_find_page_layers_sort_and_window() {
        let executor = executor();
        let pageable = Pageable::of(2, 5).with_sort(Order::asc("name"));
        executor.find_page(&criteria(), &pageable).await.unwrap();
        let (query, offset, limit) = executor.backend().last.lock().unwrap().clone().unwrap();
        assert_eq!((offset, limit), (10, 5));
        assert_eq!(query.sort_orders, vec![SortOrder::path("/name", SortDirection::Ascending)]);
    }

    #[tokio::test]
    async fn test_backend_error_passes_through() {
        let err = executor().exists(&criteria()).await.unwrap_err();
        assert!(matches!(err, BackendError::Unavailable(msg) if msg == "offline"));
    }
}
