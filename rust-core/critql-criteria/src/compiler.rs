// SPDX-License-Identifier: PMPL-1.0-or-later
//! Criteria compilation.
//!
//! [`CriteriaCompiler`] holds only immutable collaborators. The document
//! format is resolved at the start of each call and threaded through as a
//! local value, so one compiler can be shared across threads for entities of
//! differing formats.

use std::sync::Arc;

use tracing::debug;

use critql_query::{CombinedQuery, StructuredQuery};

use crate::config::CompilerConfig;
use crate::criteria::Criteria;
use crate::format::{EntityMetadataProvider, FormatAdapter};
use crate::infer::{TypeConversionProvider, XsTypeConverter};
use crate::introspect::predicate_fields;
use crate::predicate::PredicateCompiler;
use crate::scope::absolute_path;

#[derive(Clone)]
pub struct CriteriaCompiler {
    metadata: Arc<dyn EntityMetadataProvider>,
    types: Arc<dyn TypeConversionProvider>,
    config: CompilerConfig,
}

impl CriteriaCompiler {
    pub fn new(metadata: Arc<dyn EntityMetadataProvider>) -> Self {
        Self {
            metadata,
            types: Arc::new(XsTypeConverter),
            config: CompilerConfig::default(),
        }
    }

    pub fn with_type_converter(mut self, types: Arc<dyn TypeConversionProvider>) -> Self {
        self.types = types;
        self
    }

    pub fn with_config(mut self, config: CompilerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn metadata(&self) -> &Arc<dyn EntityMetadataProvider> {
        &self.metadata
    }

    /// Addressing mode for criteria over `entity`.
    pub fn resolve_format(&self, entity: &str) -> FormatAdapter {
        FormatAdapter::resolve(self.metadata.as_ref(), entity, self.config.default_format)
    }

    /// Compile a criteria instance into a combined query.
    ///
    /// Predicates are ANDed in declaration order (match-all when none are
    /// set), free text is intersected, projections become absolute extract
    /// paths, and the criteria's `configure` hook has the last word.
    pub fn compile<C: Criteria + ?Sized>(&self, criteria: &C) -> CombinedQuery {
        let entity = criteria.schema().entity();
        let adapter = self.resolve_format(entity);
        let predicates = PredicateCompiler::new(adapter, self.types.as_ref(), &self.config);

        let queries: Vec<StructuredQuery> = predicate_fields(criteria)
            .iter()
            .filter_map(|field| predicates.compile(field.spec, &field.value))
            .collect();

        debug!(
            entity = %entity,
            format = %adapter.format(),
            predicates = queries.len(),
            "Compiled criteria predicates"
        );

        let mut query = CombinedQuery::new(StructuredQuery::and(queries));
        let controls = criteria.controls();

        if let Some(text) = controls.free_text.as_deref().filter(|t| !t.trim().is_empty()) {
            query = query.with_term(text);
        }

        if !controls.projection_fields.is_empty() {
            let extracts = controls
                .projection_fields
                .iter()
                .map(|p| absolute_path(p))
                .collect();
            query = query.with_extracts(extracts, self.config.extract_mode);
        }

        if let Some(name) = &controls.options_name {
            query = query.with_options_name(name.clone());
        }

        criteria.configure(query)
    }
}

impl std::fmt::Debug for CriteriaCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CriteriaCompiler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
