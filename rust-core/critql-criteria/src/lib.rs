// SPDX-License-Identifier: PMPL-1.0-or-later
//! critql Criteria Compiler
//!
//! Compiles typed criteria objects into structured search queries. Each
//! criteria type registers a [`CriteriaSchema`] once; every predicate field
//! carries a [`Strategy`] (word, range, value, default) deciding how its live
//! value becomes a sub-query. The [`CriteriaCompiler`] ANDs the sub-queries,
//! layers on free text and projections, and hands the result to the
//! criteria's `configure` hook.
//!
//! ```
//! use std::sync::Arc;
//! use critql_criteria::{
//!     CriteriaCompiler, CriteriaSchema, DynamicCriteria, EntityRegistry, RangeOptions, WordOptions,
//! };
//! use critql_query::RangeOperator;
//!
//! let schema = CriteriaSchema::builder("Person")
//!     .word("occupation", WordOptions::default())
//!     .range("olderThan", RangeOptions::new(RangeOperator::Gt).with_field("age"))
//!     .build()
//!     .unwrap();
//!
//! let criteria = DynamicCriteria::new(Arc::new(schema))
//!     .with_value("occupation", "Engineer")
//!     .unwrap();
//!
//! let compiler = CriteriaCompiler::new(Arc::new(EntityRegistry::new()));
//! let query = compiler.compile(&criteria);
//! assert_eq!(query.structured.leaf_count(), 1);
//! ```

pub mod compiler;
pub mod config;
pub mod criteria;
pub mod dynamic;
pub mod error;
pub mod format;
pub mod infer;
pub mod introspect;
pub mod predicate;
pub mod schema;
pub mod scope;
pub mod terms;
pub mod value;

pub use compiler::CriteriaCompiler;
pub use config::CompilerConfig;
pub use criteria::{Criteria, CriteriaControls};
pub use dynamic::DynamicCriteria;
pub use error::CriteriaError;
pub use format::{EntityMetadata, EntityMetadataProvider, EntityRegistry, FormatAdapter};
pub use infer::{infer_type, TypeConversionProvider, XsTypeConverter};
pub use introspect::{predicate_fields, PredicateField};
pub use predicate::PredicateCompiler;
pub use schema::{
    ConflictPolicy, CriteriaSchema, FieldDefinition, FieldSpec, IndexKind, RangeOptions,
    SchemaBuilder, SchemaDefinition, Strategy, StrategyKind, ValueOptions, WordOptions,
};
pub use scope::{absolute_path, scope_path};
pub use terms::TermTokenizer;
pub use value::CriteriaValue;
