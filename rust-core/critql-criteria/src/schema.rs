// SPDX-License-Identifier: PMPL-1.0-or-later
//! Criteria schemas: per-type field descriptors and their strategies.
//!
//! A schema is registered once per criteria type through [`SchemaBuilder`]
//! and validated when built. Field order is declaration order, which is also
//! the order predicates appear in the compiled query.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use critql_query::RangeOperator;

use crate::error::CriteriaError;

/// Control field names that can never be declared as predicates.
pub const RESERVED_FIELDS: [&str; 9] = [
    "qtext",
    "free_text",
    "freeText",
    "raw_query",
    "rawQuery",
    "projection_fields",
    "projectionFields",
    "options_name",
    "optionsName",
];

/// Word match options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordOptions {
    /// Term options passed through to the word query.
    pub options: Vec<String>,
    /// Relevance weight.
    pub weight: f64,
    /// Dot-path of the document field when it differs from the criteria field name.
    pub field: Option<String>,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            weight: 1.0,
            field: None,
        }
    }
}

impl WordOptions {
    pub fn with_field(mut self, path: impl Into<String>) -> Self {
        self.field = Some(path.into());
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }
}

/// Kind of range index a range field is backed by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    #[default]
    Path,
    Element,
}

/// Range match options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeOptions {
    pub operator: RangeOperator,
    /// Explicit index value type, e.g. `xs:int`; inferred from the value when absent.
    pub value_type: Option<String>,
    pub options: Vec<String>,
    pub field: Option<String>,
    /// Path index expression used instead of the one derived from the field path.
    pub path_index: Option<String>,
    pub index_kind: IndexKind,
}

impl RangeOptions {
    pub fn new(operator: RangeOperator) -> Self {
        Self {
            operator,
            ..Default::default()
        }
    }

    pub fn with_field(mut self, path: impl Into<String>) -> Self {
        self.field = Some(path.into());
        self
    }

    pub fn with_type(mut self, value_type: impl Into<String>) -> Self {
        self.value_type = Some(value_type.into());
        self
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    pub fn with_path_index(mut self, path: impl Into<String>) -> Self {
        self.path_index = Some(path.into());
        self
    }

    pub fn with_index_kind(mut self, kind: IndexKind) -> Self {
        self.index_kind = kind;
        self
    }
}

/// Value match options. Defaults to exact matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueOptions {
    pub options: Vec<String>,
    pub weight: f64,
    pub field: Option<String>,
}

impl Default for ValueOptions {
    fn default() -> Self {
        Self {
            options: vec!["exact".to_string()],
            weight: 1.0,
            field: None,
        }
    }
}

impl ValueOptions {
    pub fn with_field(mut self, path: impl Into<String>) -> Self {
        self.field = Some(path.into());
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Replace the option list.
    pub fn with_options<S: Into<String>>(mut self, options: impl IntoIterator<Item = S>) -> Self {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }
}

/// Predicate semantics declared on a criteria field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Strategy {
    Word(WordOptions),
    Range(RangeOptions),
    Value(ValueOptions),
    /// No marker: exact value match with compiler defaults.
    Default,
    /// Excluded from compilation; handled by the criteria's `configure` hook.
    Custom,
}

impl Strategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Word(_) => StrategyKind::Word,
            Strategy::Range(_) => StrategyKind::Range,
            Strategy::Value(_) => StrategyKind::Value,
            Strategy::Default => StrategyKind::Default,
            Strategy::Custom => StrategyKind::Custom,
        }
    }

    /// Explicit document field path, if the marker overrides it.
    pub fn field_override(&self) -> Option<&str> {
        match self {
            Strategy::Word(o) => o.field.as_deref(),
            Strategy::Range(o) => o.field.as_deref(),
            Strategy::Value(o) => o.field.as_deref(),
            Strategy::Default | Strategy::Custom => None,
        }
    }

    fn weight(&self) -> Option<f64> {
        match self {
            Strategy::Word(o) => Some(o.weight),
            Strategy::Value(o) => Some(o.weight),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Word,
    Range,
    Value,
    Default,
    Custom,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Word => write!(f, "word"),
            StrategyKind::Range => write!(f, "range"),
            StrategyKind::Value => write!(f, "value"),
            StrategyKind::Default => write!(f, "default"),
            StrategyKind::Custom => write!(f, "custom"),
        }
    }
}

/// What to do when a field is declared with more than one strategy marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Fail schema registration.
    #[default]
    Reject,
    /// Keep the first declared marker and log the rest.
    FirstDeclared,
}

/// One predicate field of a criteria type.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    name: String,
    strategy: Strategy,
    path: String,
}

impl FieldSpec {
    /// Criteria-side field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Dot-delimited document path: the marker's override, else the field name.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Validated field descriptors for one criteria type.
#[derive(Debug, Clone, PartialEq)]
pub struct CriteriaSchema {
    entity: String,
    fields: Vec<FieldSpec>,
}

impl CriteriaSchema {
    /// Start a schema for criteria that search `entity`.
    pub fn builder(entity: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(entity)
    }

    /// Build a schema from its serde definition.
    pub fn from_definition(definition: SchemaDefinition) -> Result<Self, CriteriaError> {
        let mut builder =
            SchemaBuilder::new(definition.entity).conflict_policy(definition.conflict_policy);
        for field in definition.fields {
            if field.markers.is_empty() {
                builder = builder.plain(field.name);
            } else {
                for marker in field.markers {
                    builder = builder.declare(field.name.clone(), marker);
                }
            }
        }
        builder.build()
    }

    /// Entity type whose metadata governs addressing.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Registers criteria fields and their strategy markers.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    entity: String,
    policy: ConflictPolicy,
    declared: Vec<(String, Vec<Strategy>)>,
}

impl SchemaBuilder {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            policy: ConflictPolicy::default(),
            declared: Vec::new(),
        }
    }

    pub fn conflict_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Add a strategy marker to a field, registering the field on first use.
    pub fn declare(mut self, name: impl Into<String>, strategy: Strategy) -> Self {
        let name = name.into();
        match self.declared.iter_mut().find(|(n, _)| *n == name) {
            Some((_, markers)) => markers.push(strategy),
            None => self.declared.push((name, vec![strategy])),
        }
        self
    }

    pub fn word(self, name: impl Into<String>, options: WordOptions) -> Self {
        self.declare(name, Strategy::Word(options))
    }

    pub fn range(self, name: impl Into<String>, options: RangeOptions) -> Self {
        self.declare(name, Strategy::Range(options))
    }

    pub fn value(self, name: impl Into<String>, options: ValueOptions) -> Self {
        self.declare(name, Strategy::Value(options))
    }

    /// A field without a marker.
    pub fn plain(self, name: impl Into<String>) -> Self {
        self.declare(name, Strategy::Default)
    }

    pub fn custom(self, name: impl Into<String>) -> Self {
        self.declare(name, Strategy::Custom)
    }

    /// Validate every declaration and produce the schema.
    pub fn build(self) -> Result<CriteriaSchema, CriteriaError> {
        let mut fields = Vec::with_capacity(self.declared.len());

        for (name, mut markers) in self.declared {
            if name.trim().is_empty() {
                return Err(CriteriaError::EmptyFieldName);
            }
            if RESERVED_FIELDS.contains(&name.as_str()) {
                return Err(CriteriaError::ReservedField(name));
            }

            if markers.len() > 1 {
                match self.policy {
                    ConflictPolicy::Reject => {
                        return Err(CriteriaError::ConflictingStrategy {
                            field: name,
                            first: markers[0].kind(),
                            second: markers[1].kind(),
                        });
                    }
                    ConflictPolicy::FirstDeclared => {
                        warn!(
                            entity = %self.entity,
                            field = %name,
                            kept = %markers[0].kind(),
                            dropped = markers.len() - 1,
                            "Field declares several strategies; keeping the first"
                        );
                        markers.truncate(1);
                    }
                }
            }

            let Some(strategy) = markers.pop() else {
                continue;
            };

            if let Some(path) = strategy.field_override() {
                if !is_valid_path(path) {
                    return Err(CriteriaError::BlankOverride {
                        field: name,
                        what: "field path",
                    });
                }
            }
            if let Strategy::Range(RangeOptions {
                path_index: Some(index),
                ..
            }) = &strategy
            {
                if index.trim().is_empty() {
                    return Err(CriteriaError::BlankOverride {
                        field: name,
                        what: "path index",
                    });
                }
            }
            if let Some(weight) = strategy.weight() {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(CriteriaError::InvalidWeight { field: name, weight });
                }
            }

            let path = strategy
                .field_override()
                .map(str::to_string)
                .unwrap_or_else(|| name.clone());
            fields.push(FieldSpec {
                name,
                strategy,
                path,
            });
        }

        Ok(CriteriaSchema {
            entity: self.entity,
            fields,
        })
    }
}

fn is_valid_path(path: &str) -> bool {
    !path.trim().is_empty() && path.split('.').all(|segment| !segment.trim().is_empty())
}

/// Serde form of a schema, for schemas loaded from configuration.
///
/// ```json
/// { "entity": "Person",
///   "fields": [ { "name": "olderThan",
///                 "markers": [ { "strategy": "range", "operator": "GT", "field": "age" } ] },
///               { "name": "gender" } ] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub entity: String,
    #[serde(default)]
    pub conflict_policy: ConflictPolicy,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    /// Declared markers; none means default value semantics.
    #[serde(default)]
    pub markers: Vec<Strategy>,
}
