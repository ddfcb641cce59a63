// SPDX-License-Identifier: PMPL-1.0-or-later
//! Per-field predicate compilation.
//!
//! Each strategy builds its leaf through the [`FormatAdapter`] and is then
//! scoped by the field's dot-path. Values of a kind no strategy knows about
//! compile through their string form instead of failing.

use critql_query::{Element, QueryValue, StructuredQuery};

use crate::config::CompilerConfig;
use crate::format::FormatAdapter;
use crate::infer::{infer_type, TypeConversionProvider};
use crate::schema::{FieldSpec, IndexKind, RangeOptions, Strategy, ValueOptions, WordOptions};
use crate::scope::{absolute_path, scope_path};
use crate::terms::TermTokenizer;
use crate::value::CriteriaValue;

pub struct PredicateCompiler<'a> {
    adapter: FormatAdapter,
    types: &'a dyn TypeConversionProvider,
    tokenizer: TermTokenizer,
    config: &'a CompilerConfig,
}

impl<'a> PredicateCompiler<'a> {
    pub fn new(
        adapter: FormatAdapter,
        types: &'a dyn TypeConversionProvider,
        config: &'a CompilerConfig,
    ) -> Self {
        Self {
            adapter,
            types,
            tokenizer: TermTokenizer::new(config.wildcard),
            config,
        }
    }

    /// Compile one field. Custom fields produce nothing.
    pub fn compile(&self, spec: &FieldSpec, value: &CriteriaValue) -> Option<StructuredQuery> {
        match spec.strategy() {
            Strategy::Word(options) => Some(self.word(spec.path(), options, value)),
            Strategy::Range(options) => Some(self.range(spec.path(), options, value)),
            Strategy::Value(ValueOptions { options, weight, .. }) => {
                Some(self.value(spec.path(), options, *weight, value))
            }
            Strategy::Default => Some(self.value(
                spec.path(),
                &self.config.default_value_options,
                self.config.default_weight,
                value,
            )),
            Strategy::Custom => None,
        }
    }

    /// All terms must match, each as a partial match.
    fn word(&self, path: &str, options: &WordOptions, value: &CriteriaValue) -> StructuredQuery {
        let terms = self.tokenizer.tokenize(value);
        scope_path(self.adapter, path, |leaf| {
            StructuredQuery::and(terms.into_iter().map(|term| {
                StructuredQuery::word(
                    self.adapter.element(leaf),
                    vec![term],
                    options.options.clone(),
                    options.weight,
                )
            }))
        })
    }

    fn range(&self, path: &str, options: &RangeOptions, value: &CriteriaValue) -> StructuredQuery {
        let value_type = infer_type(options.value_type.as_deref(), value, self.types);
        let index = |leaf: &str| match options.index_kind {
            IndexKind::Element => self.adapter.element(leaf),
            IndexKind::Path => Element::path_index(
                options
                    .path_index
                    .clone()
                    .unwrap_or_else(|| absolute_path(path)),
            ),
        };
        scope_path(self.adapter, path, |leaf| {
            StructuredQuery::range(
                index(leaf),
                value_type,
                options.operator,
                value.to_query_values(),
                options.options.clone(),
            )
        })
    }

    fn value(
        &self,
        path: &str,
        options: &[String],
        weight: f64,
        value: &CriteriaValue,
    ) -> StructuredQuery {
        let values = match value {
            v if v.is_numeric() => v.to_query_values(),
            CriteriaValue::Boolean(b) => vec![QueryValue::Boolean(*b)],
            other => vec![QueryValue::Text(other.to_text())],
        };
        scope_path(self.adapter, path, |leaf| {
            StructuredQuery::value(self.adapter.element(leaf), values, options.to_vec(), weight)
        })
    }
}
