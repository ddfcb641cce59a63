// SPDX-License-Identifier: PMPL-1.0-or-later
//! Criteria backed by a shared schema and a value map.
//!
//! Used for criteria decoded from JSON documents, where no Rust type exists
//! per criteria shape.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::criteria::{Criteria, CriteriaControls};
use crate::error::CriteriaError;
use crate::schema::{CriteriaSchema, Strategy};
use crate::value::CriteriaValue;

#[derive(Debug, Clone)]
pub struct DynamicCriteria {
    schema: Arc<CriteriaSchema>,
    values: BTreeMap<String, CriteriaValue>,
    controls: CriteriaControls,
}

impl DynamicCriteria {
    pub fn new(schema: Arc<CriteriaSchema>) -> Self {
        Self {
            schema,
            values: BTreeMap::new(),
            controls: CriteriaControls::default(),
        }
    }

    /// Set a predicate field. The field must be declared in the schema.
    pub fn with_value(
        mut self,
        field: impl Into<String>,
        value: impl Into<CriteriaValue>,
    ) -> Result<Self, CriteriaError> {
        let field = field.into();
        if self.schema.field(&field).is_none() {
            return Err(CriteriaError::UnknownField {
                entity: self.schema.entity().to_string(),
                field,
            });
        }
        self.values.insert(field, value.into());
        Ok(self)
    }

    pub fn with_controls(mut self, controls: CriteriaControls) -> Self {
        self.controls = controls;
        self
    }

    /// Decode criteria from a JSON object.
    ///
    /// Control fields are accepted in snake or camel case. `null` leaves a
    /// field unset. Strings on range fields decode as date-times or dates
    /// when they parse as such.
    pub fn from_json(schema: Arc<CriteriaSchema>, document: &Value) -> Result<Self, CriteriaError> {
        let object = document.as_object().ok_or(CriteriaError::NotAnObject)?;
        let mut criteria = Self::new(schema);

        for (key, value) in object {
            match key.as_str() {
                "qtext" | "free_text" | "freeText" => {
                    criteria.controls.free_text = optional_string(key, value)?;
                }
                "raw_query" | "rawQuery" => {
                    criteria.controls.raw_query = (!value.is_null()).then(|| value.clone());
                }
                "projection_fields" | "projectionFields" => {
                    criteria.controls.projection_fields = string_list(key, value)?;
                }
                "options_name" | "optionsName" => {
                    criteria.controls.options_name = optional_string(key, value)?;
                }
                field => {
                    let spec = criteria.schema.field(field).ok_or_else(|| {
                        CriteriaError::UnknownField {
                            entity: criteria.schema.entity().to_string(),
                            field: field.to_string(),
                        }
                    })?;
                    let temporal_hint = matches!(spec.strategy(), Strategy::Range(_));
                    if let Some(decoded) = CriteriaValue::from_json(value, temporal_hint) {
                        criteria.values.insert(field.to_string(), decoded);
                    }
                }
            }
        }

        Ok(criteria)
    }
}

fn optional_string(key: &str, value: &Value) -> Result<Option<String>, CriteriaError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(CriteriaError::InvalidValue {
            field: key.to_string(),
            reason: "expected a string".to_string(),
        }),
    }
}

fn string_list(key: &str, value: &Value) -> Result<Vec<String>, CriteriaError> {
    let invalid = || CriteriaError::InvalidValue {
        field: key.to_string(),
        reason: "expected an array of strings".to_string(),
    };
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
            .collect(),
        _ => Err(invalid()),
    }
}

impl Criteria for DynamicCriteria {
    fn schema(&self) -> &CriteriaSchema {
        &self.schema
    }

    fn value(&self, field: &str) -> Option<CriteriaValue> {
        self.values.get(field).cloned()
    }

    fn controls(&self) -> &CriteriaControls {
        &self.controls
    }
}
