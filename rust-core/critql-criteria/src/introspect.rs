// SPDX-License-Identifier: PMPL-1.0-or-later
//! Predicate field enumeration.

use crate::criteria::Criteria;
use crate::schema::{FieldSpec, Strategy};
use crate::value::CriteriaValue;

/// A schema field paired with its live value.
#[derive(Debug, Clone, PartialEq)]
pub struct PredicateField<'a> {
    pub spec: &'a FieldSpec,
    pub value: CriteriaValue,
}

/// Fields of `criteria` that carry a value, in declaration order.
///
/// Custom fields are left to the `configure` hook.
pub fn predicate_fields<C: Criteria + ?Sized>(criteria: &C) -> Vec<PredicateField<'_>> {
    criteria
        .schema()
        .fields()
        .iter()
        .filter(|spec| !matches!(spec.strategy(), Strategy::Custom))
        .filter_map(|spec| {
            criteria
                .value(spec.name())
                .map(|value| PredicateField { spec, value })
        })
        .collect()
}
