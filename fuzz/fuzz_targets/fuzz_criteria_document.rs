// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for criteria documents parsed against a fixed schema

#![no_main]

use std::sync::Arc;

use critql_criteria::{
    CriteriaCompiler, CriteriaSchema, DynamicCriteria, EntityRegistry, RangeOptions, WordOptions,
};
use critql_query::RangeOperator;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(document) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let Ok(schema) = CriteriaSchema::builder("Person")
        .word("name", WordOptions::default())
        .range("olderThan", RangeOptions::new(RangeOperator::Gt).with_field("age"))
        .word("pets", WordOptions::default().with_field("pets.name"))
        .plain("gender")
        .build()
    else {
        return;
    };

    // Malformed documents are rejected with an error, never a panic
    if let Ok(criteria) = DynamicCriteria::from_json(Arc::new(schema), &document) {
        let compiler = CriteriaCompiler::new(Arc::new(EntityRegistry::new()));
        let query = compiler.compile(&criteria);
        let _ = query.to_search_string(false);
    }
});
