// SPDX-License-Identifier: PMPL-1.0-or-later
// Fuzz target for word tokenization and dotted path scoping

#![no_main]

use critql_criteria::{absolute_path, scope_path, FormatAdapter, TermTokenizer};
use critql_query::{DocumentFormat, StructuredQuery};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Every produced term is non-empty and carries the wildcard
        for term in TermTokenizer::default().terms(s) {
            assert!(!term.is_empty());
            assert!(term.contains('*'));
        }

        if s.len() < 256 {
            for format in DocumentFormat::ALL {
                let scoped = scope_path(FormatAdapter::new(format), s, |leaf| {
                    StructuredQuery::word(
                        FormatAdapter::new(format).element(leaf),
                        vec!["*".to_string()],
                        Vec::new(),
                        1.0,
                    )
                });
                assert_eq!(scoped.leaf_count(), 1);
            }
            assert!(absolute_path(s).starts_with('/'));
        }
    }
});
