// SPDX-License-Identifier: PMPL-1.0-or-later
//! Property-based tests for the query model

use proptest::prelude::*;
use std::cmp::Ordering;
use critql_query::{CombinedQuery, Element, RangeOperator, StructuredQuery};

fn arb_operator() -> impl Strategy<Value = RangeOperator> {
    prop::sample::select(RangeOperator::ALL.to_vec())
}

fn arb_ordering() -> impl Strategy<Value = Ordering> {
    prop::sample::select(vec![Ordering::Less, Ordering::Equal, Ordering::Greater])
}

/// Generate arbitrary word leaves
fn arb_word() -> impl Strategy<Value = StructuredQuery> {
    ("[a-z]{1,8}", prop::collection::vec("[a-z*]{1,6}", 1..4)).prop_map(|(name, text)| {
        StructuredQuery::word(Element::json_property(name), text, Vec::new(), 1.0)
    })
}

proptest! {
    #[test]
    fn test_operator_display_parses_back(op in arb_operator()) {
        let parsed: RangeOperator = op.to_string().parse().unwrap();
        prop_assert_eq!(parsed, op);

        let lower: RangeOperator = op.to_string().to_lowercase().parse().unwrap();
        prop_assert_eq!(lower, op);
    }

    #[test]
    fn test_inclusive_operators_extend_strict_ones(ordering in arb_ordering()) {
        prop_assert_eq!(
            RangeOperator::Le.accepts(ordering),
            RangeOperator::Lt.accepts(ordering) || RangeOperator::Eq.accepts(ordering)
        );
        prop_assert_eq!(
            RangeOperator::Ge.accepts(ordering),
            RangeOperator::Gt.accepts(ordering) || RangeOperator::Eq.accepts(ordering)
        );
        prop_assert_ne!(RangeOperator::Eq.accepts(ordering), RangeOperator::Ne.accepts(ordering));
    }

    #[test]
    fn test_and_also_keeps_every_leaf(
        first in prop::collection::vec(arb_word(), 0..5),
        second in prop::collection::vec(arb_word(), 0..5)
    ) {
        let expected = first.len() + second.len();
        let query = CombinedQuery::new(StructuredQuery::and(first)).and_also(second);
        prop_assert_eq!(query.structured.leaf_count(), expected);
    }

    #[test]
    fn test_container_preserves_leaf_count(leaves in prop::collection::vec(arb_word(), 1..6)) {
        let expected = leaves.len();
        let scoped = StructuredQuery::container(
            Element::json_property("outer"),
            StructuredQuery::or(leaves),
        );
        prop_assert_eq!(scoped.leaf_count(), expected);
        prop_assert_eq!(scoped.children().len(), 1);
    }

    #[test]
    fn test_envelope_always_has_search_root(leaves in prop::collection::vec(arb_word(), 0..4)) {
        let rendered = CombinedQuery::new(StructuredQuery::and(leaves)).to_search_json();
        prop_assert!(rendered.get("search").is_some());
    }
}
