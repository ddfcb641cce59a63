// SPDX-License-Identifier: PMPL-1.0-or-later
//! Dot-path scoping.

use critql_query::StructuredQuery;

use crate::format::FormatAdapter;

/// Scope a leaf query under the containers named by a dot-delimited path.
///
/// `"a.b.c"` yields `container(a, container(b, leaf("c")))`. A path with no
/// dot yields the leaf unscoped.
pub fn scope_path<F>(adapter: FormatAdapter, path: &str, leaf: F) -> StructuredQuery
where
    F: FnOnce(&str) -> StructuredQuery,
{
    let mut segments: Vec<&str> = path.split('.').collect();
    let last = segments.pop().unwrap_or(path);
    segments
        .into_iter()
        .rev()
        .fold(leaf(last), |inner, segment| {
            // Containers take the adapter's addressing too: XML paths scope
            // through element containers, never JSON-property containers.
            StructuredQuery::container(adapter.element(segment), inner)
        })
}

/// Absolute root path: `"friends.name"` becomes `"/friends/name"`.
pub fn absolute_path(path: &str) -> String {
    format!("/{}", path.replace('.', "/"))
}
