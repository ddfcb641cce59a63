// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory search backend.
//
// Stores JSON documents in a `BTreeMap` keyed by URI behind a tokio `RwLock`
// and evaluates structured queries by walking each document. XML-addressed
// queries are evaluated against the same JSON shape, element names standing
// in for property names. Intended for tests and development; there is no
// index, every query scans every document.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use critql_query::{
    CombinedQuery, Element, QueryValue, SelectedMode, SortDirection, SortIndex, StructuredQuery,
};

use crate::backend::{Document, SearchBackend};
use crate::error::BackendError;
use crate::page::Page;

/// An in-memory search backend over JSON documents.
///
/// # Example
///
/// ```rust
/// use critql_executor::{InMemorySearchBackend, SearchBackend};
/// use critql_query::CombinedQuery;
/// use serde_json::json;
///
/// # tokio_test::block_on(async {
/// let backend = InMemorySearchBackend::new();
/// backend.insert_new(["Person"], json!({ "name": "Bobby" })).await;
/// let count = backend.count(&CombinedQuery::default()).await.unwrap();
/// assert_eq!(count, 1);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct InMemorySearchBackend {
    documents: Arc<RwLock<BTreeMap<String, Document>>>,
    wildcard: char,
}

impl Default for InMemorySearchBackend {
    fn default() -> Self {
        Self {
            documents: Arc::default(),
            wildcard: '*',
        }
    }
}

impl InMemorySearchBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wildcard marker used in word terms. Must match the compiler's
    /// `CompilerConfig::wildcard`.
    pub fn with_wildcard(mut self, wildcard: char) -> Self {
        self.wildcard = wildcard;
        self
    }

    pub fn wildcard(&self) -> char {
        self.wildcard
    }

    /// Store a document, replacing any previous one with the same URI.
    pub async fn insert(&self, document: Document) {
        let mut docs = self.documents.write().await;
        docs.insert(document.uri.clone(), document);
    }

    /// Store content under a generated URI and return the URI.
    pub async fn insert_new<S: Into<String>>(
        &self,
        collections: impl IntoIterator<Item = S>,
        content: Value,
    ) -> String {
        let uri = format!("/{}.json", Uuid::new_v4());
        self.insert(Document::new(uri.clone(), content).with_collections(collections))
            .await;
        uri
    }

    pub async fn get(&self, uri: &str) -> Option<Document> {
        self.documents.read().await.get(uri).cloned()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.documents.write().await.clear();
    }

    async fn matching(&self, query: &CombinedQuery) -> Result<Vec<Document>, BackendError> {
        let docs = self.documents.read().await;
        let mut hits = Vec::new();
        for document in docs.values() {
            if document_matches(query, document, self.wildcard)? {
                hits.push(document.clone());
            }
        }
        Ok(hits)
    }
}

#[async_trait]
impl SearchBackend for InMemorySearchBackend {
    async fn search(
        &self,
        query: &CombinedQuery,
        offset: usize,
        limit: usize,
    ) -> Result<Page<Document>, BackendError> {
        let mut hits = self.matching(query).await?;
        let total = hits.len() as u64;

        if !query.sort_orders.is_empty() {
            hits.sort_by(|a, b| compare_for_sort(query, &a.content, &b.content));
        }

        let content = hits
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|mut document| {
                if !query.extracts.is_empty() {
                    document.content = extract(&document.content, &query.extracts, query.selected);
                }
                document
            })
            .collect();

        debug!(total, offset, limit, "In-memory search complete");
        Ok(Page::new(content, offset, limit, total))
    }

    async fn count(&self, query: &CombinedQuery) -> Result<u64, BackendError> {
        Ok(self.matching(query).await?.len() as u64)
    }

    async fn exists(&self, query: &CombinedQuery) -> Result<bool, BackendError> {
        let docs = self.documents.read().await;
        for document in docs.values() {
            if document_matches(query, document, self.wildcard)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn delete(&self, query: &CombinedQuery) -> Result<u64, BackendError> {
        let mut docs = self.documents.write().await;
        let mut doomed = Vec::new();
        for (uri, document) in docs.iter() {
            if document_matches(query, document, self.wildcard)? {
                doomed.push(uri.clone());
            }
        }
        for uri in &doomed {
            docs.remove(uri);
        }
        Ok(doomed.len() as u64)
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

fn document_matches(
    query: &CombinedQuery,
    document: &Document,
    wildcard: char,
) -> Result<bool, BackendError> {
    if !query.collections.is_empty()
        && !query.collections.iter().any(|c| document.in_collection(c))
    {
        return Ok(false);
    }
    if let Some(qtext) = query.qtext.as_deref() {
        if !matches_free_text(qtext, &document.content) {
            return Ok(false);
        }
    }
    evaluate(&query.structured, &document.content, &document.content, wildcard)
}

/// Every whitespace-separated token must occur in some string value.
fn matches_free_text(qtext: &str, content: &Value) -> bool {
    let mut strings = Vec::new();
    collect_strings(content, &mut strings);
    let strings: Vec<String> = strings.iter().map(|s| s.to_lowercase()).collect();
    qtext
        .split_whitespace()
        .map(str::to_lowercase)
        .all(|token| strings.iter().any(|s| s.contains(&token)))
}

fn collect_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => out.push(s),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
        _ => {}
    }
}

fn evaluate(
    query: &StructuredQuery,
    root: &Value,
    node: &Value,
    wildcard: char,
) -> Result<bool, BackendError> {
    match query {
        StructuredQuery::And { queries } => {
            for q in queries {
                if !evaluate(q, root, node, wildcard)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        StructuredQuery::Or { queries } => {
            for q in queries {
                if evaluate(q, root, node, wildcard)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        StructuredQuery::Not { query } => Ok(!evaluate(query, root, node, wildcard)?),
        StructuredQuery::Word {
            element,
            text,
            options,
            ..
        } => {
            let case_sensitive = options.iter().any(|o| o == "case-sensitive");
            let patterns = text
                .iter()
                .map(|term| wildcard_regex(term, wildcard, case_sensitive))
                .collect::<Result<Vec<_>, _>>()?;
            let candidates = scalars(lookup(element, root, node));
            Ok(candidates.iter().any(|value| {
                value.as_str().is_some_and(|s| {
                    s.split(|c: char| !c.is_alphanumeric())
                        .filter(|w| !w.is_empty())
                        .any(|word| patterns.iter().any(|p| p.is_match(word)))
                })
            }))
        }
        StructuredQuery::Value {
            element,
            values,
            options,
            ..
        } => {
            let case_insensitive = options.iter().any(|o| o == "case-insensitive");
            let candidates = scalars(lookup(element, root, node));
            Ok(candidates.iter().any(|candidate| {
                values
                    .iter()
                    .any(|expected| value_equals(candidate, expected, case_insensitive))
            }))
        }
        StructuredQuery::Range {
            index,
            operator,
            values,
            ..
        } => {
            let candidates = scalars(lookup(index, root, node));
            Ok(candidates.iter().any(|candidate| {
                values.iter().any(|bound| {
                    compare_to(candidate, bound).is_some_and(|ordering| operator.accepts(ordering))
                })
            }))
        }
        StructuredQuery::Container { element, query } => {
            for scope in nodes(lookup(element, root, node)) {
                if evaluate(query, root, scope, wildcard)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}

/// Anchored, wildcard-aware pattern for one word term.
fn wildcard_regex(term: &str, wildcard: char, case_sensitive: bool) -> Result<Regex, BackendError> {
    let body = term
        .split(wildcard)
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    let flags = if case_sensitive { "" } else { "(?i)" };
    Regex::new(&format!("{flags}^{body}$"))
        .map_err(|e| BackendError::InvalidQuery(format!("word term '{}': {}", term, e)))
}

/// Values an element refers to, relative to `node`. Path indexes resolve
/// from the document root; properties and elements match at any depth.
fn lookup<'a>(element: &Element, root: &'a Value, node: &'a Value) -> Vec<&'a Value> {
    let mut out = Vec::new();
    match element {
        Element::PathIndex(path) => {
            let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
            follow_path(root, &segments, &mut out);
        }
        Element::JsonProperty(name) | Element::XmlElement { name, .. } => {
            descendants_named(node, name, &mut out);
        }
    }
    out
}

fn follow_path<'a>(value: &'a Value, segments: &[&str], out: &mut Vec<&'a Value>) {
    match (segments.split_first(), value) {
        (None, _) => out.push(value),
        (Some(_), Value::Array(items)) => {
            items.iter().for_each(|item| follow_path(item, segments, out))
        }
        (Some((first, rest)), Value::Object(map)) => {
            if let Some(child) = map.get(*first) {
                follow_path(child, rest, out);
            }
        }
        _ => {}
    }
}

fn descendants_named<'a>(value: &'a Value, name: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key == name {
                    out.push(child);
                }
                descendants_named(child, name, out);
            }
        }
        Value::Array(items) => items.iter().for_each(|item| descendants_named(item, name, out)),
        _ => {}
    }
}

/// Flatten arrays into their scalar members.
fn scalars(values: Vec<&Value>) -> Vec<&Value> {
    let mut out = Vec::new();
    for value in values {
        match value {
            Value::Array(items) => out.extend(scalars(items.iter().collect())),
            Value::Object(_) => {}
            scalar => out.push(scalar),
        }
    }
    out
}

/// Flatten arrays into the nodes a container query scopes to.
fn nodes(values: Vec<&Value>) -> Vec<&Value> {
    let mut out = Vec::new();
    for value in values {
        match value {
            Value::Array(items) => out.extend(nodes(items.iter().collect())),
            other => out.push(other),
        }
    }
    out
}

fn value_equals(candidate: &Value, expected: &QueryValue, case_insensitive: bool) -> bool {
    match (candidate, expected) {
        (Value::String(s), QueryValue::Text(t)) if case_insensitive => {
            s.to_lowercase() == t.to_lowercase()
        }
        (Value::String(s), QueryValue::Text(t)) => s == t,
        (Value::Bool(b), QueryValue::Boolean(e)) => b == e,
        (Value::Number(n), QueryValue::Integer(i)) => {
            n.as_i64() == Some(*i) || n.as_f64() == Some(*i as f64)
        }
        (Value::Number(n), QueryValue::Decimal(d)) => n.as_f64() == Some(*d),
        _ => compare_to(candidate, expected) == Some(Ordering::Equal),
    }
}

/// Order a stored value against a query value of a compatible kind.
fn compare_to(candidate: &Value, bound: &QueryValue) -> Option<Ordering> {
    match (candidate, bound) {
        (Value::Number(n), QueryValue::Integer(i)) => n.as_f64()?.partial_cmp(&(*i as f64)),
        (Value::Number(n), QueryValue::Decimal(d)) => n.as_f64()?.partial_cmp(d),
        (Value::String(s), QueryValue::Text(t)) => Some(s.as_str().cmp(t.as_str())),
        (Value::Bool(b), QueryValue::Boolean(e)) => Some(b.cmp(e)),
        (Value::String(s), QueryValue::DateTime(dt)) => Some(parse_date_time(s)?.cmp(dt)),
        (Value::String(s), QueryValue::Date(d)) => {
            let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .or_else(|| parse_date_time(s).map(|dt| dt.date_naive()))?;
            Some(date.cmp(d))
        }
        _ => None,
    }
}

fn parse_date_time(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn sort_key<'a>(index: &SortIndex, content: &'a Value) -> Option<&'a Value> {
    let mut found = Vec::new();
    match index {
        SortIndex::Path(path) => {
            let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
            follow_path(content, &segments, &mut found);
        }
        SortIndex::Element(name) => descendants_named(content, name, &mut found),
    }
    scalars(found).into_iter().next()
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => match (parse_date_time(x), parse_date_time(y)) {
            (Some(dx), Some(dy)) => dx.cmp(&dy),
            _ => x.cmp(y),
        },
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

/// Compare two documents by the query's sort orders. Documents without a
/// sort value go last regardless of direction.
fn compare_for_sort(query: &CombinedQuery, a: &Value, b: &Value) -> Ordering {
    for order in &query.sort_orders {
        let ordering = match (sort_key(&order.index, a), sort_key(&order.index, b)) {
            (Some(x), Some(y)) => match order.direction {
                SortDirection::Ascending => compare_values(x, y),
                SortDirection::Descending => compare_values(y, x),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Apply extract paths to a document according to the selected mode.
fn extract(content: &Value, paths: &[String], mode: SelectedMode) -> Value {
    let segments: Vec<Vec<&str>> = paths.iter().map(|p| path_segments(p)).collect();
    match mode {
        SelectedMode::All => content.clone(),
        SelectedMode::Hierarchical => {
            let refs: Vec<&[&str]> = segments.iter().map(Vec::as_slice).collect();
            prune(content, &refs).unwrap_or_else(|| Value::Object(Map::new()))
        }
        SelectedMode::Include => {
            let mut out = Vec::new();
            for path in &segments {
                follow_path(content, path, &mut out);
            }
            Value::Array(out.into_iter().cloned().collect())
        }
        SelectedMode::Exclude => {
            let mut pruned = content.clone();
            for path in &segments {
                remove_path(&mut pruned, path);
            }
            pruned
        }
    }
}

/// Keep only the nodes on `paths`, with their ancestors.
fn prune(value: &Value, paths: &[&[&str]]) -> Option<Value> {
    if paths.iter().any(|p| p.is_empty()) {
        return Some(value.clone());
    }
    match value {
        Value::Object(map) => {
            let mut kept = Map::new();
            for (key, child) in map {
                let rest: Vec<&[&str]> = paths
                    .iter()
                    .filter(|p| p[0] == key.as_str())
                    .map(|p| &p[1..])
                    .collect();
                if rest.is_empty() {
                    continue;
                }
                if let Some(sub) = prune(child, &rest) {
                    kept.insert(key.clone(), sub);
                }
            }
            (!kept.is_empty()).then_some(Value::Object(kept))
        }
        Value::Array(items) => {
            let kept: Vec<Value> = items.iter().filter_map(|item| prune(item, paths)).collect();
            (!kept.is_empty()).then_some(Value::Array(kept))
        }
        _ => None,
    }
}

fn remove_path(value: &mut Value, segments: &[&str]) {
    match (segments, value) {
        ([], _) => {}
        (_, Value::Array(items)) => items.iter_mut().for_each(|item| remove_path(item, segments)),
        ([last], Value::Object(map)) => {
            map.remove(*last);
        }
        ([first, rest @ ..], Value::Object(map)) => {
            if let Some(child) = map.get_mut(*first) {
                remove_path(child, rest);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use critql_query::RangeOperator;
    use serde_json::json;

    fn bobby() -> Value {
        json!({
            "name": "Bobby",
            "age": 23,
            "gender": "male",
            "occupation": "Software Engineer",
            "birthtime": "1993-04-01T08:00:00Z",
            "pets": [ { "name": "Fluffy", "type": "cat" }, { "name": "Rex", "type": "dog" } ]
        })
    }

    fn word(name: &str, term: &str) -> StructuredQuery {
        StructuredQuery::word(Element::json_property(name), vec![term.to_string()], vec![], 1.0)
    }

    fn eval(query: &StructuredQuery) -> bool {
        let doc = bobby();
        evaluate(query, &doc, &doc, '*').unwrap()
    }

    #[test]
    fn test_word_wildcards() {
        assert!(eval(&word("occupation", "*engineer*")));
        assert!(eval(&word("occupation", "soft*")));
        assert!(eval(&word("occupation", "engineer")));
        assert!(!eval(&word("occupation", "engine")));
        assert!(!eval(&word("occupation", "*knit*")));
    }

    #[test]
    fn test_word_honours_custom_wildcard() {
        let doc = bobby();
        let q = word("occupation", "%engin%");
        assert!(evaluate(&q, &doc, &doc, '%').unwrap());
        assert!(!evaluate(&q, &doc, &doc, '*').unwrap());
    }

    #[tokio::test]
    async fn test_backend_wildcard_matches_compiled_terms() {
        let backend = InMemorySearchBackend::new().with_wildcard('%');
        backend.insert_new(["Person"], bobby()).await;
        let query = CombinedQuery::new(word("occupation", "%engin%"));
        assert_eq!(backend.count(&query).await.unwrap(), 1);
        assert_eq!(InMemorySearchBackend::new().count(&query).await.unwrap(), 0);
    }

    #[test]
    fn test_word_is_case_insensitive_by_default() {
        assert!(eval(&word("name", "BOBBY")));
    }

    #[test]
    fn test_value_equality() {
        let q = StructuredQuery::value(
            Element::json_property("age"),
            vec![QueryValue::Integer(23)],
            vec!["exact".to_string()],
            1.0,
        );
        assert!(eval(&q));
        let q = StructuredQuery::value(
            Element::json_property("gender"),
            vec!["Male".into()],
            vec!["exact".to_string()],
            1.0,
        );
        assert!(!eval(&q));
    }

    #[test]
    fn test_range_path_index_and_date_time() {
        let older = StructuredQuery::range(
            Element::path_index("/age"),
            "xs:int",
            RangeOperator::Gt,
            vec![QueryValue::Integer(20)],
            vec![],
        );
        assert!(eval(&older));

        let born_after = StructuredQuery::range(
            Element::json_property("birthtime"),
            "xs:dateTime",
            RangeOperator::Gt,
            vec![QueryValue::DateTime(parse_date_time("2000-01-01T00:00:00Z").unwrap())],
            vec![],
        );
        assert!(!eval(&born_after));
    }

    #[test]
    fn test_container_scoping() {
        let in_pets = StructuredQuery::container(Element::json_property("pets"), word("name", "fluffy"));
        assert!(eval(&in_pets));
        let same_pet = StructuredQuery::container(
            Element::json_property("pets"),
            StructuredQuery::and([word("name", "fluffy"), word("type", "dog")]),
        );
        assert!(!eval(&same_pet));
    }

    #[test]
    fn test_boolean_composition() {
        assert!(eval(&StructuredQuery::match_all()));
        assert!(eval(&StructuredQuery::or([word("name", "nobody"), word("name", "bob*")])));
        assert!(!eval(&StructuredQuery::not(word("name", "bob*"))));
    }

    #[test]
    fn test_free_text_tokens() {
        assert!(matches_free_text("software BOBBY", &bobby()));
        assert!(!matches_free_text("software knitter", &bobby()));
    }

    #[test]
    fn test_hierarchical_extract() {
        let extracted = extract(
            &bobby(),
            &["/name".to_string(), "/pets/name".to_string()],
            SelectedMode::Hierarchical,
        );
        assert_eq!(
            extracted,
            json!({ "name": "Bobby", "pets": [ { "name": "Fluffy" }, { "name": "Rex" } ] })
        );
    }

    #[test]
    fn test_include_and_exclude_extract() {
        let included = extract(&bobby(), &["/pets/name".to_string()], SelectedMode::Include);
        assert_eq!(included, json!(["Fluffy", "Rex"]));

        let excluded = extract(&bobby(), &["/pets".to_string()], SelectedMode::Exclude);
        assert!(excluded.get("pets").is_none());
        assert_eq!(excluded["name"], json!("Bobby"));
    }
}
