// SPDX-License-Identifier: PMPL-1.0-or-later
//! Document node addressing for leaf and container queries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a query refers to a node inside a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// A JSON property, matched at any depth unless scoped by a container.
    JsonProperty(String),
    /// An XML element, optionally namespaced.
    XmlElement {
        namespace: Option<String>,
        name: String,
    },
    /// A path range index, addressed by an absolute path expression.
    PathIndex(String),
}

impl Element {
    pub fn json_property(name: impl Into<String>) -> Self {
        Element::JsonProperty(name.into())
    }

    /// An XML element in the empty namespace.
    pub fn xml_element(name: impl Into<String>) -> Self {
        Element::XmlElement {
            namespace: None,
            name: name.into(),
        }
    }

    pub fn path_index(path: impl Into<String>) -> Self {
        Element::PathIndex(path.into())
    }

    /// The local name (or path expression) this element refers to.
    pub fn name(&self) -> &str {
        match self {
            Element::JsonProperty(name) => name,
            Element::XmlElement { name, .. } => name,
            Element::PathIndex(path) => path,
        }
    }

    pub fn is_path_index(&self) -> bool {
        matches!(self, Element::PathIndex(_))
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::JsonProperty(name) => write!(f, "json-property({})", name),
            Element::XmlElement {
                namespace: Some(ns),
                name,
            } => write!(f, "element({{{}}}{})", ns, name),
            Element::XmlElement {
                namespace: None,
                name,
            } => write!(f, "element({})", name),
            Element::PathIndex(path) => write!(f, "path-index({})", path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(Element::json_property("age").name(), "age");
        assert_eq!(Element::xml_element("age").name(), "age");
        assert_eq!(Element::path_index("/pets/name").name(), "/pets/name");
    }

    #[test]
    fn test_display() {
        assert_eq!(Element::json_property("age").to_string(), "json-property(age)");
        assert_eq!(Element::xml_element("age").to_string(), "element(age)");
        let namespaced = Element::XmlElement {
            namespace: Some("http://example.org".to_string()),
            name: "age".to_string(),
        };
        assert_eq!(namespaced.to_string(), "element({http://example.org}age)");
    }

    #[test]
    fn test_json_and_xml_differ() {
        assert_ne!(Element::json_property("name"), Element::xml_element("name"));
        assert!(Element::path_index("/name").is_path_index());
        assert!(!Element::json_property("name").is_path_index());
    }
}
