// SPDX-License-Identifier: PMPL-1.0-or-later
//! Entity metadata and format-aware field addressing.

use std::collections::{HashMap, HashSet};

use critql_query::{DocumentFormat, Element};

/// Entity metadata lookup consumed by the compiler and executor.
pub trait EntityMetadataProvider: Send + Sync {
    /// Document format of an entity; `None` when unregistered or unspecified.
    fn format_of(&self, entity: &str) -> Option<DocumentFormat>;

    /// Collection the entity's documents live in.
    fn collection_of(&self, _entity: &str) -> Option<String> {
        None
    }

    /// Whether `property` is backed by an element range index.
    fn is_element_indexed(&self, _entity: &str, _property: &str) -> bool {
        false
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityMetadata {
    pub format: Option<DocumentFormat>,
    pub collection: Option<String>,
    pub element_indexes: HashSet<String>,
}

impl EntityMetadata {
    pub fn new(format: DocumentFormat) -> Self {
        Self {
            format: Some(format),
            ..Default::default()
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    pub fn with_element_index(mut self, property: impl Into<String>) -> Self {
        self.element_indexes.insert(property.into());
        self
    }
}

/// In-memory entity registry.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: HashMap<String, EntityMetadata>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entity: impl Into<String>, metadata: EntityMetadata) {
        self.entities.insert(entity.into(), metadata);
    }

    pub fn with_entity(mut self, entity: impl Into<String>, metadata: EntityMetadata) -> Self {
        self.register(entity, metadata);
        self
    }

    pub fn get(&self, entity: &str) -> Option<&EntityMetadata> {
        self.entities.get(entity)
    }
}

impl EntityMetadataProvider for EntityRegistry {
    fn format_of(&self, entity: &str) -> Option<DocumentFormat> {
        self.entities.get(entity).and_then(|m| m.format)
    }

    fn collection_of(&self, entity: &str) -> Option<String> {
        self.entities.get(entity).and_then(|m| m.collection.clone())
    }

    fn is_element_indexed(&self, entity: &str, property: &str) -> bool {
        self.entities
            .get(entity)
            .is_some_and(|m| m.element_indexes.contains(property))
    }
}

/// Addressing mode for one compile call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatAdapter {
    format: DocumentFormat,
}

impl FormatAdapter {
    pub fn new(format: DocumentFormat) -> Self {
        Self { format }
    }

    /// Resolve the entity's format, falling back to `default`.
    pub fn resolve(provider: &dyn EntityMetadataProvider, entity: &str, default: DocumentFormat) -> Self {
        Self::new(provider.format_of(entity).unwrap_or(default))
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Leaf addressing for `name`: an XML element or a JSON property.
    pub fn element(&self, name: &str) -> Element {
        match self.format {
            DocumentFormat::Xml => Element::xml_element(name),
            DocumentFormat::Json => Element::json_property(name),
        }
    }
}
