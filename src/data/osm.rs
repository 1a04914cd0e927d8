use std::collections::HashMap;

use crate::errors::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Point,
    Way,
    Other,
}

impl ElementKind {
    pub fn from_name(name: &[u8]) -> ElementKind {
        match name {
            b"node" => ElementKind::Point,
            b"way" => ElementKind::Way,
            _ => ElementKind::Other,
        }
    }

    /// Element name used in the .osm markup.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Point => "node",
            ElementKind::Way => "way",
            ElementKind::Other => "other",
        }
    }
}

/// One `<tag k=".." v=".."/>` child, untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTag {
    pub key: String,
    pub value: String,
}

impl RawTag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> RawTag {
        RawTag {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A fully parsed point or way subtree. Only lives until it has been shaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceElement {
    pub kind: ElementKind,
    pub attributes: HashMap<String, String>,
    pub tags: Vec<RawTag>,
    /// Referenced point ids of a way, in document order.
    pub refs: Vec<String>,
}

impl SourceElement {
    pub fn new(kind: ElementKind) -> SourceElement {
        SourceElement {
            kind,
            attributes: HashMap::new(),
            tags: Vec::new(),
            refs: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Result<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::missing_attribute(self.kind.name(), name))
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> SourceElement {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> SourceElement {
        self.tags.push(RawTag::new(key, value));
        self
    }

    pub fn with_ref(mut self, node_id: &str) -> SourceElement {
        self.refs.push(node_id.to_string());
        self
    }
}
