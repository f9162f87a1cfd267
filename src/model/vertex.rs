//! Schema graph vertex representation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dense index of a vertex inside its owning [`SchemaGraph`](super::SchemaGraph).
///
/// Vertices are distinguished by identity rather than value: two vertices with
/// identical kind and properties (two fields named `id` on different types)
/// are still distinct graph members, so every map and set in the diff core is
/// keyed by this arena index instead of the vertex contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u32);

impl VertexId {
    /// Position of the vertex in the owning graph's arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Category tag of a schema graph vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    Object,
    Interface,
    Union,
    Field,
    Argument,
    InputObject,
    InputField,
    Scalar,
    Enum,
    EnumValue,
    Directive,
    AppliedDirective,
    AppliedArgument,
    /// Indirection node carrying a field/argument type-signature edge label,
    /// so a type change stays a cheap edge relabel instead of looking like a
    /// different field.
    DummyType,
    /// Synthetic padding vertex with no real counterpart; mapping a real
    /// vertex to one represents a pure insertion or deletion.
    Isolated,
}

impl VertexKind {
    /// Stable lowercase name, used in debug labels and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Interface => "interface",
            Self::Union => "union",
            Self::Field => "field",
            Self::Argument => "argument",
            Self::InputObject => "input-object",
            Self::InputField => "input-field",
            Self::Scalar => "scalar",
            Self::Enum => "enum",
            Self::EnumValue => "enum-value",
            Self::Directive => "directive",
            Self::AppliedDirective => "applied-directive",
            Self::AppliedArgument => "applied-argument",
            Self::DummyType => "dummy-type",
            Self::Isolated => "isolated",
        }
    }

    /// Whether vertices of this kind live inside a declaring container and
    /// therefore have a containment parent edge.
    #[must_use]
    pub const fn is_contained(self) -> bool {
        matches!(
            self,
            Self::Field
                | Self::Argument
                | Self::InputField
                | Self::EnumValue
                | Self::AppliedDirective
                | Self::AppliedArgument
                | Self::DummyType
        )
    }
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled vertex: a kind tag plus an ordered property map.
///
/// Properties carry at minimum `name` (except on isolated vertices) and often
/// `description`; the map is ordered so rendered output is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    pub kind: VertexKind,
    pub properties: IndexMap<String, String>,
}

impl Vertex {
    /// Create a vertex of the given kind with a `name` property.
    #[must_use]
    pub fn new(kind: VertexKind, name: impl Into<String>) -> Self {
        let mut properties = IndexMap::new();
        properties.insert("name".to_string(), name.into());
        Self { kind, properties }
    }

    /// Create a synthetic isolated padding vertex. It carries no properties
    /// on purpose: it must never compare label-equal to a real vertex.
    #[must_use]
    pub fn isolated() -> Self {
        Self {
            kind: VertexKind::Isolated,
            properties: IndexMap::new(),
        }
    }

    /// Add a property, builder-style. Empty-valued optional properties are
    /// expected to be skipped by callers rather than stored.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The `name` property, or an empty string for isolated vertices.
    #[must_use]
    pub fn name(&self) -> &str {
        self.property("name").unwrap_or_default()
    }

    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    #[must_use]
    pub const fn is_isolated(&self) -> bool {
        matches!(self.kind, VertexKind::Isolated)
    }

    /// Structural label equality: same kind and identical property map.
    /// This is the "no relabel needed" test of the cost model, deliberately
    /// independent of vertex identity.
    #[must_use]
    pub fn same_label(&self, other: &Self) -> bool {
        self.kind == other.kind && self.properties == other.properties
    }

    /// Short human-readable label for logs and operation rendering.
    #[must_use]
    pub fn debug_label(&self) -> String {
        if self.is_isolated() {
            "isolated".to_string()
        } else {
            format!("{}:{}", self.kind, self.name())
        }
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.debug_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_label_ignores_identity() {
        let a = Vertex::new(VertexKind::Field, "id");
        let b = Vertex::new(VertexKind::Field, "id");
        assert!(a.same_label(&b));
    }

    #[test]
    fn test_same_label_detects_kind_difference() {
        let a = Vertex::new(VertexKind::Field, "id");
        let b = Vertex::new(VertexKind::Argument, "id");
        assert!(!a.same_label(&b));
    }

    #[test]
    fn test_same_label_detects_property_difference() {
        let a = Vertex::new(VertexKind::Field, "id");
        let b = Vertex::new(VertexKind::Field, "id").with_property("description", "primary key");
        assert!(!a.same_label(&b));
    }

    #[test]
    fn test_isolated_never_matches_real_vertex() {
        let real = Vertex::new(VertexKind::Field, "id");
        assert!(!Vertex::isolated().same_label(&real));
        assert!(Vertex::isolated().same_label(&Vertex::isolated()));
    }

    #[test]
    fn test_debug_label() {
        let v = Vertex::new(VertexKind::Object, "Query");
        assert_eq!(v.debug_label(), "object:Query");
        assert_eq!(Vertex::isolated().debug_label(), "isolated");
    }
}
