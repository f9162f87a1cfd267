//! Schema graph edge representation.

use super::vertex::VertexId;
use serde::{Deserialize, Serialize};

/// Dense index of an edge inside its owning [`SchemaGraph`](super::SchemaGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl EdgeId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A directed labeled edge. Multiple edges between the same vertex pair are
/// allowed; the label (possibly empty) is what the cost model compares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
    pub label: String,
}

impl Edge {
    #[must_use]
    pub fn new(from: VertexId, to: VertexId, label: impl Into<String>) -> Self {
        Self {
            from,
            to,
            label: label.into(),
        }
    }
}
