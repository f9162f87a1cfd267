//! Diff output: the edit distance and the edit operations realizing it.

use crate::model::Vertex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One primitive edit turning the source graph into the target graph.
///
/// Vertex operations carry the full vertex labels; edge operations carry the
/// qualified names of the endpoints as rendered by the owning graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOperation {
    InsertVertex {
        target: Vertex,
    },
    DeleteVertex {
        source: Vertex,
    },
    ChangeVertex {
        source: Vertex,
        target: Vertex,
    },
    InsertEdge {
        from: String,
        to: String,
        label: String,
    },
    DeleteEdge {
        from: String,
        to: String,
        label: String,
    },
    ChangeEdge {
        from: String,
        to: String,
        source_label: String,
        target_label: String,
    },
}

impl fmt::Display for EditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsertVertex { target } => write!(f, "insert vertex {target}"),
            Self::DeleteVertex { source } => write!(f, "delete vertex {source}"),
            Self::ChangeVertex { source, target } => {
                write!(f, "change vertex {source} -> {target}")
            }
            Self::InsertEdge { from, to, label } => {
                write!(f, "insert edge {from} -> {to} ({label})")
            }
            Self::DeleteEdge { from, to, label } => {
                write!(f, "delete edge {from} -> {to} ({label})")
            }
            Self::ChangeEdge {
                from,
                to,
                source_label,
                target_label,
            } => write!(
                f,
                "change edge {from} -> {to} ({source_label} -> {target_label})"
            ),
        }
    }
}

/// The result of a schema diff: the graph edit distance and one optimal edit
/// script realizing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffResult {
    /// The minimal total edit cost.
    pub ged: usize,
    /// Operations realizing `ged`; their count equals `ged` since every
    /// operation costs one.
    pub operations: Vec<EditOperation>,
}

impl DiffResult {
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.ged == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Vertex, VertexKind};

    #[test]
    fn test_operation_display() {
        let op = EditOperation::ChangeVertex {
            source: Vertex::new(VertexKind::Field, "id"),
            target: Vertex::new(VertexKind::Field, "uid"),
        };
        assert_eq!(op.to_string(), "change vertex field:id -> field:uid");
    }

    #[test]
    fn test_serialization_tags_operations() {
        let op = EditOperation::InsertEdge {
            from: "Query".to_string(),
            to: "Query.user".to_string(),
            label: String::new(),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["op"], "insert_edge");
        assert_eq!(json["from"], "Query");
    }
}
