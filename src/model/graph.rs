//! Labeled directed multigraph over schema elements.
//!
//! The graph is append-only: the diff engine pads both sides with synthetic
//! isolated vertices while computing possible mappings, and nothing is ever
//! removed. Adjacency is indexed in both directions so the cost model can
//! walk outgoing and incoming edges without scanning the edge arena.

use super::edge::{Edge, EdgeId};
use super::vertex::{Vertex, VertexId, VertexKind};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    outgoing: Vec<Vec<EdgeId>>,
    incoming: Vec<Vec<EdgeId>>,
    /// Top-level lookup: named types by name, directive definitions by
    /// `@name`. Contained vertices are reached through adjacency instead.
    by_name: HashMap<String, VertexId>,
}

impl SchemaGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex and return its identity.
    pub fn add_vertex(&mut self, vertex: Vertex) -> VertexId {
        let id = VertexId(u32::try_from(self.vertices.len()).unwrap_or(u32::MAX));
        if !vertex.is_isolated() && !vertex.kind.is_contained() {
            let key = match vertex.kind {
                VertexKind::Directive => format!("@{}", vertex.name()),
                _ => vertex.name().to_string(),
            };
            self.by_name.entry(key).or_insert(id);
        }
        self.vertices.push(vertex);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    /// Append a directed labeled edge between existing vertices.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, label: impl Into<String>) -> EdgeId {
        debug_assert!(from.index() < self.vertices.len());
        debug_assert!(to.index() < self.vertices.len());
        let id = EdgeId(u32::try_from(self.edges.len()).unwrap_or(u32::MAX));
        self.edges.push(Edge::new(from, to, label));
        self.outgoing[from.index()].push(id);
        self.incoming[to.index()].push(id);
        id
    }

    #[must_use]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(|i| VertexId(i as u32))
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Edges leaving `v`, in insertion order.
    #[must_use]
    pub fn adjacent_edges(&self, v: VertexId) -> &[EdgeId] {
        &self.outgoing[v.index()]
    }

    /// Edges arriving at `v`, in insertion order.
    #[must_use]
    pub fn inverse_adjacent_edges(&self, v: VertexId) -> &[EdgeId] {
        &self.incoming[v.index()]
    }

    /// First edge from `from` to `to`, if any. With multi-edges between the
    /// same pair the first inserted one wins; the schema builder never emits
    /// parallel edges between one pair, so the choice is immaterial here.
    #[must_use]
    pub fn edge_between(&self, from: VertexId, to: VertexId) -> Option<&Edge> {
        self.outgoing[from.index()]
            .iter()
            .map(|id| self.edge(*id))
            .find(|e| e.to == to)
    }

    /// Look up a top-level vertex: a named type by name, or a directive
    /// definition by `@name`.
    #[must_use]
    pub fn vertex_named(&self, name: &str) -> Option<VertexId> {
        self.by_name.get(name).copied()
    }

    /// Containment parent of a contained vertex: the source of its first
    /// incoming edge. Top-level and isolated vertices have no parent.
    #[must_use]
    pub fn parent(&self, v: VertexId) -> Option<VertexId> {
        if !self.vertex(v).kind.is_contained() {
            return None;
        }
        self.incoming[v.index()].first().map(|id| self.edge(*id).from)
    }

    /// Dotted path from the outermost container down to `v`, for logs and
    /// operation rendering. Directives and applied directives are prefixed
    /// with `@`, dummy type vertices render as `<type>`.
    #[must_use]
    pub fn qualified_name(&self, v: VertexId) -> String {
        let vertex = self.vertex(v);
        let own = match vertex.kind {
            VertexKind::Isolated => return "isolated".to_string(),
            VertexKind::DummyType => "<type>".to_string(),
            VertexKind::Directive | VertexKind::AppliedDirective => format!("@{}", vertex.name()),
            _ => vertex.name().to_string(),
        };
        match self.parent(v) {
            Some(p) => format!("{}.{}", self.qualified_name(p), own),
            None => own,
        }
    }
}
