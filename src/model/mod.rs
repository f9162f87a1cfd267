//! Schema snapshot model and its graph encoding.
//!
//! A [`Schema`] is the declarative snapshot callers build or parse; the
//! [`build_schema_graph`] pass turns it into the [`SchemaGraph`] multigraph
//! the diff engine operates on.

mod builder;
mod edge;
mod graph;
mod schema;
mod vertex;

pub use builder::build_schema_graph;
pub use edge::{Edge, EdgeId};
pub use graph::SchemaGraph;
pub use schema::*;
pub use vertex::{Vertex, VertexId, VertexKind};
