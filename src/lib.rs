//! **Exact graph edit distance for GraphQL schema snapshots.**
//!
//! `graphql-ged` measures how far apart two schema snapshots are by encoding
//! each one as a labeled directed multigraph and computing the minimum-cost
//! sequence of vertex and edge edits turning one graph into the other. The
//! result is both a number, the edit distance, and an optimal edit script
//! explaining it.
//!
//! Because the distance is computed over a graph encoding rather than over
//! text, a rename is a single change, moving a field's type through a wrapper
//! is a single edge relabel, and reordering definitions costs nothing.
//!
//! ## Core Concepts & Modules
//!
//! - **[`model`]**: the [`Schema`] snapshot structures, and
//!   [`build_schema_graph`] which encodes a snapshot as a [`SchemaGraph`].
//! - **[`diff`]**: home of the [`DiffEngine`], which computes the exact edit
//!   distance between two graphs along with a [`DiffResult`] edit script.
//! - **[`cancellation`]**: a [`CancellationToken`] for aborting expensive
//!   diffs from another thread.
//!
//! ## Getting Started
//!
//! ```
//! use graphql_ged::{
//!     DiffEngine, FieldDefinition, ObjectType, Schema, TypeDefinition, TypeRef,
//! };
//!
//! let old = Schema::new().with_type(TypeDefinition::Object(
//!     ObjectType::new("Query")
//!         .with_field(FieldDefinition::new("user", TypeRef::new("String"))),
//! ));
//! let new = Schema::new().with_type(TypeDefinition::Object(
//!     ObjectType::new("Query")
//!         .with_field(FieldDefinition::new("account", TypeRef::new("String"))),
//! ));
//!
//! let result = DiffEngine::new().diff(&old, &new)?;
//! assert_eq!(result.ged, 1); // one field rename
//! # Ok::<(), graphql_ged::SchemaDiffError>(())
//! ```
//!
//! ## Cancellation
//!
//! Graph edit distance is NP-hard; adversarial schema pairs can make the
//! search run long. Attach a [`CancellationToken`] and stop it from a watcher
//! thread to put a hard ceiling on the computation:
//!
//! ```
//! use graphql_ged::{CancellationToken, DiffEngine, Schema, SchemaDiffError};
//!
//! let token = CancellationToken::new();
//! let engine = DiffEngine::new().with_cancellation(token.clone());
//! token.stop();
//! let err = engine.diff(&Schema::new(), &Schema::new()).unwrap_err();
//! assert!(matches!(err, SchemaDiffError::Cancelled));
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    // Cost sums cast between usize and i64; all values are bounded by the
    // graph sizes in practice
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    // Variable names like `pv`/`pu` are clear in context
    clippy::similar_names
)]

pub mod cancellation;
pub mod diff;
pub mod error;
pub mod model;

// Re-export main types for convenience
pub use cancellation::CancellationToken;
pub use diff::{DiffEngine, DiffResult, EditOperation};
pub use error::{Result, SchemaDiffError};
pub use model::{
    build_schema_graph, AppliedDirective, ArgumentDefinition, DirectiveDefinition, EnumType,
    EnumValueDefinition, FieldDefinition, InputFieldDefinition, InputObjectType, InterfaceType,
    ObjectType, ScalarType, Schema, SchemaGraph, TypeDefinition, TypeRef, UnionType, Vertex,
    VertexId, VertexKind,
};
