//! Schema diff engine implementation.

use super::cost::editorial_cost_with_operations;
use super::mapping::Mapping;
use super::possible_mappings::compute_possible_mappings;
use super::result::DiffResult;
use super::search::find_minimum_mapping;
use crate::cancellation::CancellationToken;
use crate::error::Result;
use crate::model::{build_schema_graph, Schema, SchemaGraph, VertexId};

/// Graph edit distance engine for comparing two schema snapshots.
///
/// The result is the exact minimum edit distance between the schemas' graph
/// encodings, together with one optimal edit script. The underlying problem
/// is NP-hard; the candidate pruning keeps realistic schema pairs tractable,
/// and a [`CancellationToken`] puts a hard stop on the pathological ones.
pub struct DiffEngine {
    cancellation: CancellationToken,
}

impl DiffEngine {
    /// Create a new diff engine with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cancellation: CancellationToken::new(),
        }
    }

    /// Attach a cancellation token observed throughout the computation.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Diff two schema snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDiffError::InvalidSchema`](crate::SchemaDiffError::InvalidSchema)
    /// when a snapshot cannot be encoded, or
    /// [`SchemaDiffError::Cancelled`](crate::SchemaDiffError::Cancelled) when
    /// the token fires mid-computation.
    pub fn diff(&self, source: &Schema, target: &Schema) -> Result<DiffResult> {
        let source_graph = build_schema_graph(source)?;
        let target_graph = build_schema_graph(target)?;
        self.diff_graphs(source_graph, target_graph)
    }

    /// Diff two already-encoded schema graphs. Takes the graphs by value:
    /// both sides are padded with synthetic vertices during candidate
    /// computation.
    pub fn diff_graphs(
        &self,
        mut source: SchemaGraph,
        mut target: SchemaGraph,
    ) -> Result<DiffResult> {
        self.cancellation.check()?;
        let possible = compute_possible_mappings(&mut source, &mut target);

        if possible.is_fully_fixed() {
            // Every pair was decided by context alone; the mapping is the
            // optimum and no search is needed.
            tracing::debug!(pairs = possible.fixed().len(), "mapping fully fixed");
            let mapping = Mapping::new(possible.fixed().clone());
            let (ged, operations) = editorial_cost_with_operations(&mapping, &source, &target);
            return Ok(DiffResult { ged, operations });
        }

        // Decide the most constrained vertices first; small candidate sets
        // fail fast and keep the search tree narrow.
        let mut order: Vec<VertexId> = possible.pooled_sources().to_vec();
        order.sort_by_key(|v| possible.candidate_count(*v));

        let (ged, mapping) =
            find_minimum_mapping(&source, &target, &possible, &order, &self.cancellation)?;
        let (exact, operations) = editorial_cost_with_operations(&mapping, &source, &target);
        debug_assert_eq!(exact, ged);
        Ok(DiffResult { ged, operations })
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}
