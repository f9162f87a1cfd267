//! Branch-and-bound search for the minimum-cost mapping.
//!
//! Search-tree nodes decide the target of one more pooled source vertex.
//! Every expansion solves an assignment problem over all still-open vertices,
//! which yields both an admissible lower bound for the node and a complete
//! candidate mapping that is probed against the incumbent immediately. Nodes
//! come off a priority queue cheapest bound first (deeper node on ties), and
//! the search stops as soon as the cheapest open bound reaches the incumbent.
//!
//! Alternative targets for a node's decided vertex are not enumerated
//! eagerly. Each expansion leaves behind a sibling generator wrapping the
//! solver; popping a node pulls exactly one more sibling from its generator,
//! so second-best assignments are only ever computed when the search actually
//! reaches them.

use super::cost::{editorial_cost, lower_bound_pair_cost, FORBIDDEN};
use super::hungarian::HungarianAlgorithm;
use super::mapping::Mapping;
use super::possible_mappings::PossibleMappings;
use crate::cancellation::CancellationToken;
use crate::error::Result;
use crate::model::{SchemaGraph, VertexId};
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;

/// One open node of the search tree.
struct MappingEntry {
    /// Fixed prefix plus the pooled pairs decided so far.
    mapping: Mapping,
    /// Number of pooled sources decided.
    level: usize,
    lower_bound: i64,
    /// Shared with every sibling of this node; pulls alternative targets
    /// for the vertex decided at this level.
    siblings: Rc<RefCell<SiblingGenerator>>,
}

impl PartialEq for MappingEntry {
    fn eq(&self, other: &Self) -> bool {
        self.lower_bound == other.lower_bound && self.level == other.level
    }
}

impl Eq for MappingEntry {}

impl PartialOrd for MappingEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MappingEntry {
    // BinaryHeap pops the greatest entry: smallest bound wins, deeper level
    // breaks ties so near-complete mappings are probed early.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .lower_bound
            .cmp(&self.lower_bound)
            .then_with(|| self.level.cmp(&other.level))
    }
}

/// Lazy enumerator of alternative assignments for one expansion.
struct SiblingGenerator {
    solver: HungarianAlgorithm,
    /// Pristine pair costs; the solver's own matrix is reduced in place and
    /// unusable for scoring.
    scoring: Vec<Vec<i64>>,
    parent: Mapping,
    rows: Vec<VertexId>,
    cols: Vec<VertexId>,
    /// Editorial cost of `parent`, the fixed part of every bound below it.
    base_cost: i64,
    exhausted: bool,
}

impl SiblingGenerator {
    /// Next-best assignment that avoids forbidden cells, with its scoring
    /// sum. Exhaustion is sticky: once the cheapest remaining alternative
    /// crosses into forbidden territory, all later ones do too.
    fn next_valid(&mut self) -> Option<(Vec<usize>, i64)> {
        if self.exhausted {
            return None;
        }
        let Some(assignment) = self.solver.next_best_solution() else {
            self.exhausted = true;
            return None;
        };
        let sum: i64 = assignment
            .iter()
            .enumerate()
            .map(|(i, &j)| self.scoring[i][j])
            .sum();
        if sum >= FORBIDDEN {
            self.exhausted = true;
            return None;
        }
        Some((assignment, sum))
    }
}

/// Find the cheapest full mapping among completions of the fixed prefix.
///
/// `source_order` is the decision order over the pooled sources; the pooled
/// targets come from `possible`. Both graphs must already be padded to equal
/// size.
///
/// # Errors
///
/// Returns [`SchemaDiffError::Cancelled`](crate::SchemaDiffError::Cancelled)
/// when the token fires; partial progress is discarded.
pub(crate) fn find_minimum_mapping(
    source: &SchemaGraph,
    target: &SchemaGraph,
    possible: &PossibleMappings,
    source_order: &[VertexId],
    cancellation: &CancellationToken,
) -> Result<(usize, Mapping)> {
    let mut search = Search {
        source,
        target,
        possible,
        source_order,
        targets: possible.pooled_targets(),
        cancellation,
        queue: BinaryHeap::new(),
        best_cost: usize::MAX,
        best_mapping: None,
    };
    search.run()?;
    let best_mapping = search
        .best_mapping
        .unwrap_or_else(|| Mapping::new(possible.fixed().clone()));
    Ok((search.best_cost, best_mapping))
}

struct Search<'a> {
    source: &'a SchemaGraph,
    target: &'a SchemaGraph,
    possible: &'a PossibleMappings,
    source_order: &'a [VertexId],
    targets: &'a [VertexId],
    cancellation: &'a CancellationToken,
    queue: BinaryHeap<MappingEntry>,
    best_cost: usize,
    best_mapping: Option<Mapping>,
}

impl Search<'_> {
    fn run(&mut self) -> Result<()> {
        let root = Mapping::new(self.possible.fixed().clone());
        if self.source_order.is_empty() {
            self.best_cost = editorial_cost(&root, self.source, self.target);
            self.best_mapping = Some(root);
            return Ok(());
        }
        if let Some(entry) = self.expand(&root, 0)? {
            self.queue.push(entry);
        }
        while let Some(entry) = self.queue.pop() {
            self.cancellation.check()?;
            if entry.lower_bound >= self.best_cost_bound() {
                // The queue is ordered by bound; nothing cheaper is left.
                break;
            }
            if let Some(sibling) = self.next_sibling(&entry) {
                self.queue.push(sibling);
            }
            if entry.level < self.source_order.len() {
                if let Some(child) = self.expand(&entry.mapping, entry.level)? {
                    self.queue.push(child);
                }
            }
        }
        tracing::debug!(ged = self.best_cost, "mapping search finished");
        Ok(())
    }

    fn best_cost_bound(&self) -> i64 {
        i64::try_from(self.best_cost).unwrap_or(i64::MAX)
    }

    /// Expand one node: score all open pairs, solve the assignment problem,
    /// probe the resulting full mapping and emit the child deciding the next
    /// source vertex. Returns `None` when every completion runs through a
    /// forbidden pair, which kills the subtree.
    fn expand(&mut self, parent: &Mapping, level: usize) -> Result<Option<MappingEntry>> {
        let rows: Vec<VertexId> = self.source_order[level..].to_vec();
        let cols: Vec<VertexId> = self
            .targets
            .iter()
            .copied()
            .filter(|t| !parent.contains_target(*t))
            .collect();
        debug_assert_eq!(rows.len(), cols.len());

        let mut scoring = Vec::with_capacity(rows.len());
        for &v in &rows {
            self.cancellation.check()?;
            let row: Vec<i64> = cols
                .iter()
                .map(|&u| lower_bound_pair_cost(self.source, self.target, v, u, parent, self.possible))
                .collect();
            scoring.push(row);
        }

        let mut solver = HungarianAlgorithm::new(&scoring);
        let assignment = solver.execute();
        let sum: i64 = assignment
            .iter()
            .enumerate()
            .map(|(i, &j)| scoring[i][j])
            .sum();
        if sum >= FORBIDDEN {
            return Ok(None);
        }

        let base_cost = editorial_cost(parent, self.source, self.target) as i64;
        let generator = Rc::new(RefCell::new(SiblingGenerator {
            solver,
            scoring,
            parent: parent.clone(),
            rows,
            cols,
            base_cost,
            exhausted: false,
        }));
        let entry = {
            let shared = generator.borrow();
            self.probe(&shared, &assignment);
            MappingEntry {
                mapping: shared.parent.extend(shared.rows[0], shared.cols[assignment[0]]),
                level: level + 1,
                lower_bound: shared.base_cost + sum,
                siblings: Rc::clone(&generator),
            }
        };
        Ok(Some(entry))
    }

    /// Pull one more alternative from the node's generator, if any is left.
    fn next_sibling(&mut self, entry: &MappingEntry) -> Option<MappingEntry> {
        let (assignment, sum) = entry.siblings.borrow_mut().next_valid()?;
        let generator = entry.siblings.borrow();
        let sibling = MappingEntry {
            // Same parent, different target for this level's vertex.
            mapping: entry
                .mapping
                .copy_with_last_removed()
                .extend(generator.rows[0], generator.cols[assignment[0]]),
            level: entry.level,
            lower_bound: generator.base_cost + sum,
            siblings: Rc::clone(&entry.siblings),
        };
        self.probe(&generator, &assignment);
        drop(generator);
        Some(sibling)
    }

    /// Complete the parent by the whole assignment and test it against the
    /// incumbent.
    fn probe(&mut self, generator: &SiblingGenerator, assignment: &[usize]) {
        let mut full = generator.parent.clone();
        for (i, &j) in assignment.iter().enumerate() {
            full = full.extend(generator.rows[i], generator.cols[j]);
        }
        let cost = editorial_cost(&full, self.source, self.target);
        if cost < self.best_cost {
            tracing::debug!(cost, previous = self.best_cost, "incumbent improved");
            self.best_cost = cost;
            self.best_mapping = Some(full);
        }
    }
}
