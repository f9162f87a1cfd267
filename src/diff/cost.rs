//! Edit cost evaluation.
//!
//! Two related measures live here. The editorial cost is the exact cost of a
//! full mapping: one per relabeled/inserted/deleted vertex, one per edge that
//! must be inserted, deleted or relabeled. The lower-bound pair cost is an
//! optimistic per-pair estimate used inside the search: it never exceeds the
//! cost the pair can contribute to any completion, which is what lets the
//! search discard subtrees by bound without losing the optimum.

use super::mapping::Mapping;
use super::possible_mappings::PossibleMappings;
use super::result::EditOperation;
use crate::model::{EdgeId, SchemaGraph, VertexId};
use std::collections::{HashMap, HashSet};

/// Sentinel cost for pairs the search must never take. Large enough that any
/// assignment containing one is worse than every real assignment, small
/// enough that summing a full row of them cannot overflow `i64`.
pub(crate) const FORBIDDEN: i64 = 1 << 40;

/// Exact cost of a mapping. Edges are charged only when both endpoints are
/// mapped, so on a partial mapping this is the cost of the decided prefix.
pub(crate) fn editorial_cost(
    mapping: &Mapping,
    source: &SchemaGraph,
    target: &SchemaGraph,
) -> usize {
    evaluate(mapping, source, target, None)
}

/// Exact cost plus the edit script realizing it.
pub(crate) fn editorial_cost_with_operations(
    mapping: &Mapping,
    source: &SchemaGraph,
    target: &SchemaGraph,
) -> (usize, Vec<EditOperation>) {
    let mut operations = Vec::new();
    let cost = evaluate(mapping, source, target, Some(&mut operations));
    (cost, operations)
}

fn evaluate(
    mapping: &Mapping,
    source: &SchemaGraph,
    target: &SchemaGraph,
    mut operations: Option<&mut Vec<EditOperation>>,
) -> usize {
    let mut cost = 0;

    for (v, u) in mapping.pairs() {
        let sv = source.vertex(v);
        let tu = target.vertex(u);
        if sv.same_label(tu) {
            continue;
        }
        cost += 1;
        if let Some(ops) = operations.as_mut() {
            let op = if sv.is_isolated() {
                EditOperation::InsertVertex { target: tu.clone() }
            } else if tu.is_isolated() {
                EditOperation::DeleteVertex { source: sv.clone() }
            } else {
                EditOperation::ChangeVertex {
                    source: sv.clone(),
                    target: tu.clone(),
                }
            };
            ops.push(op);
        }
    }

    // Source edges whose endpoints are both mapped: deleted or relabeled
    // unless the target has the same edge under the mapping.
    for edge in source.edges() {
        let (Some(from), Some(to)) = (mapping.target(edge.from), mapping.target(edge.to)) else {
            continue;
        };
        match target.edge_between(from, to) {
            Some(counterpart) if counterpart.label == edge.label => {}
            Some(counterpart) => {
                cost += 1;
                if let Some(ops) = operations.as_mut() {
                    ops.push(EditOperation::ChangeEdge {
                        from: source.qualified_name(edge.from),
                        to: source.qualified_name(edge.to),
                        source_label: edge.label.clone(),
                        target_label: counterpart.label.clone(),
                    });
                }
            }
            None => {
                cost += 1;
                if let Some(ops) = operations.as_mut() {
                    ops.push(EditOperation::DeleteEdge {
                        from: source.qualified_name(edge.from),
                        to: source.qualified_name(edge.to),
                        label: edge.label.clone(),
                    });
                }
            }
        }
    }

    // Target edges with no source counterpart at all: insertions.
    for edge in target.edges() {
        let (Some(from), Some(to)) = (mapping.source(edge.from), mapping.source(edge.to)) else {
            continue;
        };
        if source.edge_between(from, to).is_none() {
            cost += 1;
            if let Some(ops) = operations.as_mut() {
                ops.push(EditOperation::InsertEdge {
                    from: target.qualified_name(edge.from),
                    to: target.qualified_name(edge.to),
                    label: edge.label.clone(),
                });
            }
        }
    }

    cost
}

/// Optimistic cost of mapping `v` onto `u` given the decided prefix.
///
/// Edges whose far endpoint is already mapped (anchored) are checked exactly;
/// edges into still-open territory are compared as label multisets, which
/// cannot overestimate the true edge cost. Pairs ruled out by the candidate
/// pruning or by a contradicting parent assignment get [`FORBIDDEN`].
pub(crate) fn lower_bound_pair_cost(
    source: &SchemaGraph,
    target: &SchemaGraph,
    v: VertexId,
    u: VertexId,
    partial: &Mapping,
    possible: &PossibleMappings,
) -> i64 {
    if !possible.mapping_possible(v, u) {
        return FORBIDDEN;
    }
    let sv = source.vertex(v);
    let tu = target.vertex(u);

    if !sv.is_isolated() && !tu.is_isolated() && sv.kind.is_contained() {
        let pv = source.parent(v);
        let pu = target.parent(u);
        if let Some(pv) = pv {
            if let Some(mapped) = partial.target(pv) {
                if Some(mapped) != pu {
                    return FORBIDDEN;
                }
            }
        }
        if let Some(pu) = pu {
            if let Some(mapped) = partial.source(pu) {
                if Some(mapped) != pv {
                    return FORBIDDEN;
                }
            }
        }
    }

    if sv.is_isolated() {
        // Inserting u: the vertex, all its outgoing edges, and its incoming
        // edges from vertices whose counterpart is already decided.
        let mut cost = 1 + target.adjacent_edges(u).len() as i64;
        for &e in target.inverse_adjacent_edges(u) {
            if partial.source(target.edge(e).from).is_some() {
                cost += 1;
            }
        }
        return cost;
    }
    if tu.is_isolated() {
        let mut cost = 1 + source.adjacent_edges(v).len() as i64;
        for &e in source.inverse_adjacent_edges(v) {
            if partial.target(source.edge(e).from).is_some() {
                cost += 1;
            }
        }
        return cost;
    }

    let mut cost = i64::from(!sv.same_label(tu));
    let mut matched: HashSet<EdgeId> = HashSet::new();
    let mut inner_source: HashMap<&str, usize> = HashMap::new();
    let mut inner_target: HashMap<&str, usize> = HashMap::new();

    // Outgoing edges of v: anchored heads are resolved exactly against u's
    // edges, open heads feed the label multiset.
    for &eid in source.adjacent_edges(v) {
        let edge = source.edge(eid);
        let Some(head) = partial.target(edge.to) else {
            *inner_source.entry(edge.label.as_str()).or_insert(0) += 1;
            continue;
        };
        let counterpart = target
            .adjacent_edges(u)
            .iter()
            .copied()
            .find(|te| !matched.contains(te) && target.edge(*te).to == head);
        match counterpart {
            Some(te) => {
                matched.insert(te);
                if target.edge(te).label != edge.label {
                    cost += 1;
                }
            }
            None => cost += 1,
        }
    }
    // Anchored incoming edges of v. Open incoming edges are someone else's
    // outgoing edges and counted there.
    for &eid in source.inverse_adjacent_edges(v) {
        let edge = source.edge(eid);
        let Some(tail) = partial.target(edge.from) else {
            continue;
        };
        let counterpart = target
            .inverse_adjacent_edges(u)
            .iter()
            .copied()
            .find(|te| !matched.contains(te) && target.edge(*te).from == tail);
        match counterpart {
            Some(te) => {
                matched.insert(te);
                if target.edge(te).label != edge.label {
                    cost += 1;
                }
            }
            None => cost += 1,
        }
    }
    // Leftover edges of u: anchored ones must be inserted, open outgoing
    // ones feed the multiset.
    for &te in target.adjacent_edges(u) {
        if matched.contains(&te) {
            continue;
        }
        let edge = target.edge(te);
        if partial.source(edge.to).is_some() {
            cost += 1;
        } else {
            *inner_target.entry(edge.label.as_str()).or_insert(0) += 1;
        }
    }
    for &te in target.inverse_adjacent_edges(u) {
        if matched.contains(&te) {
            continue;
        }
        if partial.source(target.edge(te).from).is_some() {
            cost += 1;
        }
    }

    cost + multiset_distance(&inner_source, &inner_target)
}

/// `max(|A|, |B|) - |A ∩ B|` over label multisets: the fewest edge edits any
/// completion can need for the open edges.
fn multiset_distance(a: &HashMap<&str, usize>, b: &HashMap<&str, usize>) -> i64 {
    let total_a: usize = a.values().sum();
    let total_b: usize = b.values().sum();
    let overlap: usize = a
        .iter()
        .map(|(label, count)| count.min(b.get(label).unwrap_or(&0)))
        .sum();
    (total_a.max(total_b) - overlap) as i64
}
