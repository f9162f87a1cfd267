//! Candidate-pair pruning for the edit distance search.
//!
//! Mapping a field to an unrelated enum value is never optimal, so before the
//! search starts both vertex sets are partitioned by kind and hierarchical
//! naming context. Vertices whose context matches exactly on both sides pair
//! off; vertices whose context diverges pool with the other side's leftovers
//! at the level of divergence. Groups that come out one-to-one (after padding
//! with synthetic isolated vertices) become fixed pairs the search never
//! revisits; larger groups contribute the candidate pairs the search explores.
//!
//! Padding keeps both graphs the same size, which in turn guarantees every
//! full assignment over the pooled vertices is a complete mapping.

use super::mapping::FixedMapping;
use crate::model::{SchemaGraph, Vertex, VertexId, VertexKind};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Kinds in deterministic processing order. `Isolated` is absent: isolated
/// vertices are created by this pass and always paired on creation.
const KIND_ORDER: [VertexKind; 14] = [
    VertexKind::Object,
    VertexKind::Interface,
    VertexKind::Union,
    VertexKind::Scalar,
    VertexKind::Enum,
    VertexKind::InputObject,
    VertexKind::Directive,
    VertexKind::Field,
    VertexKind::Argument,
    VertexKind::InputField,
    VertexKind::EnumValue,
    VertexKind::AppliedDirective,
    VertexKind::AppliedArgument,
    VertexKind::DummyType,
];

/// The pruning result: fixed pairs plus the candidate pairs left open.
#[derive(Debug)]
pub struct PossibleMappings {
    fixed: Arc<FixedMapping>,
    possible: HashSet<(VertexId, VertexId)>,
    candidate_counts: HashMap<VertexId, usize>,
    pooled_sources: Vec<VertexId>,
    pooled_targets: Vec<VertexId>,
}

impl PossibleMappings {
    /// Whether `source -> target` is a candidate pair the search may try.
    /// Fixed pairs are not represented here; they are decided, not candidate.
    #[must_use]
    pub fn mapping_possible(&self, source: VertexId, target: VertexId) -> bool {
        self.possible.contains(&(source, target))
    }

    /// Number of legal targets for a pooled source vertex.
    #[must_use]
    pub fn candidate_count(&self, source: VertexId) -> usize {
        self.candidate_counts.get(&source).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn fixed(&self) -> &Arc<FixedMapping> {
        &self.fixed
    }

    /// Source vertices the search still has to place, in group order.
    #[must_use]
    pub fn pooled_sources(&self) -> &[VertexId] {
        &self.pooled_sources
    }

    /// Target vertices the search still has to place, in group order.
    #[must_use]
    pub fn pooled_targets(&self) -> &[VertexId] {
        &self.pooled_targets
    }

    /// True when the partition decided every pair up front and no search is
    /// needed.
    #[must_use]
    pub fn is_fully_fixed(&self) -> bool {
        self.pooled_sources.is_empty()
    }
}

/// Partition both graphs into mapping groups, padding with isolated vertices
/// so the graphs end up the same size.
pub fn compute_possible_mappings(
    source: &mut SchemaGraph,
    target: &mut SchemaGraph,
) -> PossibleMappings {
    let mut calc = Calculator {
        source,
        target,
        fixed: FixedMapping::new(),
        possible: HashSet::new(),
        candidate_counts: HashMap::new(),
        pooled_sources: Vec::new(),
        pooled_targets: Vec::new(),
    };

    for kind in KIND_ORDER {
        let source_members = calc.members_of_kind(true, kind);
        let target_members = calc.members_of_kind(false, kind);
        if source_members.is_empty() && target_members.is_empty() {
            continue;
        }
        let pooled = !matches!(
            kind,
            VertexKind::AppliedDirective | VertexKind::AppliedArgument
        );
        calc.split(source_members, target_members, 0, pooled);
    }

    debug_assert_eq!(calc.source.vertex_count(), calc.target.vertex_count());
    tracing::debug!(
        fixed = calc.fixed.len(),
        pooled_sources = calc.pooled_sources.len(),
        candidate_pairs = calc.possible.len(),
        "possible mappings computed"
    );

    PossibleMappings {
        fixed: Arc::new(calc.fixed),
        possible: calc.possible,
        candidate_counts: calc.candidate_counts,
        pooled_sources: calc.pooled_sources,
        pooled_targets: calc.pooled_targets,
    }
}

struct Calculator<'a> {
    source: &'a mut SchemaGraph,
    target: &'a mut SchemaGraph,
    fixed: FixedMapping,
    possible: HashSet<(VertexId, VertexId)>,
    candidate_counts: HashMap<VertexId, usize>,
    pooled_sources: Vec<VertexId>,
    pooled_targets: Vec<VertexId>,
}

impl Calculator<'_> {
    fn members_of_kind(&self, in_source: bool, kind: VertexKind) -> Vec<VertexId> {
        let graph = if in_source { &self.source } else { &self.target };
        graph
            .vertex_ids()
            .filter(|v| graph.vertex(*v).kind == kind)
            .collect()
    }

    /// Naming context of a vertex: its containment chain plus its own name.
    /// Dummy type vertices contribute no segment of their own; directive
    /// vertices are prefixed so they never collide with type names.
    fn context(graph: &SchemaGraph, v: VertexId) -> Vec<String> {
        let vertex = graph.vertex(v);
        let mut segments = match graph.parent(v) {
            Some(p) => Self::context(graph, p),
            None => Vec::new(),
        };
        match vertex.kind {
            VertexKind::DummyType => {}
            VertexKind::Directive | VertexKind::AppliedDirective => {
                segments.push(format!("@{}", vertex.name()));
            }
            _ => segments.push(vertex.name().to_string()),
        }
        segments
    }

    /// Recursive context partition. Keys present on both sides recurse one
    /// segment deeper; one-sided keys fall into this level's leftover pool,
    /// resolved as a single group.
    fn split(
        &mut self,
        sources: Vec<VertexId>,
        targets: Vec<VertexId>,
        depth: usize,
        pooled: bool,
    ) {
        let mut by_key_source: BTreeMap<Option<String>, Vec<VertexId>> = BTreeMap::new();
        for v in sources {
            let key = Self::context(self.source, v).get(depth).cloned();
            by_key_source.entry(key).or_default().push(v);
        }
        let mut by_key_target: BTreeMap<Option<String>, Vec<VertexId>> = BTreeMap::new();
        for v in targets {
            let key = Self::context(self.target, v).get(depth).cloned();
            by_key_target.entry(key).or_default().push(v);
        }

        let mut leftover_sources = Vec::new();
        let mut leftover_targets = Vec::new();
        let keys: Vec<Option<String>> = by_key_source
            .keys()
            .chain(by_key_target.keys())
            .cloned()
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        for key in keys {
            let in_source = by_key_source.remove(&key);
            let in_target = by_key_target.remove(&key);
            match (in_source, in_target) {
                (Some(s), Some(t)) => {
                    if key.is_none() {
                        // Context exhausted on both sides: terminal group.
                        self.resolve_group(s, t, pooled);
                    } else {
                        self.split(s, t, depth + 1, pooled);
                    }
                }
                (Some(s), None) => leftover_sources.extend(s),
                (None, Some(t)) => leftover_targets.extend(t),
                (None, None) => {}
            }
        }
        if !leftover_sources.is_empty() || !leftover_targets.is_empty() {
            self.resolve_group(leftover_sources, leftover_targets, pooled);
        }
    }

    /// Resolve one mapping group: pad, then either fix (one-to-one) or open
    /// the full cross product as candidate pairs.
    fn resolve_group(&mut self, sources: Vec<VertexId>, targets: Vec<VertexId>, pooled: bool) {
        let mut sources = sources;
        let mut targets = targets;

        if !pooled && (sources.len() != 1 || targets.len() != 1) {
            // Applied directives and their arguments are never matched
            // n-to-n: outside an exact one-to-one context match each one is
            // paired with its own isolated partner, an outright insert or
            // delete.
            for s in sources {
                let iso = self.target.add_vertex(Vertex::isolated());
                self.fixed.add_pair(s, iso);
            }
            for t in targets {
                let iso = self.source.add_vertex(Vertex::isolated());
                self.fixed.add_pair(iso, t);
            }
            return;
        }

        while sources.len() < targets.len() {
            sources.push(self.source.add_vertex(Vertex::isolated()));
        }
        while targets.len() < sources.len() {
            targets.push(self.target.add_vertex(Vertex::isolated()));
        }

        if sources.len() == 1 {
            self.fixed.add_pair(sources[0], targets[0]);
            return;
        }

        for &s in &sources {
            self.candidate_counts.insert(s, targets.len());
            for &t in &targets {
                self.possible.insert((s, t));
            }
        }
        self.pooled_sources.extend(sources);
        self.pooled_targets.extend(targets);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        build_schema_graph, AppliedDirective, FieldDefinition, ObjectType, Schema, TypeDefinition,
        TypeRef,
    };

    fn graphs(source: &Schema, target: &Schema) -> (SchemaGraph, SchemaGraph) {
        (
            build_schema_graph(source).unwrap(),
            build_schema_graph(target).unwrap(),
        )
    }

    fn field_id(graph: &SchemaGraph, type_name: &str, field_name: &str) -> VertexId {
        let container = graph.vertex_named(type_name).unwrap();
        graph
            .adjacent_edges(container)
            .iter()
            .map(|e| graph.edge(*e).to)
            .find(|v| {
                graph.vertex(*v).kind == VertexKind::Field && graph.vertex(*v).name() == field_name
            })
            .unwrap()
    }

    #[test]
    fn test_identical_schemas_fully_fixed() {
        let schema = Schema::new().with_type(TypeDefinition::Object(
            ObjectType::new("Query")
                .with_field(FieldDefinition::new("user", TypeRef::new("String"))),
        ));
        let (mut s, mut t) = graphs(&schema, &schema);
        let possible = compute_possible_mappings(&mut s, &mut t);
        assert!(possible.is_fully_fixed());
        assert_eq!(possible.fixed().len(), s.vertex_count());
        assert_eq!(s.vertex_count(), t.vertex_count());
    }

    #[test]
    fn test_one_sided_field_pairs_with_isolated() {
        let source = Schema::new().with_type(TypeDefinition::Object(ObjectType::new("Query")));
        let target = Schema::new().with_type(TypeDefinition::Object(
            ObjectType::new("Query")
                .with_field(FieldDefinition::new("user", TypeRef::new("String"))),
        ));
        let (mut s, mut t) = graphs(&source, &target);
        let possible = compute_possible_mappings(&mut s, &mut t);
        assert!(possible.is_fully_fixed());
        let user = field_id(&t, "Query", "user");
        let partner = possible.fixed().source(user).unwrap();
        assert!(s.vertex(partner).is_isolated());
    }

    #[test]
    fn test_same_container_leftovers_pool_together() {
        let source = Schema::new().with_type(TypeDefinition::Object(
            ObjectType::new("Query")
                .with_field(FieldDefinition::new("a", TypeRef::new("String")))
                .with_field(FieldDefinition::new("b", TypeRef::new("String"))),
        ));
        let target = Schema::new().with_type(TypeDefinition::Object(
            ObjectType::new("Query")
                .with_field(FieldDefinition::new("a", TypeRef::new("String")))
                .with_field(FieldDefinition::new("c", TypeRef::new("String"))),
        ));
        let (mut s, mut t) = graphs(&source, &target);
        let possible = compute_possible_mappings(&mut s, &mut t);
        let b = field_id(&s, "Query", "b");
        let c = field_id(&t, "Query", "c");
        // a pairs with a through its context; b and c fall into the same
        // leftover group, which is one-to-one and therefore fixed as a
        // rename candidate rather than a delete/insert pair.
        let a_s = field_id(&s, "Query", "a");
        assert!(possible.fixed().target(a_s).is_some());
        assert_eq!(possible.fixed().target(b), Some(c));
    }

    #[test]
    fn test_renamed_container_fields_stay_mappable() {
        let source = Schema::new().with_type(TypeDefinition::Object(
            ObjectType::new("User").with_field(FieldDefinition::new("id", TypeRef::new("ID"))),
        ));
        let target = Schema::new().with_type(TypeDefinition::Object(
            ObjectType::new("Person").with_field(FieldDefinition::new("id", TypeRef::new("ID"))),
        ));
        let (mut s, mut t) = graphs(&source, &target);
        let possible = compute_possible_mappings(&mut s, &mut t);
        let id_s = field_id(&s, "User", "id");
        let id_t = field_id(&t, "Person", "id");
        // The containers diverge at depth zero, so the fields become
        // leftovers rather than delete/insert pairs; the one-to-one leftover
        // group is decided up front.
        assert_eq!(possible.fixed().target(id_s), Some(id_t));
    }

    #[test]
    fn test_multiple_renamed_fields_pool() {
        let source = Schema::new().with_type(TypeDefinition::Object(
            ObjectType::new("Query")
                .with_field(FieldDefinition::new("a", TypeRef::new("String")))
                .with_field(FieldDefinition::new("b", TypeRef::new("String")))
                .with_field(FieldDefinition::new("shared", TypeRef::new("Int"))),
        ));
        let target = Schema::new().with_type(TypeDefinition::Object(
            ObjectType::new("Query")
                .with_field(FieldDefinition::new("c", TypeRef::new("String")))
                .with_field(FieldDefinition::new("d", TypeRef::new("String")))
                .with_field(FieldDefinition::new("shared", TypeRef::new("Int"))),
        ));
        let (mut s, mut t) = graphs(&source, &target);
        let possible = compute_possible_mappings(&mut s, &mut t);
        assert!(!possible.is_fully_fixed());
        let a = field_id(&s, "Query", "a");
        let c = field_id(&t, "Query", "c");
        let d = field_id(&t, "Query", "d");
        assert!(possible.mapping_possible(a, c));
        assert!(possible.mapping_possible(a, d));
        assert_eq!(possible.candidate_count(a), 2);
        let shared = field_id(&s, "Query", "shared");
        assert!(possible.fixed().target(shared).is_some());
    }

    #[test]
    fn test_applied_directives_never_pool() {
        let source = Schema::new().with_type(TypeDefinition::Object(
            ObjectType::new("Query")
                .with_applied_directive(AppliedDirective::new("cacheControl"))
                .with_applied_directive(AppliedDirective::new("cacheControl")),
        ));
        let target = Schema::new().with_type(TypeDefinition::Object(
            ObjectType::new("Query").with_applied_directive(AppliedDirective::new("cacheControl")),
        ));
        let (mut s, mut t) = graphs(&source, &target);
        let possible = compute_possible_mappings(&mut s, &mut t);
        // Two against one: all three applied directives get isolated
        // partners instead of a pooled group.
        assert!(possible.is_fully_fixed());
        let applied: Vec<VertexId> = s
            .vertex_ids()
            .filter(|v| s.vertex(*v).kind == VertexKind::AppliedDirective)
            .collect();
        assert_eq!(applied.len(), 2);
        for a in applied {
            let partner = possible.fixed().target(a).unwrap();
            assert!(t.vertex(partner).is_isolated());
        }
    }

    #[test]
    fn test_padding_keeps_graphs_balanced() {
        let source = Schema::new().with_type(TypeDefinition::Object(
            ObjectType::new("Query")
                .with_field(FieldDefinition::new("a", TypeRef::new("String")))
                .with_field(FieldDefinition::new("b", TypeRef::new("String")))
                .with_field(FieldDefinition::new("c", TypeRef::new("String"))),
        ));
        let target = Schema::new().with_type(TypeDefinition::Object(ObjectType::new("Query")));
        let (mut s, mut t) = graphs(&source, &target);
        let possible = compute_possible_mappings(&mut s, &mut t);
        assert_eq!(s.vertex_count(), t.vertex_count());
        assert_eq!(possible.pooled_sources().len(), possible.pooled_targets().len());
    }
}
