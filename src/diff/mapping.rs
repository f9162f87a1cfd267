//! Vertex mappings between the two schema graphs.
//!
//! A mapping is an injective pairing of source vertices to target vertices.
//! It is split in two layers: a fixed prefix shared by every node of the
//! search tree (pairs decided before the search starts) and a per-node
//! extensible suffix. The prefix lives behind an [`Arc`] so extending a
//! mapping copies only the suffix.

use crate::model::VertexId;
use std::collections::HashMap;
use std::sync::Arc;

/// The immutable pairs every search-tree node agrees on.
#[derive(Debug, Default)]
pub struct FixedMapping {
    sources: Vec<VertexId>,
    targets: Vec<VertexId>,
    source_to_target: HashMap<VertexId, VertexId>,
    target_to_source: HashMap<VertexId, VertexId>,
}

impl FixedMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pair(&mut self, source: VertexId, target: VertexId) {
        debug_assert!(!self.source_to_target.contains_key(&source));
        debug_assert!(!self.target_to_source.contains_key(&target));
        self.sources.push(source);
        self.targets.push(target);
        self.source_to_target.insert(source, target);
        self.target_to_source.insert(target, source);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn target(&self, source: VertexId) -> Option<VertexId> {
        self.source_to_target.get(&source).copied()
    }

    #[must_use]
    pub fn source(&self, target: VertexId) -> Option<VertexId> {
        self.target_to_source.get(&target).copied()
    }
}

/// A partial (or full) vertex mapping: the shared fixed prefix plus this
/// search branch's own suffix.
#[derive(Debug, Clone)]
pub struct Mapping {
    fixed: Arc<FixedMapping>,
    ext_sources: Vec<VertexId>,
    ext_targets: Vec<VertexId>,
    ext_source_to_target: HashMap<VertexId, VertexId>,
    ext_target_to_source: HashMap<VertexId, VertexId>,
}

impl Mapping {
    #[must_use]
    pub fn new(fixed: Arc<FixedMapping>) -> Self {
        Self {
            fixed,
            ext_sources: Vec::new(),
            ext_targets: Vec::new(),
            ext_source_to_target: HashMap::new(),
            ext_target_to_source: HashMap::new(),
        }
    }

    /// Total number of pairs, fixed prefix included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fixed.len() + self.ext_sources.len()
    }

    /// New mapping with one more pair appended to the suffix. The fixed
    /// prefix is shared, not copied.
    #[must_use]
    pub fn extend(&self, source: VertexId, target: VertexId) -> Self {
        debug_assert!(!self.contains_source(source));
        debug_assert!(!self.contains_target(target));
        let mut next = self.clone();
        next.ext_sources.push(source);
        next.ext_targets.push(target);
        next.ext_source_to_target.insert(source, target);
        next.ext_target_to_source.insert(target, source);
        next
    }

    /// New mapping with the most recent suffix pair dropped. The suffix must
    /// be non-empty; the fixed prefix is never retractable.
    #[must_use]
    pub fn copy_with_last_removed(&self) -> Self {
        debug_assert!(!self.ext_sources.is_empty());
        let mut next = self.clone();
        if let (Some(source), Some(target)) = (next.ext_sources.pop(), next.ext_targets.pop()) {
            next.ext_source_to_target.remove(&source);
            next.ext_target_to_source.remove(&target);
        }
        next
    }

    #[must_use]
    pub fn target(&self, source: VertexId) -> Option<VertexId> {
        self.fixed
            .target(source)
            .or_else(|| self.ext_source_to_target.get(&source).copied())
    }

    #[must_use]
    pub fn source(&self, target: VertexId) -> Option<VertexId> {
        self.fixed
            .source(target)
            .or_else(|| self.ext_target_to_source.get(&target).copied())
    }

    #[must_use]
    pub fn contains_source(&self, source: VertexId) -> bool {
        self.target(source).is_some()
    }

    #[must_use]
    pub fn contains_target(&self, target: VertexId) -> bool {
        self.source(target).is_some()
    }

    /// All pairs in decision order: fixed prefix first, then the suffix.
    pub fn pairs(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.fixed
            .sources
            .iter()
            .zip(self.fixed.targets.iter())
            .chain(self.ext_sources.iter().zip(self.ext_targets.iter()))
            .map(|(s, t)| (*s, *t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: u32) -> VertexId {
        VertexId(i)
    }

    #[test]
    fn test_extend_does_not_mutate_parent() {
        let mut fixed = FixedMapping::new();
        fixed.add_pair(v(0), v(10));
        let base = Mapping::new(Arc::new(fixed));
        let child = base.extend(v(1), v(11));
        assert_eq!(base.len(), 1);
        assert_eq!(child.len(), 2);
        assert!(!base.contains_source(v(1)));
        assert_eq!(child.target(v(1)), Some(v(11)));
    }

    #[test]
    fn test_lookup_covers_both_layers() {
        let mut fixed = FixedMapping::new();
        fixed.add_pair(v(0), v(10));
        let mapping = Mapping::new(Arc::new(fixed)).extend(v(1), v(11));
        assert_eq!(mapping.target(v(0)), Some(v(10)));
        assert_eq!(mapping.source(v(11)), Some(v(1)));
        assert_eq!(mapping.target(v(2)), None);
        assert!(mapping.contains_target(v(10)));
    }

    #[test]
    fn test_copy_with_last_removed_retracts_only_the_suffix() {
        let mut fixed = FixedMapping::new();
        fixed.add_pair(v(0), v(10));
        let mapping = Mapping::new(Arc::new(fixed))
            .extend(v(1), v(11))
            .extend(v(2), v(12));
        let retracted = mapping.copy_with_last_removed();
        assert_eq!(retracted.len(), 2);
        assert!(!retracted.contains_source(v(2)));
        assert!(!retracted.contains_target(v(12)));
        assert_eq!(retracted.target(v(0)), Some(v(10)));
        assert_eq!(mapping.len(), 3);
    }

    #[test]
    fn test_pairs_preserve_decision_order() {
        let mut fixed = FixedMapping::new();
        fixed.add_pair(v(0), v(10));
        fixed.add_pair(v(1), v(11));
        let mapping = Mapping::new(Arc::new(fixed))
            .extend(v(2), v(12))
            .extend(v(3), v(13));
        let pairs: Vec<_> = mapping.pairs().collect();
        assert_eq!(
            pairs,
            vec![(v(0), v(10)), (v(1), v(11)), (v(2), v(12)), (v(3), v(13))]
        );
    }
}
