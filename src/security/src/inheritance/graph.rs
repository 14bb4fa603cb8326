//! Inheritance graph storage and transitive closure

use crate::types::{Principal, PrincipalInheritance};
use std::collections::{BTreeMap, HashSet};

/// Multi-valued `child -> [parent]` map
///
/// Duplicate edges are stored as given, mirroring the rule store.
#[derive(Debug, Clone, Default)]
pub struct InheritanceGraph {
    parents: BTreeMap<Principal, Vec<Principal>>,
}

impl InheritanceGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `child -> parent` edge
    pub fn add_edge(&mut self, child: Principal, parent: Principal) {
        self.parents.entry(child).or_default().push(parent);
    }

    /// Remove every edge matching `child -> parent`, returning how many were dropped
    pub fn remove_edge(&mut self, child: &Principal, parent: &Principal) -> usize {
        let Some(parents) = self.parents.get_mut(child) else {
            return 0;
        };

        let before = parents.len();
        parents.retain(|p| p != parent);
        let removed = before - parents.len();

        if parents.is_empty() {
            self.parents.remove(child);
        }

        removed
    }

    /// Direct parents of a principal
    pub fn parents_of(&self, child: &Principal) -> &[Principal] {
        self.parents.get(child).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All principals reachable from `principal` by following parent edges
    ///
    /// A node is recorded before its own parents are explored and never
    /// explored twice, so cyclic graphs terminate. The starting principal is
    /// only part of the result if a cycle leads back to it.
    pub fn expand_closure(&self, principal: &Principal) -> HashSet<Principal> {
        let mut closure = HashSet::new();
        let mut pending: Vec<&Principal> = self.parents_of(principal).iter().collect();

        while let Some(next) = pending.pop() {
            if closure.insert(next.clone()) {
                pending.extend(self.parents_of(next));
            }
        }

        closure
    }

    /// Visit every edge in child order
    pub fn for_all(&self, mut f: impl FnMut(&PrincipalInheritance)) {
        for (child, parents) in &self.parents {
            for parent in parents {
                f(&PrincipalInheritance::new(child.clone(), parent.clone()));
            }
        }
    }

    /// Total number of stored edges
    pub fn len(&self) -> usize {
        self.parents.values().map(Vec::len).sum()
    }

    /// Whether the graph holds no edges
    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Drop every edge
    pub fn clear(&mut self) {
        self.parents.clear();
    }
}
