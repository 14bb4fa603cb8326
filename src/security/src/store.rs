//! Access control entry storage
//!
//! Rules are keyed by the case-folded object name. The store is a multiset:
//! adding the same triple twice keeps two entries.

use crate::types::{fold_key, AccessControlEntry, AccessType, Object, Principal};
use std::collections::BTreeMap;

/// Rules indexed by exact object name
#[derive(Debug, Clone, Default)]
pub struct AceStore {
    entries: BTreeMap<String, Vec<AccessControlEntry>>,
}

impl AceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one entry keyed by `object`
    pub fn add(&mut self, principal: Principal, object: Object, access_type: AccessType) {
        self.entries
            .entry(fold_key(object.as_str()))
            .or_default()
            .push(AccessControlEntry::new(principal, object, access_type));
    }

    /// Remove every entry matching the triple, returning how many were dropped
    pub fn remove(&mut self, principal: &Principal, object: &Object, access_type: AccessType) -> usize {
        let key = fold_key(object.as_str());
        let Some(bucket) = self.entries.get_mut(&key) else {
            return 0;
        };

        let before = bucket.len();
        bucket.retain(|ace| !(ace.principal == *principal && ace.access_type == access_type));
        let removed = before - bucket.len();

        if bucket.is_empty() {
            self.entries.remove(&key);
        }

        removed
    }

    /// Entries keyed by exactly this object name, without hierarchy expansion
    pub fn lookup_exact(&self, object: &str) -> &[AccessControlEntry] {
        self.entries
            .get(&fold_key(object))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Visit every stored entry in object order
    pub fn for_all(&self, mut f: impl FnMut(&AccessControlEntry)) {
        for ace in self.entries.values().flatten() {
            f(ace);
        }
    }

    /// Total number of stored entries, duplicates included
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
