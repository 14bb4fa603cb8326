//! Security context
//!
//! A [`Context`] owns one rule store and one inheritance graph behind a
//! single reader/writer lock. Privilege checks and enumerations take the
//! shared side of the lock; every mutation takes the exclusive side.
//!
//! # Resolution
//!
//! ```text
//! principal ──► {principal, builtin.everyone} ∪ closure(principal)
//!                                  │
//! object a.b.c ──► [a.b.c, a.b, a] ├──► any matching Deny  ⇒ false
//!                                  └──► any matching Allow ⇒ true, else false
//! ```

pub mod registry;

pub use registry::{create_context, current_context, ContextRegistry, BOOTSTRAP_OBJECT, CONSOLE_PRINCIPAL};

use crate::error::{Result, SecurityError};
use crate::inheritance::InheritanceGraph;
use crate::scope;
use crate::store::AceStore;
use crate::types::{
    AccessControlEntry, AccessType, Object, Principal, PrincipalInheritance,
};

use parking_lot::RwLock;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug, Default)]
struct ContextState {
    aces: AceStore,
    inheritance: InheritanceGraph,
}

impl ContextState {
    fn effective_principals(&self, principal: &Principal) -> HashSet<Principal> {
        let mut principals = self.inheritance.expand_closure(principal);
        principals.insert(principal.clone());
        principals.insert(Principal::everyone());
        principals
    }

    fn evaluate(&self, principal: &Principal, object: &Object) -> bool {
        let principals = self.effective_principals(principal);
        let mut allowed = false;

        for level in object.ancestors() {
            for ace in self.aces.lookup_exact(level) {
                if !principals.contains(&ace.principal) {
                    continue;
                }

                match ace.access_type {
                    AccessType::Deny => {
                        trace!(%principal, %object, matched = %ace, "privilege denied");
                        return false;
                    }
                    AccessType::Allow => allowed = true,
                    AccessType::Unset => {}
                }
            }
        }

        trace!(%principal, %object, allowed, "privilege evaluated");
        allowed
    }
}

/// Reference-counted access-control context
///
/// Cloning is cheap and yields another handle to the same rules.
#[derive(Clone, Default)]
pub struct Context {
    state: Arc<RwLock<ContextState>>,
}

impl Context {
    /// Create a fresh, empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether both handles refer to the same context
    pub fn ptr_eq(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    /// Drop every rule and inheritance edge
    pub fn reset(&self) {
        let mut state = self.state.write();
        state.aces.clear();
        state.inheritance.clear();
        debug!("security context reset");
    }

    /// Add one rule; identical rules may be added more than once
    pub fn add_access_control_entry(
        &self,
        principal: impl Into<Principal>,
        object: impl Into<Object>,
        access_type: AccessType,
    ) {
        let (principal, object) = (principal.into(), object.into());
        debug!(%principal, %object, %access_type, "adding access control entry");
        self.state.write().aces.add(principal, object, access_type);
    }

    /// Remove every rule matching the triple; absent rules are ignored
    pub fn remove_access_control_entry(
        &self,
        principal: impl Into<Principal>,
        object: impl Into<Object>,
        access_type: AccessType,
    ) {
        let (principal, object) = (principal.into(), object.into());
        let removed = self
            .state
            .write()
            .aces
            .remove(&principal, &object, access_type);
        debug!(%principal, %object, %access_type, removed, "removed access control entry");
    }

    /// Make `child` inherit every rule granted to `parent`
    pub fn add_principal_inheritance(&self, child: impl Into<Principal>, parent: impl Into<Principal>) {
        let (child, parent) = (child.into(), parent.into());
        debug!(%child, %parent, "adding principal inheritance");
        self.state.write().inheritance.add_edge(child, parent);
    }

    /// Remove every matching `child -> parent` edge; absent edges are ignored
    pub fn remove_principal_inheritance(&self, child: impl Into<Principal>, parent: impl Into<Principal>) {
        let (child, parent) = (child.into(), parent.into());
        let removed = self.state.write().inheritance.remove_edge(&child, &parent);
        debug!(%child, %parent, removed, "removed principal inheritance");
    }

    /// Whether `principal` may act on `object`
    ///
    /// The principal, `builtin.everyone` and every inherited principal are
    /// matched against rules on the object and each of its ancestors. Any
    /// matching deny wins; otherwise a matching allow grants. No match means
    /// no access.
    pub fn check_principal_privilege(&self, principal: impl Into<Principal>, object: impl Into<Object>) -> bool {
        let (principal, object) = (principal.into(), object.into());
        self.state.read().evaluate(&principal, &object)
    }

    /// Whether anyone in the calling thread's scope may act on `object`
    ///
    /// With an empty scope only `builtin.everyone` is consulted. Otherwise
    /// each principal in the scope is checked on its own, most recent first,
    /// and the first grant wins. A deny for one principal does not veto the
    /// others.
    pub fn check_privilege(&self, object: impl Into<Object>) -> bool {
        let object = object.into();

        if scope::depth() == 0 {
            return self.state.read().evaluate(&Principal::everyone(), &object);
        }

        scope::any_principal(|principal| self.state.read().evaluate(principal, &object))
    }

    /// `{principal, builtin.everyone}` plus every inherited principal
    pub fn effective_principals(&self, principal: impl Into<Principal>) -> HashSet<Principal> {
        self.state.read().effective_principals(&principal.into())
    }

    /// Visit every rule while holding the shared lock
    ///
    /// The callback must not call back into this context: even a nested read
    /// can deadlock once a writer is waiting.
    pub fn for_all_access_control_entries(&self, f: impl FnMut(&AccessControlEntry)) {
        self.state.read().aces.for_all(f);
    }

    /// Visit every inheritance edge while holding the shared lock
    ///
    /// The callback must not call back into this context: even a nested read
    /// can deadlock once a writer is waiting.
    pub fn for_all_principal_inheritances(&self, f: impl FnMut(&PrincipalInheritance)) {
        self.state.read().inheritance.for_all(f);
    }

    /// Copy of every rule
    pub fn access_control_entries(&self) -> Vec<AccessControlEntry> {
        let mut entries = Vec::new();
        self.for_all_access_control_entries(|ace| entries.push(ace.clone()));
        entries
    }

    /// Copy of every inheritance edge
    pub fn principal_inheritances(&self) -> Vec<PrincipalInheritance> {
        let mut edges = Vec::new();
        self.for_all_principal_inheritances(|edge| edges.push(edge.clone()));
        edges
    }

    /// Number of stored rules, duplicates included
    pub fn rules_len(&self) -> usize {
        self.state.read().aces.len()
    }

    /// Number of stored inheritance edges
    pub fn inheritances_len(&self) -> usize {
        self.state.read().inheritance.len()
    }

    /// Install this context as the calling thread's current context
    pub fn make_current(&self) {
        ContextRegistry::set_current(self.clone());
    }

    /// Replace the rules from a replicated snapshot
    ///
    /// Reserved for replication; no snapshot format is defined.
    pub fn load_snapshot(&self, _snapshot: &[u8]) -> Result<()> {
        Err(SecurityError::SnapshotUnsupported)
    }

    /// Serialize the rules for replication
    ///
    /// Reserved for replication; no snapshot format is defined.
    pub fn save_snapshot(&self) -> Result<Vec<u8>> {
        Err(SecurityError::SnapshotUnsupported)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Context")
            .field("rules", &state.aces.len())
            .field("inheritances", &state.inheritance.len())
            .finish()
    }
}
