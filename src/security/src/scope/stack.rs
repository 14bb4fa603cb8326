/// Per-thread scope stack and its RAII guards
///
/// Both the live stack and the stack of reset snapshots are thread-local,
/// so ambient privilege never crosses a thread boundary.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::trace;

use super::types::{PrincipalSource, ScopeEntry};
use crate::types::Principal;

thread_local! {
    // top of the stack is the last element
    static SCOPE: RefCell<Vec<ScopeEntry>> = const { RefCell::new(Vec::new()) };

    static RESETS: RefCell<Vec<Vec<ScopeEntry>>> = const { RefCell::new(Vec::new()) };
}

/// Push an entry, returning the depth it was pushed at
pub(crate) fn push(entry: ScopeEntry) -> usize {
    SCOPE.with(|scope| {
        let mut scope = scope.borrow_mut();
        scope.push(entry);
        scope.len() - 1
    })
}

/// Pop the top entry
///
/// # Panics
///
/// Panics if the stack is empty: a push/pop imbalance means a broken scope
/// in the calling code.
pub(crate) fn pop() -> ScopeEntry {
    SCOPE.with(|scope| {
        scope
            .borrow_mut()
            .pop()
            .unwrap_or_else(|| panic!("principal scope popped while empty"))
    })
}

/// Save the whole live stack and clear it
pub(crate) fn push_reset() {
    let saved = SCOPE.with(|scope| std::mem::take(&mut *scope.borrow_mut()));
    trace!(saved = saved.len(), "principal scope reset");
    RESETS.with(|resets| resets.borrow_mut().push(saved));
}

/// Restore the most recently saved stack
///
/// # Panics
///
/// Panics if there is no saved stack to restore.
pub(crate) fn pop_reset() {
    let saved = RESETS.with(|resets| {
        resets
            .borrow_mut()
            .pop()
            .unwrap_or_else(|| panic!("principal scope reset popped while empty"))
    });
    trace!(restored = saved.len(), "principal scope restored");
    SCOPE.with(|scope| *scope.borrow_mut() = saved);
}

/// Number of entries on the calling thread's live stack
pub fn depth() -> usize {
    SCOPE.with(|scope| scope.borrow().len())
}

/// Copy of the live stack, most recent entry first
pub fn snapshot() -> Vec<ScopeEntry> {
    SCOPE.with(|scope| scope.borrow().iter().rev().cloned().collect())
}

/// Walk the live stack top to bottom, stopping once `visit` returns `true`
///
/// Sources are enumerated at call time. The stack is copied first so a
/// source may safely enter scopes of its own while being enumerated.
pub fn any_principal(mut visit: impl FnMut(&Principal) -> bool) -> bool {
    snapshot()
        .iter()
        .any(|entry| entry.any_principal(&mut visit))
}

/// Every principal currently acting on this thread, in walk order
pub fn principals_in_scope() -> Vec<Principal> {
    let mut principals = Vec::new();
    any_principal(|principal| {
        principals.push(principal.clone());
        false
    });
    principals
}

/// RAII guard that keeps a principal (or source) on the scope stack
///
/// The guard is bound to the thread that created it and must be dropped in
/// LIFO order with respect to other guards on that thread.
#[must_use = "the principal leaves the scope as soon as the guard is dropped"]
#[derive(Debug)]
pub struct PrincipalScope {
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

impl PrincipalScope {
    /// Enter the scope as a single principal
    pub fn new(principal: impl Into<Principal>) -> Self {
        Self::enter(ScopeEntry::Literal(principal.into()))
    }

    /// Enter the scope as a dynamic principal source
    pub fn from_source(source: Arc<dyn PrincipalSource>) -> Self {
        Self::enter(ScopeEntry::Source(source))
    }

    /// Enter the scope with a prepared entry
    pub fn enter(entry: ScopeEntry) -> Self {
        Self {
            depth: push(entry),
            _not_send: PhantomData,
        }
    }
}

impl Drop for PrincipalScope {
    fn drop(&mut self) {
        let current = depth();
        if current == self.depth + 1 {
            pop();
            return;
        }

        // rebalance before reporting so later guards see a consistent stack
        SCOPE.with(|scope| scope.borrow_mut().truncate(self.depth));
        if !std::thread::panicking() {
            panic!(
                "principal scope dropped out of order (depth {}, expected {})",
                current,
                self.depth + 1
            );
        }
    }
}

/// RAII guard that sandboxes the enclosed region from the caller's scope
///
/// While alive, the thread's scope is empty so implicit checks only see
/// grants to `builtin.everyone`. The previous scope is restored on drop.
#[must_use = "the previous scope is restored as soon as the guard is dropped"]
#[derive(Debug)]
pub struct ScopeReset {
    _not_send: PhantomData<*const ()>,
}

impl ScopeReset {
    /// Save and clear the current scope
    pub fn new() -> Self {
        push_reset();
        Self {
            _not_send: PhantomData,
        }
    }
}

impl Default for ScopeReset {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ScopeReset {
    fn drop(&mut self) {
        // anything still live was pushed inside the reset by a guard that
        // outlives it
        let leaked = depth();
        pop_reset();
        if leaked != 0 && !std::thread::panicking() {
            panic!(
                "principal scope reset dropped out of order ({} inner entries still live)",
                leaked
            );
        }
    }
}
