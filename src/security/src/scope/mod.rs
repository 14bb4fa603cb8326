/// Thread-local principal scope
///
/// Code that acts on behalf of someone enters a [`PrincipalScope`] for the
/// duration of the privileged region. Privilege checks without an explicit
/// principal walk the calling thread's scope from the most recent entry down.
///
/// # Examples
///
/// ```
/// use se_security::scope::{self, PrincipalScope, ScopeReset};
///
/// {
///     let _console = PrincipalScope::new("system.console");
///     assert_eq!(scope::depth(), 1);
///
///     {
///         // sandboxed: nothing from the caller is visible here
///         let _reset = ScopeReset::new();
///         assert_eq!(scope::depth(), 0);
///     }
///
///     assert_eq!(scope::depth(), 1);
/// }
///
/// assert_eq!(scope::depth(), 0);
/// ```

mod types;
mod stack;


pub use types::{PrincipalSource, ScopeEntry};
pub use stack::{any_principal, depth, principals_in_scope, snapshot, PrincipalScope, ScopeReset};

#[cfg(test)]
pub(crate) use stack::{pop, pop_reset, push, push_reset};
