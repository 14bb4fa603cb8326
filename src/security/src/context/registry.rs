//! Current-context resolution
//!
//! Lookup order for "the current context":
//! 1. the calling thread's override installed by [`Context::make_current`]
//! 2. the process-wide default, created once on first use and seeded with
//!    the bootstrap rule `system.console -> command : Allow`

use super::Context;
use crate::types::AccessType;

use once_cell::sync::OnceCell;
use std::cell::RefCell;
use tracing::{debug, info};

/// Principal the local console acts as
pub const CONSOLE_PRINCIPAL: &str = "system.console";

/// Object root granted to the console principal by the default context
pub const BOOTSTRAP_OBJECT: &str = "command";

static DEFAULT_CONTEXT: OnceCell<Context> = OnceCell::new();

thread_local! {
    static CURRENT: RefCell<Option<Context>> = const { RefCell::new(None) };
}

fn seed_bootstrap(context: &Context) {
    context.add_access_control_entry(CONSOLE_PRINCIPAL, BOOTSTRAP_OBJECT, AccessType::Allow);
}

/// Process-wide context resolution
pub struct ContextRegistry;

impl ContextRegistry {
    /// The process-wide default context, created on first access
    pub fn default_context() -> Context {
        DEFAULT_CONTEXT
            .get_or_init(|| {
                let context = Context::new();
                seed_bootstrap(&context);
                info!("default security context created");
                context
            })
            .clone()
    }

    /// The calling thread's override, falling back to the default context
    pub fn current() -> Context {
        CURRENT
            .with(|current| current.borrow().clone())
            .unwrap_or_else(Self::default_context)
    }

    /// A fresh context, independent of every other
    pub fn create() -> Context {
        Context::new()
    }

    /// Install `context` as the calling thread's override
    pub fn set_current(context: Context) {
        CURRENT.with(|current| *current.borrow_mut() = Some(context));
    }

    /// Remove the calling thread's override, returning it
    pub fn clear_current() -> Option<Context> {
        CURRENT.with(|current| current.borrow_mut().take())
    }

    /// Restore the default context to its bootstrap rules and drop the
    /// calling thread's override
    ///
    /// Intended for tests that share the process-wide default.
    pub fn reset_default() {
        let context = Self::default_context();
        context.reset();
        seed_bootstrap(&context);
        Self::clear_current();
        debug!("default security context restored to bootstrap state");
    }
}

/// Shorthand for [`ContextRegistry::current`]
pub fn current_context() -> Context {
    ContextRegistry::current()
}

/// Shorthand for [`ContextRegistry::create`]
pub fn create_context() -> Context {
    ContextRegistry::create()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_default_is_singleton_with_bootstrap() {
        let a = ContextRegistry::default_context();
        let b = ContextRegistry::default_context();
        assert!(a.ptr_eq(&b));
        assert!(a.check_principal_privilege(CONSOLE_PRINCIPAL, "command.add_ace"));
    }

    #[test]
    fn test_override_is_thread_local() {
        let context = create_context();
        context.make_current();
        assert!(current_context().ptr_eq(&context));

        let other_thread_sees_default = thread::spawn(|| {
            current_context().ptr_eq(&ContextRegistry::default_context())
        })
        .join()
        .unwrap();
        assert!(other_thread_sees_default);

        let cleared = ContextRegistry::clear_current().unwrap();
        assert!(cleared.ptr_eq(&context));
        assert!(current_context().ptr_eq(&ContextRegistry::default_context()));
    }

    #[test]
    fn test_create_is_independent() {
        let a = create_context();
        let b = create_context();
        a.add_access_control_entry("p", "o", AccessType::Allow);

        assert!(!a.ptr_eq(&b));
        assert_eq!(b.rules_len(), 0);
        assert!(!b.check_principal_privilege(CONSOLE_PRINCIPAL, "command"));
    }
}
