//! # Security Engine
//!
//! In-process access-control engine: decides whether a principal may act on
//! a dotted-hierarchical object, from an administrator-maintained table of
//! allow/deny rules, a principal inheritance graph, and the calling thread's
//! scope of acting principals.
//!
//! ## Features
//!
//! - **Deny overrides allow** anywhere in an object's ancestor chain
//! - **Hierarchical objects**: a grant on `command` covers `command.admin.ban`
//! - **Principal inheritance** with cycle-tolerant transitive closure
//! - **Thread-local principal scope** with RAII guards and sandboxing resets
//! - **Dynamic principal sources** re-enumerated on every check
//! - **Administrative console** for textual rule management
//!
//! ## Example
//!
//! ```rust
//! use se_security::{AccessType, Context, PrincipalScope};
//!
//! let context = Context::new();
//! context.add_access_control_entry("group.admin", "command", AccessType::Allow);
//! context.add_principal_inheritance("player.1", "group.admin");
//!
//! assert!(context.check_principal_privilege("player.1", "command.ban"));
//! assert!(!context.check_privilege("command.ban"));
//!
//! let _scope = PrincipalScope::new("player.1");
//! assert!(context.check_privilege("command.ban"));
//! ```

pub mod types;
pub mod error;
pub mod store;
pub mod inheritance;
pub mod scope;
pub mod context;
pub mod console;
pub mod config;

// Re-export commonly used types
pub use types::{
    AccessControlEntry, AccessType, Object, Principal, PrincipalInheritance,
    BUILTIN_EVERYONE,
};
pub use context::{create_context, current_context, Context, ContextRegistry};
pub use scope::{PrincipalScope, PrincipalSource, ScopeReset};
pub use console::{Command, Console};
pub use config::SecurityConfig;
pub use error::{Result, SecurityError};

/// Check `object` against the calling thread's scope in the current context
pub fn check_privilege(object: impl Into<Object>) -> bool {
    current_context().check_privilege(object)
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
