/// Scope entry types
///
/// An entry is either a fixed principal or a source that enumerates a
/// dynamic set of principals each time it is asked.

use crate::types::Principal;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Anything that can enumerate the principals it currently acts as
///
/// `visit` returns `true` to stop the enumeration early; implementations
/// must honor it.
///
/// # Examples
///
/// ```
/// use se_security::scope::PrincipalSource;
/// use se_security::Principal;
/// use parking_lot::RwLock;
///
/// struct Player {
///     roles: RwLock<Vec<Principal>>,
/// }
///
/// impl PrincipalSource for Player {
///     fn get_principals(&self, visit: &mut dyn FnMut(&Principal) -> bool) {
///         self.roles.get_principals(visit)
///     }
/// }
/// ```
pub trait PrincipalSource {
    /// Yield principals to `visit` until it returns `true`
    fn get_principals(&self, visit: &mut dyn FnMut(&Principal) -> bool);
}

impl PrincipalSource for Principal {
    fn get_principals(&self, visit: &mut dyn FnMut(&Principal) -> bool) {
        visit(self);
    }
}

impl PrincipalSource for [Principal] {
    fn get_principals(&self, visit: &mut dyn FnMut(&Principal) -> bool) {
        for principal in self {
            if visit(principal) {
                break;
            }
        }
    }
}

impl PrincipalSource for Vec<Principal> {
    fn get_principals(&self, visit: &mut dyn FnMut(&Principal) -> bool) {
        self.as_slice().get_principals(visit)
    }
}

impl<T: PrincipalSource + ?Sized> PrincipalSource for RwLock<T> {
    fn get_principals(&self, visit: &mut dyn FnMut(&Principal) -> bool) {
        self.read().get_principals(visit)
    }
}

impl<T: PrincipalSource + ?Sized> PrincipalSource for Arc<T> {
    fn get_principals(&self, visit: &mut dyn FnMut(&Principal) -> bool) {
        (**self).get_principals(visit)
    }
}

/// One entry on the scope stack
#[derive(Clone)]
pub enum ScopeEntry {
    /// A single fixed principal
    Literal(Principal),
    /// A source whose principals are enumerated at check time
    Source(Arc<dyn PrincipalSource>),
}

impl ScopeEntry {
    /// Visit the principals of this entry; returns whether `visit` stopped early
    pub fn any_principal(&self, visit: &mut dyn FnMut(&Principal) -> bool) -> bool {
        match self {
            Self::Literal(principal) => visit(principal),
            Self::Source(source) => {
                let mut stopped = false;
                source.get_principals(&mut |principal| {
                    if visit(principal) {
                        stopped = true;
                    }
                    stopped
                });
                stopped
            }
        }
    }
}

impl fmt::Debug for ScopeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(principal) => f.debug_tuple("Literal").field(principal).finish(),
            Self::Source(_) => f.write_str("Source(..)"),
        }
    }
}

impl From<Principal> for ScopeEntry {
    fn from(principal: Principal) -> Self {
        Self::Literal(principal)
    }
}

impl From<Arc<dyn PrincipalSource>> for ScopeEntry {
    fn from(source: Arc<dyn PrincipalSource>) -> Self {
        Self::Source(source)
    }
}
