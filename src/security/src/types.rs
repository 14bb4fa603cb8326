//! Core access-control types
//!
//! Principals and objects are plain string identifiers compared with an
//! ASCII case fold, so `Command.Admin` and `command.admin` name the same
//! object regardless of the host locale.

use crate::error::SecurityError;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Principal whose grants apply to every privilege check
pub const BUILTIN_EVERYONE: &str = "builtin.everyone";

/// Separator between object hierarchy segments
pub const OBJECT_SEPARATOR: char = '.';

fn fold_cmp(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

fn fold_hash<H: Hasher>(s: &str, state: &mut H) {
    for c in s.bytes() {
        state.write_u8(c.to_ascii_lowercase());
    }
    // terminator keeps ("ab", "c") and ("a", "bc") apart in composite keys
    state.write_u8(0xff);
}

/// Lower-cased form used as a map key
pub(crate) fn fold_key(s: &str) -> String {
    s.to_ascii_lowercase()
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            id: String,
        }

        impl $name {
            /// Create a new identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self { id: id.into() }
            }

            /// Identifier as written by its creator
            pub fn as_str(&self) -> &str {
                &self.id
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.id.eq_ignore_ascii_case(&other.id)
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                fold_cmp(&self.id, &other.id)
            }
        }

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                fold_hash(&self.id, state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self::new(id)
            }
        }
    };
}

identifier! {
    /// An identity that can be granted or denied access
    /// (e.g. `"player.12"`, `"group.admin"`, `"system.console"`)
    Principal
}

identifier! {
    /// Dotted-hierarchical name of a protected action (e.g. `"command.admin.ban"`)
    Object
}

impl Principal {
    /// The implicit principal present in every evaluation
    pub fn everyone() -> Self {
        Self::new(BUILTIN_EVERYONE)
    }

    /// Whether this is [`BUILTIN_EVERYONE`]
    pub fn is_everyone(&self) -> bool {
        self.id.eq_ignore_ascii_case(BUILTIN_EVERYONE)
    }
}

impl Object {
    /// Iterate the object followed by each ancestor, most specific first
    ///
    /// ```
    /// use se_security::Object;
    ///
    /// let object = Object::new("command.admin.ban");
    /// let chain: Vec<&str> = object.ancestors().collect();
    /// assert_eq!(chain, vec!["command.admin.ban", "command.admin", "command"]);
    /// ```
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: Some(&self.id),
        }
    }
}

/// Iterator over an object name and its parents, see [`Object::ancestors`]
#[derive(Debug, Clone)]
pub struct Ancestors<'a> {
    next: Option<&'a str>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current
            .rsplit_once(OBJECT_SEPARATOR)
            .map(|(parent, _)| parent);
        Some(current)
    }
}

/// Decision carried by an access control entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    /// Reserved placeholder; never grants or denies
    #[default]
    Unset,
    /// Grant access
    Allow,
    /// Deny access, overriding any allow
    Deny,
}

impl AccessType {
    /// Upper-case label used by rule listings
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unset => "UNSET",
            Self::Allow => "ALLOW",
            Self::Deny => "DENY",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AccessType {
    type Err = SecurityError;

    /// Parse an operator token; only `allow` and `deny` are accepted
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("allow") {
            Ok(Self::Allow)
        } else if s.eq_ignore_ascii_case("deny") {
            Ok(Self::Deny)
        } else {
            Err(SecurityError::InvalidAccessType(s.to_string()))
        }
    }
}

// Same case-insensitive tokens as the console. `unset` is still readable so
// config validation can reject it with a precise message.
impl<'de> Deserialize<'de> for AccessType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        if token.eq_ignore_ascii_case("unset") {
            return Ok(Self::Unset);
        }
        token.parse().map_err(serde::de::Error::custom)
    }
}

/// One `(object, principal, type)` rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessControlEntry {
    /// Object the rule is keyed by
    pub object: Object,

    /// Principal the rule applies to
    pub principal: Principal,

    /// Allow or deny
    #[serde(rename = "access")]
    pub access_type: AccessType,
}

impl AccessControlEntry {
    /// Create a new entry
    pub fn new(principal: Principal, object: Object, access_type: AccessType) -> Self {
        Self {
            object,
            principal,
            access_type,
        }
    }
}

impl fmt::Display for AccessControlEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} = {}", self.principal, self.object, self.access_type)
    }
}

/// Directed `child -> parent` edge: the child inherits the parent's rules
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrincipalInheritance {
    /// Inheriting principal
    pub child: Principal,

    /// Principal whose rules are inherited
    pub parent: Principal,
}

impl PrincipalInheritance {
    /// Create a new edge
    pub fn new(child: Principal, parent: Principal) -> Self {
        Self { child, parent }
    }
}

impl fmt::Display for PrincipalInheritance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {}", self.child, self.parent)
    }
}
