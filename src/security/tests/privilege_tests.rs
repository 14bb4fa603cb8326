//! Integration tests for privilege resolution
//!
//! Exercises the context, the principal scope and dynamic principal sources
//! together, including concurrent readers and writers.

use parking_lot::RwLock;
use se_security::scope;
use se_security::{AccessType, Context, Principal, PrincipalScope, PrincipalSource, ScopeReset};
use std::sync::Arc;
use std::thread;

/// Player whose role principals change while it stays in scope
struct Player {
    id: u32,
    roles: RwLock<Vec<Principal>>,
}

impl Player {
    fn new(id: u32) -> Arc<Self> {
        Arc::new(Self {
            id,
            roles: RwLock::new(Vec::new()),
        })
    }

    fn grant_role(&self, role: &str) {
        self.roles.write().push(Principal::new(role));
    }

    fn clear_roles(&self) {
        self.roles.write().clear();
    }
}

impl PrincipalSource for Player {
    fn get_principals(&self, visit: &mut dyn FnMut(&Principal) -> bool) {
        if visit(&Principal::new(format!("player.{}", self.id))) {
            return;
        }
        self.roles.get_principals(visit)
    }
}

// ============================================================================
// Default Deny / Everyone
// ============================================================================

#[test]
fn test_default_deny_for_unknown_pairs() {
    let context = Context::new();
    context.add_access_control_entry("group.admin", "command", AccessType::Allow);

    for principal in ["player.1", "group.user", "builtin.everyone"] {
        for object in ["command", "command.ban", "other", ""] {
            assert!(!context.check_principal_privilege(principal, object));
        }
    }
}

#[test]
fn test_everyone_grant_is_global() {
    let context = Context::new();
    context.add_access_control_entry("builtin.everyone", "forall", AccessType::Allow);

    assert!(context.check_principal_privilege("player.42", "forall"));
    assert!(context.check_privilege("forall"));

    let _scope = PrincipalScope::new("player.42");
    assert!(context.check_privilege("forall"));

    let _reset = ScopeReset::new();
    assert!(context.check_privilege("forall"));
}

// ============================================================================
// Scope
// ============================================================================

#[test]
fn test_scoped_grant_with_reset() {
    let context = Context::new();
    context.add_access_control_entry("system.extConsole", "command.test", AccessType::Allow);

    assert!(!context.check_privilege("command.test"));

    let _scope = PrincipalScope::new("system.extConsole");
    assert!(context.check_privilege("command.test"));

    {
        let _reset = ScopeReset::new();
        assert!(!context.check_privilege("command.test"));
    }

    assert!(context.check_privilege("command.test"));
}

#[test]
fn test_principal_source_roles() {
    let context = Context::new();
    context.add_access_control_entry("group.admin", "command.ban", AccessType::Allow);

    let player = Player::new(7);
    let _scope = PrincipalScope::from_source(player.clone());

    assert!(!context.check_privilege("command.ban"));

    player.grant_role("group.admin");
    assert!(context.check_privilege("command.ban"));

    player.clear_roles();
    assert!(!context.check_privilege("command.ban"));
    assert_eq!(scope::depth(), 1);
}

#[test]
fn test_source_principal_and_roles_both_checked() {
    let context = Context::new();
    context.add_access_control_entry("player.7", "command.me", AccessType::Allow);

    let player = Player::new(7);
    player.grant_role("group.user");
    let _scope = PrincipalScope::from_source(player);

    assert!(context.check_privilege("command.me"));
    assert!(!context.check_privilege("command.other"));
}

#[test]
fn test_deny_in_scope_does_not_veto_walk() {
    let context = Context::new();
    context.add_access_control_entry("player.7", "command.kick", AccessType::Deny);
    context.add_access_control_entry("group.admin", "command.kick", AccessType::Allow);

    let player = Player::new(7);
    player.grant_role("group.admin");
    let _scope = PrincipalScope::from_source(player);

    // the player principal alone is denied, the admin role alone is allowed
    assert!(!context.check_principal_privilege("player.7", "command.kick"));
    assert!(context.check_privilege("command.kick"));
}

// ============================================================================
// Deny Trumps Allow
// ============================================================================

#[test]
fn test_deny_trumps_allow_within_one_principal() {
    let context = Context::new();
    context.add_access_control_entry("group.admin", "command.banall", AccessType::Allow);
    assert!(context.check_principal_privilege("group.admin", "command.banall"));

    context.add_principal_inheritance("group.admin", "group.restricted");
    context.add_access_control_entry("group.restricted", "command", AccessType::Deny);
    assert!(!context.check_principal_privilege("group.admin", "command.banall"));
    assert!(!context.check_principal_privilege("group.admin", "command.banall.now"));
}

#[test]
fn test_deny_order_independent() {
    let first = Context::new();
    first.add_access_control_entry("p", "o", AccessType::Deny);
    first.add_access_control_entry("p", "o", AccessType::Allow);

    let second = Context::new();
    second.add_access_control_entry("p", "o", AccessType::Allow);
    second.add_access_control_entry("p", "o", AccessType::Deny);

    assert!(!first.check_principal_privilege("p", "o"));
    assert!(!second.check_principal_privilege("p", "o"));
}

// ============================================================================
// Hierarchy and Inheritance
// ============================================================================

#[test]
fn test_unbounded_object_depth() {
    let context = Context::new();
    context.add_access_control_entry("p", "command", AccessType::Allow);

    let deep = (0..200).fold("command".to_string(), |acc, i| format!("{}.s{}", acc, i));
    assert!(context.check_principal_privilege("p", deep.as_str()));
    assert!(!context.check_principal_privilege("p", "other"));
    assert!(!context.check_principal_privilege("p", "other.command"));
}

#[test]
fn test_case_insensitive_resolution() {
    let context = Context::new();
    context.add_access_control_entry("Group.Admin", "Command.Admin", AccessType::Allow);
    context.add_principal_inheritance("PLAYER.1", "group.admin");

    assert!(context.check_principal_privilege("player.1", "command.admin.ban"));
    assert!(context.check_principal_privilege("group.ADMIN", "COMMAND.ADMIN"));
}

#[test]
fn test_inheritance_diamond_and_cycle() {
    let context = Context::new();
    context.add_principal_inheritance("owner", "admin");
    context.add_principal_inheritance("owner", "moderator");
    context.add_principal_inheritance("admin", "user");
    context.add_principal_inheritance("moderator", "user");
    context.add_principal_inheritance("user", "owner");
    context.add_access_control_entry("user", "chat", AccessType::Allow);
    context.add_access_control_entry("owner", "shutdown", AccessType::Allow);

    assert!(context.check_principal_privilege("owner", "chat.say"));
    // cycle makes user inherit from owner too
    assert!(context.check_principal_privilege("user", "shutdown"));
    assert!(!context.check_principal_privilege("guest", "chat"));
}

// ============================================================================
// Enumeration
// ============================================================================

#[test]
fn test_enumeration() {
    let context = Context::new();
    context.add_access_control_entry("a", "x", AccessType::Allow);
    context.add_access_control_entry("a", "x", AccessType::Allow);
    context.add_principal_inheritance("b", "a");

    let mut count = 0;
    context.for_all_access_control_entries(|_| count += 1);
    assert_eq!(count, 2);

    let edges = context.principal_inheritances();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].to_string(), "b <- a");
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_checks_and_mutations() {
    let context = Context::new();
    context.add_access_control_entry("group.stable", "command", AccessType::Allow);

    let mut handles = Vec::new();

    for worker in 0..4 {
        let context = context.clone();
        handles.push(thread::spawn(move || {
            let _scope = PrincipalScope::new(format!("worker.{}", worker));
            for i in 0..500 {
                let object = format!("command.w{}.{}", worker, i);
                context.add_access_control_entry(format!("worker.{}", worker), object.as_str(), AccessType::Allow);
                assert!(context.check_privilege(object.as_str()));
                context.remove_access_control_entry(format!("worker.{}", worker), object.as_str(), AccessType::Allow);
                assert!(context.check_principal_privilege("group.stable", object.as_str()));
            }
            scope::depth()
        }));
    }

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1);
    }

    assert_eq!(context.rules_len(), 1);
    assert_eq!(scope::depth(), 0);
}
