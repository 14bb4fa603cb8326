//! Test suite for the inheritance graph
//!
//! Covers chains, diamonds, cycles, removal and case folding.

use super::*;
use crate::types::Principal;
use std::collections::HashSet;

fn p(s: &str) -> Principal {
    Principal::new(s)
}

fn names(set: &HashSet<Principal>) -> Vec<String> {
    let mut v: Vec<String> = set.iter().map(|p| p.as_str().to_ascii_lowercase()).collect();
    v.sort();
    v
}

// ============================================================================
// Closure Tests
// ============================================================================

#[test]
fn test_no_edges() {
    let graph = InheritanceGraph::new();
    assert!(graph.expand_closure(&p("player.1")).is_empty());
}

#[test]
fn test_chain() {
    let mut graph = InheritanceGraph::new();
    graph.add_edge(p("owner"), p("admin"));
    graph.add_edge(p("admin"), p("moderator"));
    graph.add_edge(p("moderator"), p("user"));

    assert_eq!(names(&graph.expand_closure(&p("owner"))), vec!["admin", "moderator", "user"]);
    assert_eq!(names(&graph.expand_closure(&p("moderator"))), vec!["user"]);
    assert!(graph.expand_closure(&p("user")).is_empty());
}

#[test]
fn test_diamond() {
    let mut graph = InheritanceGraph::new();
    graph.add_edge(p("d"), p("b"));
    graph.add_edge(p("d"), p("c"));
    graph.add_edge(p("b"), p("a"));
    graph.add_edge(p("c"), p("a"));

    assert_eq!(names(&graph.expand_closure(&p("d"))), vec!["a", "b", "c"]);
}

#[test]
fn test_cycle_terminates() {
    let mut graph = InheritanceGraph::new();
    graph.add_edge(p("a"), p("b"));
    graph.add_edge(p("b"), p("c"));
    graph.add_edge(p("c"), p("a"));

    assert_eq!(names(&graph.expand_closure(&p("a"))), vec!["a", "b", "c"]);
}

#[test]
fn test_self_loop() {
    let mut graph = InheritanceGraph::new();
    graph.add_edge(p("a"), p("a"));

    assert_eq!(names(&graph.expand_closure(&p("a"))), vec!["a"]);
}

#[test]
fn test_deep_chain() {
    let mut graph = InheritanceGraph::new();
    for i in 0..10_000 {
        graph.add_edge(p(&format!("n{}", i)), p(&format!("n{}", i + 1)));
    }

    assert_eq!(graph.expand_closure(&p("n0")).len(), 10_000);
}

#[test]
fn test_case_insensitive_lookup() {
    let mut graph = InheritanceGraph::new();
    graph.add_edge(p("Player.1"), p("Group.Admin"));

    let closure = graph.expand_closure(&p("player.1"));
    assert!(closure.contains(&p("group.admin")));
}

// ============================================================================
// Mutation Tests
// ============================================================================

#[test]
fn test_remove_edge() {
    let mut graph = InheritanceGraph::new();
    graph.add_edge(p("a"), p("b"));
    graph.add_edge(p("a"), p("b"));
    graph.add_edge(p("a"), p("c"));

    assert_eq!(graph.remove_edge(&p("A"), &p("B")), 2);
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.parents_of(&p("a")), &[p("c")]);

    assert_eq!(graph.remove_edge(&p("a"), &p("missing")), 0);
    assert_eq!(graph.remove_edge(&p("missing"), &p("c")), 0);

    assert_eq!(graph.remove_edge(&p("a"), &p("c")), 1);
    assert!(graph.is_empty());
}

#[test]
fn test_for_all() {
    let mut graph = InheritanceGraph::new();
    graph.add_edge(p("b"), p("y"));
    graph.add_edge(p("a"), p("x"));

    let mut edges = Vec::new();
    graph.for_all(|edge| edges.push(edge.to_string()));
    assert_eq!(edges, vec!["a <- x", "b <- y"]);

    graph.clear();
    assert_eq!(graph.len(), 0);
}
