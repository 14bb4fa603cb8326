//! Principal inheritance
//!
//! Directed `child -> parent` edges between principals. A principal inherits
//! every rule granted to any principal reachable by following edges upward.
//!
//! # Features
//!
//! - **Many-to-many**: a child may have several parents and parents may be shared
//! - **Cycle tolerant**: cycles are accepted at insertion and never loop the closure
//! - **Unbounded depth**: closure expansion is iterative, not recursive
//!
//! # Example
//!
//! ```rust
//! use se_security::inheritance::InheritanceGraph;
//! use se_security::Principal;
//!
//! let mut graph = InheritanceGraph::new();
//! graph.add_edge(Principal::new("player.1"), Principal::new("group.admin"));
//! graph.add_edge(Principal::new("group.admin"), Principal::new("group.moderator"));
//!
//! let closure = graph.expand_closure(&Principal::new("player.1"));
//! assert!(closure.contains(&Principal::new("group.moderator")));
//! ```

pub mod graph;

#[cfg(test)]
mod tests;

pub use graph::InheritanceGraph;
