//! Furl Graph - Model access and traversal
//!
//! The collapse engine never owns diagram data. It talks to a
//! [`GraphModel`], the narrow interface a rendering framework exposes:
//! element lookups, a few mutations, and asynchronous hide/show/draw
//! calls that settle once the frame has been committed.
//!
//! This crate provides that trait, an in-memory implementation used by
//! tests and the CLI, and the traversals the engine runs against any
//! model.
//!
//! # Example
//!
//! ```no_run
//! use furl_core::{Edge, Node};
//! use furl_graph::{MemoryGraph, ReachabilityWalker};
//!
//! let mut graph = MemoryGraph::new();
//! graph.add_node(Node::new("a")).unwrap();
//! graph.add_node(Node::new("b")).unwrap();
//! graph.add_edge(Edge::new("a-b", "a", "b")).unwrap();
//!
//! let walker = ReachabilityWalker::new(&graph);
//! assert!(walker.descendants("a").contains("b"));
//! ```

mod document;
mod memory;
mod model;
mod ports;
mod reachability;

pub use document::GraphDocument;
pub use memory::{MemoryGraph, ModelStats};
pub use model::GraphModel;
pub use ports::port_connections;
pub use reachability::ReachabilityWalker;
