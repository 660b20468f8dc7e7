//! Furl Engine - Collapse/visibility consistency for node-link diagrams
//!
//! The engine keeps a directed graph with grouping combos consistent
//! while the user collapses subtrees (DAG collapse) or combos. Every
//! action runs one reconciliation pass:
//!
//! 1. hide or show the affected nodes and edges
//! 2. update combo auto-visibility
//! 3. recompute combo bounds from visible members
//! 4. diff the synthetic proxy edges against the model and patch them
//!
//! Hidden connectivity stays visible through proxy edges: a real edge
//! whose endpoint is hidden inside a collapsed combo is drawn from or
//! to that combo instead.
//!
//! # Example
//!
//! ```no_run
//! # async fn demo() -> furl_engine::Result<()> {
//! use furl_core::{Combo, Edge, Node};
//! use furl_engine::CollapseSession;
//! use furl_graph::MemoryGraph;
//!
//! let mut graph = MemoryGraph::new();
//! graph.add_combo(Combo::new("k"))?;
//! graph.add_node(Node::new("x").in_combo("k"))?;
//! graph.add_node(Node::new("z"))?;
//! graph.add_edge(Edge::new("x-z", "x", "z"))?;
//!
//! let session = CollapseSession::new(graph);
//! session.collapse_combo("k").await?;
//! // A proxy edge k → z now stands in for x → z.
//! # Ok(())
//! # }
//! ```

mod action;
mod bounds;
mod checkpoint;
mod config;
mod error;
mod overlay;
mod proxy;
mod reapply;
mod reconciler;
mod session;
mod state;
mod transition;
mod visibility;

pub use action::Action;
pub use bounds::refresh_bounds;
pub use config::EngineConfig;
pub use error::{EngineError, Result};
pub use overlay::{OverlayMembership, OverlayRegistry};
pub use proxy::{desired_proxies, resolve_endpoint, ProxyDiff, ProxyKey, ProxySpec};
pub use session::CollapseSession;
pub use state::{CollapseStateStore, ComboCollapseRecord};
pub use transition::{TransitionOutcome, TransitionReport};
