//! Furl Core - Element model for collapsible node-link diagrams
//!
//! This crate defines the records the collapse engine works with:
//! nodes, edges, and the grouping containers called combos. It also
//! carries the small amount of geometry the engine needs to keep combo
//! placeholders in place while their members are hidden.
//!
//! Everything here is plain data. Behavior lives in `furl-graph`
//! (model access and traversal) and `furl-engine` (collapse logic).

mod combo;
mod edge;
mod error;
mod geometry;
mod node;
mod patch;

pub use combo::Combo;
pub use edge::{CurveStyle, Edge};
pub use error::{ModelError, Result};
pub use geometry::{Bounds, Padding, Point};
pub use node::{CollapseConfig, Node, Port, PortArity};
pub use patch::{ComboPatch, EdgePatch, NodePatch};

use serde::{Deserialize, Serialize};

/// Whether an element is currently rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }

    pub fn is_hidden(self) -> bool {
        self == Visibility::Hidden
    }
}

/// The kind of element an id refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Node,
    Edge,
    Combo,
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Node => "node",
            Self::Edge => "edge",
            Self::Combo => "combo",
        };
        write!(f, "{}", s)
    }
}
