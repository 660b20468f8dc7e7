//! Serializable graph snapshot.

use furl_core::{Combo, Edge, Node};
use serde::{Deserialize, Serialize};

/// Nodes, edges and combos as a host application hands them over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub combos: Vec<Combo>,
}
