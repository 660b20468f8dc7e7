//! In-memory graph model.
//!
//! `MemoryGraph` keeps elements in insertion order and applies
//! visibility changes immediately. Each async call yields once to the
//! scheduler, which stands in for waiting on an animation frame.

use crate::document::GraphDocument;
use crate::model::GraphModel;
use async_trait::async_trait;
use furl_core::{
    Bounds, Combo, ComboPatch, Edge, EdgePatch, ModelError, Node, NodePatch, Result, Visibility,
};
use indexmap::IndexMap;
use tracing::debug;

/// Counters for observing how much work the model was asked to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModelStats {
    /// Elements whose visibility actually changed.
    pub visibility_flips: usize,
    /// Edge additions and removals.
    pub structural_mutations: usize,
    /// Full redraws.
    pub draws: usize,
}

#[derive(Debug, Default)]
pub struct MemoryGraph {
    nodes: IndexMap<String, Node>,
    edges: IndexMap<String, Edge>,
    combos: IndexMap<String, Combo>,

    /// Emulates renderers whose full redraw re-shows hidden elements.
    redraw_reveals_hidden: bool,

    stats: ModelStats,
}

impl MemoryGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from a document. Combos are added first, then
    /// nodes, then edges, so every reference can be validated.
    pub fn from_document(document: GraphDocument) -> Result<Self> {
        let mut graph = Self::new();
        for combo in document.combos {
            graph.add_combo(combo)?;
        }
        for node in document.nodes {
            graph.add_node(node)?;
        }
        for edge in document.edges {
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    /// Makes every `draw` reveal all hidden elements, the way some
    /// rendering frameworks do after a structural change.
    pub fn with_redraw_reveal(mut self, enabled: bool) -> Self {
        self.redraw_reveals_hidden = enabled;
        self
    }

    pub fn add_node(&mut self, node: Node) -> Result<()> {
        self.ensure_unique(&node.id)?;
        self.nodes.insert(node.id.clone(), node);
        Ok(())
    }

    pub fn add_combo(&mut self, combo: Combo) -> Result<()> {
        self.ensure_unique(&combo.id)?;
        self.combos.insert(combo.id.clone(), combo);
        Ok(())
    }

    /// Adds an edge whose endpoints must be existing nodes or combos.
    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        self.ensure_unique(&edge.id)?;
        for endpoint in [&edge.source, &edge.target] {
            if !self.nodes.contains_key(endpoint) && !self.combos.contains_key(endpoint) {
                return Err(ModelError::MissingEndpoint {
                    edge: edge.id.clone(),
                    endpoint: endpoint.clone(),
                });
            }
        }
        self.edges.insert(edge.id.clone(), edge);
        Ok(())
    }

    /// Removes a node and every edge attached to it.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let node = self.nodes.shift_remove(id)?;
        self.edges.retain(|_, edge| !edge.touches(id));
        Some(node)
    }

    pub fn stats(&self) -> ModelStats {
        self.stats
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Ids of visible nodes, in insertion order.
    pub fn visible_nodes(&self) -> Vec<&str> {
        self.nodes
            .values()
            .filter(|n| n.visibility.is_visible())
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Ids of visible real edges, in insertion order.
    pub fn visible_edges(&self) -> Vec<&str> {
        self.edges
            .values()
            .filter(|e| !e.is_proxy && e.visibility.is_visible())
            .map(|e| e.id.as_str())
            .collect()
    }

    /// Proxy edges currently in the model.
    pub fn proxy_edges(&self) -> Vec<&Edge> {
        self.edges.values().filter(|e| e.is_proxy).collect()
    }

    fn ensure_unique(&self, id: &str) -> Result<()> {
        if self.nodes.contains_key(id) || self.edges.contains_key(id) || self.combos.contains_key(id)
        {
            return Err(ModelError::DuplicateId(id.to_string()));
        }
        Ok(())
    }

    fn set_visibility(&mut self, ids: &[String], visibility: Visibility) {
        for id in ids {
            let slot = if let Some(node) = self.nodes.get_mut(id) {
                &mut node.visibility
            } else if let Some(edge) = self.edges.get_mut(id) {
                &mut edge.visibility
            } else if let Some(combo) = self.combos.get_mut(id) {
                &mut combo.visibility
            } else {
                debug!("Skipping unknown element {}", id);
                continue;
            };

            if *slot != visibility {
                *slot = visibility;
                self.stats.visibility_flips += 1;
            }
        }
    }
}

#[async_trait]
impl GraphModel for MemoryGraph {
    fn node_data(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    fn edge_data(&self, id: &str) -> Option<&Edge> {
        self.edges.get(id)
    }

    fn combo_data(&self, id: &str) -> Option<&Combo> {
        self.combos.get(id)
    }

    fn nodes(&self) -> Vec<&Node> {
        self.nodes.values().collect()
    }

    fn edges(&self) -> Vec<&Edge> {
        self.edges.values().collect()
    }

    fn combos(&self) -> Vec<&Combo> {
        self.combos.values().collect()
    }

    fn element_bounds(&self, id: &str) -> Option<Bounds> {
        if let Some(node) = self.nodes.get(id) {
            return Some(node.bounds());
        }
        self.combos.get(id).and_then(|combo| combo.bounds)
    }

    fn add_edge_data(&mut self, edges: Vec<Edge>) -> Result<()> {
        for edge in edges {
            self.add_edge(edge)?;
            self.stats.structural_mutations += 1;
        }
        Ok(())
    }

    fn remove_edge_data(&mut self, ids: &[String]) {
        for id in ids {
            if self.edges.shift_remove(id).is_some() {
                self.stats.structural_mutations += 1;
            }
        }
    }

    fn update_node_data(&mut self, id: &str, patch: &NodePatch) {
        if let Some(node) = self.nodes.get_mut(id) {
            patch.apply(node);
        }
    }

    fn update_edge_data(&mut self, id: &str, patch: &EdgePatch) {
        if let Some(edge) = self.edges.get_mut(id) {
            patch.apply(edge);
        }
    }

    fn update_combo_data(&mut self, id: &str, patch: &ComboPatch) {
        if let Some(combo) = self.combos.get_mut(id) {
            patch.apply(combo);
        }
    }

    async fn hide_elements(&mut self, ids: &[String], _animate: bool) -> Result<()> {
        self.set_visibility(ids, Visibility::Hidden);
        tokio::task::yield_now().await;
        Ok(())
    }

    async fn show_elements(&mut self, ids: &[String], _animate: bool) -> Result<()> {
        self.set_visibility(ids, Visibility::Visible);
        tokio::task::yield_now().await;
        Ok(())
    }

    async fn draw(&mut self) -> Result<()> {
        self.stats.draws += 1;
        if self.redraw_reveals_hidden {
            let hidden = self.hidden_elements();
            self.set_visibility(&hidden, Visibility::Visible);
        }
        tokio::task::yield_now().await;
        Ok(())
    }
}
