//! The graph model collaborator interface.

use async_trait::async_trait;
use furl_core::{
    Bounds, Combo, ComboPatch, Edge, EdgePatch, ElementType, Node, NodePatch, Result, Visibility,
};

/// Access to the diagram as the rendering framework holds it.
///
/// Lookups return `None` for ids that no longer exist; callers are
/// expected to skip such ids rather than fail. `hide_elements` and
/// `show_elements` must ignore unknown ids and be idempotent, so a
/// transition that fails half-way can simply be retried.
#[async_trait]
pub trait GraphModel: Send {
    fn node_data(&self, id: &str) -> Option<&Node>;

    fn edge_data(&self, id: &str) -> Option<&Edge>;

    fn combo_data(&self, id: &str) -> Option<&Combo>;

    /// All nodes, in insertion order.
    fn nodes(&self) -> Vec<&Node>;

    /// All edges (real and proxy), in insertion order.
    fn edges(&self) -> Vec<&Edge>;

    /// All combos, in insertion order.
    fn combos(&self) -> Vec<&Combo>;

    /// Rendered bounds of a node or combo.
    fn element_bounds(&self, id: &str) -> Option<Bounds>;

    /// Adds edges. This is a structural change; it takes effect on the
    /// next `draw`.
    fn add_edge_data(&mut self, edges: Vec<Edge>) -> Result<()>;

    fn remove_edge_data(&mut self, ids: &[String]);

    fn update_node_data(&mut self, id: &str, patch: &NodePatch);

    fn update_edge_data(&mut self, id: &str, patch: &EdgePatch);

    fn update_combo_data(&mut self, id: &str, patch: &ComboPatch);

    /// Hides the given elements. Resolves once the frame settles.
    async fn hide_elements(&mut self, ids: &[String], animate: bool) -> Result<()>;

    /// Shows the given elements. Resolves once the frame settles.
    async fn show_elements(&mut self, ids: &[String], animate: bool) -> Result<()>;

    /// Full redraw after structural changes.
    async fn draw(&mut self) -> Result<()>;

    fn element_type(&self, id: &str) -> Option<ElementType> {
        if self.node_data(id).is_some() {
            Some(ElementType::Node)
        } else if self.edge_data(id).is_some() {
            Some(ElementType::Edge)
        } else if self.combo_data(id).is_some() {
            Some(ElementType::Combo)
        } else {
            None
        }
    }

    fn visibility(&self, id: &str) -> Option<Visibility> {
        if let Some(node) = self.node_data(id) {
            return Some(node.visibility);
        }
        if let Some(edge) = self.edge_data(id) {
            return Some(edge.visibility);
        }
        self.combo_data(id).map(|combo| combo.visibility)
    }

    /// False for hidden and for unknown ids.
    fn is_visible(&self, id: &str) -> bool {
        self.visibility(id).is_some_and(Visibility::is_visible)
    }

    /// Ids of the nodes whose combo is `combo_id`.
    fn combo_members(&self, combo_id: &str) -> Vec<String> {
        self.nodes()
            .into_iter()
            .filter(|node| node.combo.as_deref() == Some(combo_id))
            .map(|node| node.id.clone())
            .collect()
    }

    /// Ids of every hidden node, edge and combo.
    fn hidden_elements(&self) -> Vec<String> {
        let nodes = self
            .nodes()
            .into_iter()
            .filter(|n| n.visibility.is_hidden())
            .map(|n| n.id.clone());
        let edges = self
            .edges()
            .into_iter()
            .filter(|e| e.visibility.is_hidden())
            .map(|e| e.id.clone());
        let combos = self
            .combos()
            .into_iter()
            .filter(|c| c.visibility.is_hidden())
            .map(|c| c.id.clone());
        nodes.chain(edges).chain(combos).collect()
    }
}
