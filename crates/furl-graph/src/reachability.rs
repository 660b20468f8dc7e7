//! Reachability over real edges.
//!
//! DAG collapse hides everything reachable from a node through outgoing
//! edges. The walker answers that question from a snapshot of the
//! model's real edges; proxy edges are never followed.

use crate::model::GraphModel;
use furl_core::Edge;
use petgraph::graphmap::DiGraphMap;
use petgraph::visit::Dfs;
use std::collections::{BTreeSet, HashSet};

/// Read-only descendant queries over a model snapshot.
///
/// Build one per reconciliation step; it borrows the model, so it must
/// be dropped before the model is mutated.
pub struct ReachabilityWalker<'a> {
    /// Node-to-node adjacency of real edges.
    graph: DiGraphMap<&'a str, ()>,
    /// Interned node ids, so lookups can take any `&str`.
    ids: HashSet<&'a str>,
    real_edges: Vec<&'a Edge>,
}

impl<'a> ReachabilityWalker<'a> {
    pub fn new<M: GraphModel + ?Sized>(model: &'a M) -> Self {
        let mut graph = DiGraphMap::new();
        let mut ids = HashSet::new();
        for node in model.nodes() {
            graph.add_node(node.id.as_str());
            ids.insert(node.id.as_str());
        }

        let real_edges: Vec<&Edge> = model.edges().into_iter().filter(|e| !e.is_proxy).collect();
        for edge in &real_edges {
            // Edges attached to combos carry no DAG meaning.
            if ids.contains(edge.source.as_str()) && ids.contains(edge.target.as_str()) {
                graph.add_edge(edge.source.as_str(), edge.target.as_str(), ());
            }
        }

        Self {
            graph,
            ids,
            real_edges,
        }
    }

    /// Every node reachable from `id` through outgoing real edges,
    /// excluding `id` itself. Cycles terminate; unknown ids yield an
    /// empty set.
    pub fn descendants(&self, id: &str) -> BTreeSet<String> {
        let mut result = BTreeSet::new();
        let Some(start) = self.lookup(id) else {
            return result;
        };

        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(current) = dfs.next(&self.graph) {
            if current != id {
                result.insert(current.to_string());
            }
        }
        result
    }

    /// Real edges with at least one endpoint in `descendants(id)`.
    ///
    /// This is deliberately narrower than "edges touching `id` or its
    /// descendants": edges that only touch `id` are left out, because the
    /// collapsed node stays visible and so do its incoming edges. Edges
    /// from `id` into a descendant are still included.
    pub fn descendant_edges(&self, id: &str) -> BTreeSet<String> {
        self.edges_touching(&self.descendants(id))
    }

    /// Real edges with at least one endpoint in `ids`.
    pub fn edges_touching(&self, ids: &BTreeSet<String>) -> BTreeSet<String> {
        self.real_edges
            .iter()
            .filter(|e| ids.contains(&e.source) || ids.contains(&e.target))
            .map(|e| e.id.clone())
            .collect()
    }

    /// Union of the descendants of every root.
    pub fn shadow<'r>(&self, roots: impl IntoIterator<Item = &'r String>) -> BTreeSet<String> {
        let mut result = BTreeSet::new();
        for root in roots {
            result.extend(self.descendants(root));
        }
        result
    }

    /// True when collapsing `id` would hide anything.
    pub fn has_descendants(&self, id: &str) -> bool {
        self.lookup(id).is_some_and(|start| {
            self.graph
                .neighbors_directed(start, petgraph::Direction::Outgoing)
                .any(|n| n != start)
        })
    }

    fn lookup(&self, id: &str) -> Option<&'a str> {
        self.ids.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryGraph;
    use furl_core::Node;

    fn chain(names: &[&str]) -> MemoryGraph {
        let mut graph = MemoryGraph::new();
        for name in names {
            graph.add_node(Node::new(*name)).unwrap();
        }
        for pair in names.windows(2) {
            graph
                .add_edge(Edge::new(format!("{}-{}", pair[0], pair[1]), pair[0], pair[1]))
                .unwrap();
        }
        graph
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_linear_chain() {
        // A → B → C
        let graph = chain(&["a", "b", "c"]);
        let walker = ReachabilityWalker::new(&graph);

        assert_eq!(walker.descendants("a"), set(&["b", "c"]));
        assert_eq!(walker.descendant_edges("a"), set(&["a-b", "b-c"]));
        assert!(walker.descendants("c").is_empty());
        assert!(walker.has_descendants("a"));
        assert!(!walker.has_descendants("c"));
    }

    #[test]
    fn test_cycle_no_infinite_loop() {
        // A → B → C → A
        let mut graph = chain(&["a", "b", "c"]);
        graph.add_edge(Edge::new("c-a", "c", "a")).unwrap();
        let walker = ReachabilityWalker::new(&graph);

        assert_eq!(walker.descendants("a"), set(&["b", "c"]));
        // The back edge touches a descendant, so it hides with them.
        assert!(walker.descendant_edges("a").contains("c-a"));
    }

    #[test]
    fn test_incoming_edge_of_root_is_kept() {
        // P → A → B
        let graph = chain(&["p", "a", "b"]);
        let walker = ReachabilityWalker::new(&graph);

        assert_eq!(walker.descendant_edges("a"), set(&["a-b"]));
    }

    #[test]
    fn test_proxy_edges_are_not_followed() {
        let mut graph = chain(&["a", "b"]);
        graph.add_node(Node::new("c")).unwrap();
        graph
            .add_edge(Edge::proxy("p", "b", "c", Default::default()))
            .unwrap();
        let walker = ReachabilityWalker::new(&graph);

        assert_eq!(walker.descendants("a"), set(&["b"]));
        assert!(!walker.descendant_edges("a").contains("p"));
    }

    #[test]
    fn test_unknown_id() {
        let graph = chain(&["a"]);
        let walker = ReachabilityWalker::new(&graph);
        assert!(walker.descendants("ghost").is_empty());
    }

    #[test]
    fn test_shadow_unions_roots() {
        let mut graph = chain(&["a", "b"]);
        graph.add_node(Node::new("x")).unwrap();
        graph.add_node(Node::new("y")).unwrap();
        graph.add_edge(Edge::new("x-y", "x", "y")).unwrap();
        let walker = ReachabilityWalker::new(&graph);

        let roots = set(&["a", "x"]);
        assert_eq!(walker.shadow(&roots), set(&["b", "y"]));
    }
}
