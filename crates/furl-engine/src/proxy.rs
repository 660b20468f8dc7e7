//! Proxy edge synthesis.
//!
//! When a real edge's endpoint is hidden inside a collapsed combo, the
//! connection would vanish from the picture. Instead, a proxy edge is
//! drawn between the *resolved* endpoints: the node itself while
//! visible, or the collapsed combo standing in for it.
//!
//! Every reconciliation pass computes the desired proxy set from scratch
//! and patches the model with the difference. Adding or removing edges
//! forces a full redraw, so only structural changes take that path;
//! re-showing an existing proxy uses plain show.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::state::CollapseStateStore;
use crate::transition::Transition;
use furl_core::{CurveStyle, Edge, EdgePatch, ElementType};
use furl_graph::GraphModel;
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Ordered pair of resolved endpoints identifying a proxy edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProxyKey {
    pub source: String,
    pub target: String,
}

impl ProxyKey {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn reversed(&self) -> ProxyKey {
        ProxyKey::new(self.target.clone(), self.source.clone())
    }

    /// Edge id used in the model.
    ///
    /// The source is length-prefixed, so ids containing `_to_` cannot
    /// make two different pairs share an edge id.
    pub fn edge_id(&self) -> String {
        format!(
            "proxy:{}:{}_to_{}",
            self.source.len(),
            self.source,
            self.target
        )
    }
}

impl std::fmt::Display for ProxyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.source, self.target)
    }
}

/// A proxy edge the current state calls for.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxySpec {
    pub key: ProxyKey,
    /// The first real edge that produced this key.
    pub represents: String,
    pub curve: CurveStyle,
}

impl ProxySpec {
    fn to_edge(&self) -> Edge {
        Edge::proxy(
            self.key.edge_id(),
            self.key.source.clone(),
            self.key.target.clone(),
            self.curve,
        )
    }
}

/// What one proxy refresh did to the model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProxyDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
    /// Existing proxies that were hidden and got shown again.
    pub revealed: Vec<String>,
    /// Existing proxies whose curvature changed.
    pub restyled: Vec<String>,
    /// Ids a full redraw revealed that had to be hidden again.
    pub restored_after_redraw: usize,
}

impl ProxyDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.revealed.is_empty()
            && self.restyled.is_empty()
    }

    pub fn is_structural(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }

    fn merge(&mut self, other: ProxyDiff) {
        self.added.extend(other.added);
        self.removed.extend(other.removed);
        self.revealed.extend(other.revealed);
        self.restyled.extend(other.restyled);
        self.restored_after_redraw += other.restored_after_redraw;
    }
}

/// The id an endpoint is drawn at.
///
/// A visible node or combo resolves to itself. A hidden node resolves to
/// its combo when that combo is collapsed and visible. Anything else has
/// no drawable stand-in.
pub fn resolve_endpoint<M: GraphModel + ?Sized>(
    model: &M,
    store: &CollapseStateStore,
    id: &str,
) -> Option<String> {
    match model.element_type(id)? {
        ElementType::Node => {
            if model.is_visible(id) {
                return Some(id.to_string());
            }
            let combo = model.node_data(id)?.combo.as_deref()?;
            (store.has_record(combo) && model.is_visible(combo)).then(|| combo.to_string())
        }
        ElementType::Combo => model.is_visible(id).then(|| id.to_string()),
        ElementType::Edge => None,
    }
}

/// Computes the proxy edges the current visibility calls for.
///
/// Keys are unique per ordered pair; the first real edge wins. When both
/// directions of a pair are present, the two proxies get opposite curve
/// offsets so they are drawn apart instead of on top of each other.
pub fn desired_proxies<M: GraphModel + ?Sized>(
    model: &M,
    store: &CollapseStateStore,
    config: &EngineConfig,
) -> IndexMap<ProxyKey, ProxySpec> {
    let mut desired: IndexMap<ProxyKey, ProxySpec> = IndexMap::new();

    for edge in model.edges() {
        if edge.is_proxy {
            continue;
        }
        let (Some(source), Some(target)) = (
            resolve_endpoint(model, store, &edge.source),
            resolve_endpoint(model, store, &edge.target),
        ) else {
            continue;
        };
        if source == target {
            continue;
        }
        // The real edge can be drawn as is.
        if source == edge.source && target == edge.target {
            continue;
        }
        let is_combo = |id: &str| model.combo_data(id).is_some();
        if !is_combo(&source) && !is_combo(&target) {
            continue;
        }

        let key = ProxyKey::new(source, target);
        desired.entry(key.clone()).or_insert_with(|| ProxySpec {
            key,
            represents: edge.id.clone(),
            curve: CurveStyle::Straight,
        });
    }

    let mutual: Vec<ProxyKey> = desired
        .keys()
        .filter(|key| desired.contains_key(&key.reversed()))
        .cloned()
        .collect();
    for key in mutual {
        let offset = if key.source < key.target {
            config.mutual_curve_offset
        } else {
            -config.mutual_curve_offset
        };
        if let Some(spec) = desired.get_mut(&key) {
            spec.curve = CurveStyle::Curved { offset };
        }
    }

    desired
}

/// Patches the model's proxy edges to match `desired`.
async fn apply_proxies<M: GraphModel>(
    tx: &mut Transition<'_, M>,
    desired: IndexMap<ProxyKey, ProxySpec>,
) -> Result<ProxyDiff> {
    let mut diff = ProxyDiff::default();
    let desired_by_id: HashMap<String, &ProxySpec> = desired
        .values()
        .map(|spec| (spec.key.edge_id(), spec))
        .collect();
    debug_assert_eq!(desired_by_id.len(), desired.len(), "proxy edge ids collide");

    let mut existing = BTreeSet::new();
    for edge in tx.model.edges().into_iter().filter(|e| e.is_proxy) {
        match desired_by_id.get(&edge.id) {
            None => diff.removed.push(edge.id.clone()),
            Some(spec) => {
                existing.insert(edge.id.clone());
                if edge.visibility.is_hidden() {
                    diff.revealed.push(edge.id.clone());
                }
                if edge.curve != spec.curve {
                    diff.restyled.push(edge.id.clone());
                }
            }
        }
    }

    let additions: Vec<Edge> = desired
        .values()
        .filter(|spec| !existing.contains(&spec.key.edge_id()))
        .map(ProxySpec::to_edge)
        .collect();
    diff.added = additions.iter().map(|e| e.id.clone()).collect();

    for id in &diff.restyled {
        if let Some(spec) = desired_by_id.get(id) {
            tx.model.update_edge_data(
                id,
                &EdgePatch {
                    curve: Some(spec.curve),
                },
            );
        }
    }

    if diff.is_structural() {
        tx.model.remove_edge_data(&diff.removed);
        tx.model.add_edge_data(additions)?;
        diff.restored_after_redraw = redraw_preserving_visibility(tx.model, tx.config).await?;
    }

    if !diff.revealed.is_empty() {
        tx.model
            .show_elements(&diff.revealed, tx.config.animate)
            .await?;
    }

    Ok(diff)
}

/// Full redraw that leaves logical visibility untouched.
///
/// Some renderers re-show hidden elements when they redraw after a
/// structural change. Hidden ids are captured right before the draw and
/// any that came back are hidden again. Returns how many were restored.
async fn redraw_preserving_visibility<M: GraphModel>(
    model: &mut M,
    config: &EngineConfig,
) -> Result<usize> {
    let hidden = if config.restore_after_redraw {
        model.hidden_elements()
    } else {
        Vec::new()
    };

    model.draw().await?;

    let leaked: Vec<String> = hidden
        .into_iter()
        .filter(|id| model.is_visible(id))
        .collect();
    if leaked.is_empty() {
        return Ok(0);
    }

    warn!(
        "Redraw revealed {} hidden elements; hiding them again",
        leaked.len()
    );
    model.hide_elements(&leaked, false).await?;
    Ok(leaked.len())
}

/// Recomputes proxy edges and records the diff on the transition.
pub(crate) async fn refresh_proxies<M: GraphModel>(tx: &mut Transition<'_, M>) -> Result<()> {
    let desired = desired_proxies(&*tx.model, &*tx.store, tx.config);
    let diff = apply_proxies(tx, desired).await?;
    if !diff.is_empty() {
        debug!(
            "Proxy edges: +{} -{} revealed {} restyled {}",
            diff.added.len(),
            diff.removed.len(),
            diff.revealed.len(),
            diff.restyled.len()
        );
    }
    tx.report.proxies.merge(diff);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use furl_core::{Combo, Node};
    use furl_graph::MemoryGraph;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// K1 = {x}, K2 = {y}, x → y and y → x, plus an outside node z.
    async fn collapsed_pair() -> (MemoryGraph, CollapseStateStore) {
        let mut graph = MemoryGraph::new();
        graph.add_combo(Combo::new("k1")).unwrap();
        graph.add_combo(Combo::new("k2")).unwrap();
        graph.add_node(Node::new("x").in_combo("k1")).unwrap();
        graph.add_node(Node::new("y").in_combo("k2")).unwrap();
        graph.add_node(Node::new("z")).unwrap();
        graph.add_edge(Edge::new("x-y", "x", "y")).unwrap();
        graph.add_edge(Edge::new("y-x", "y", "x")).unwrap();
        graph.add_edge(Edge::new("x-z", "x", "z")).unwrap();
        graph
            .hide_elements(&ids(&["x", "y", "x-y", "y-x", "x-z"]), false)
            .await
            .unwrap();

        let mut store = CollapseStateStore::new();
        store.snapshot_combo("k1", ["x".to_string()].into(), Default::default(), |_| false);
        store.snapshot_combo("k2", ["y".to_string()].into(), Default::default(), |_| false);
        (graph, store)
    }

    #[test]
    fn test_edge_ids_are_unambiguous() {
        let first = ProxyKey::new("k", "a_to_b");
        let second = ProxyKey::new("k_to_a", "b");
        assert_ne!(first.edge_id(), second.edge_id());
        assert_eq!(first.edge_id(), "proxy:1:k_to_a_to_b");
    }

    #[tokio::test]
    async fn test_resolve_endpoint() {
        let (mut graph, store) = collapsed_pair().await;

        assert_eq!(resolve_endpoint(&graph, &store, "z").as_deref(), Some("z"));
        assert_eq!(resolve_endpoint(&graph, &store, "x").as_deref(), Some("k1"));
        assert_eq!(resolve_endpoint(&graph, &store, "k2").as_deref(), Some("k2"));
        assert_eq!(resolve_endpoint(&graph, &store, "ghost"), None);
        assert_eq!(resolve_endpoint(&graph, &store, "x-y"), None);

        // A hidden combo cannot stand in for anything.
        graph.hide_elements(&ids(&["k1"]), false).await.unwrap();
        assert_eq!(resolve_endpoint(&graph, &store, "x"), None);
    }

    #[tokio::test]
    async fn test_hidden_node_in_uncollapsed_combo_does_not_resolve() {
        let (graph, mut store) = collapsed_pair().await;
        store.release_combo("k1");
        assert_eq!(resolve_endpoint(&graph, &store, "x"), None);
    }

    #[tokio::test]
    async fn test_mutual_pair_gets_opposite_curves() {
        let (graph, store) = collapsed_pair().await;
        let config = EngineConfig::default();
        let desired = desired_proxies(&graph, &store, &config);

        let forward = &desired[&ProxyKey::new("k1", "k2")];
        let backward = &desired[&ProxyKey::new("k2", "k1")];
        assert_eq!(forward.represents, "x-y");
        assert_eq!(
            forward.curve,
            CurveStyle::Curved {
                offset: config.mutual_curve_offset
            }
        );
        assert_eq!(
            backward.curve,
            CurveStyle::Curved {
                offset: -config.mutual_curve_offset
            }
        );

        let single = &desired[&ProxyKey::new("k1", "z")];
        assert_eq!(single.curve, CurveStyle::Straight);
        assert_eq!(desired.len(), 3);
    }

    #[tokio::test]
    async fn test_duplicates_first_writer_wins() {
        let (mut graph, store) = collapsed_pair().await;
        graph.add_node(Node::new("w").in_combo("k1").hidden()).unwrap();
        graph.add_edge(Edge::new("w-z", "w", "z").hidden()).unwrap();

        let desired = desired_proxies(&graph, &store, &EngineConfig::default());
        assert_eq!(desired[&ProxyKey::new("k1", "z")].represents, "x-z");
    }

    #[tokio::test]
    async fn test_apply_is_minimal_and_stable() {
        let (mut graph, mut store) = collapsed_pair().await;
        let config = EngineConfig::default();

        let mut tx = Transition::new(&mut graph, &mut store, &config);
        refresh_proxies(&mut tx).await.unwrap();
        let first = tx.into_report().proxies;
        assert_eq!(first.added.len(), 3);
        assert_eq!(graph.stats().draws, 1);

        let mut tx = Transition::new(&mut graph, &mut store, &config);
        refresh_proxies(&mut tx).await.unwrap();
        let second = tx.into_report().proxies;
        assert!(second.is_empty());
        assert_eq!(graph.stats().draws, 1);
    }

    #[tokio::test]
    async fn test_hidden_proxy_is_revealed_without_redraw() {
        let (mut graph, mut store) = collapsed_pair().await;
        let config = EngineConfig::default();
        let mut tx = Transition::new(&mut graph, &mut store, &config);
        refresh_proxies(&mut tx).await.unwrap();
        drop(tx);

        let id = ProxyKey::new("k1", "z").edge_id();
        graph.hide_elements(&[id.clone()], false).await.unwrap();

        let mut tx = Transition::new(&mut graph, &mut store, &config);
        refresh_proxies(&mut tx).await.unwrap();
        let diff = tx.into_report().proxies;
        assert_eq!(diff.revealed, vec![id.clone()]);
        assert!(!diff.is_structural());
        assert!(graph.is_visible(&id));
        assert_eq!(graph.stats().draws, 1);
    }

    #[tokio::test]
    async fn test_removed_when_combo_expands() {
        let (mut graph, mut store) = collapsed_pair().await;
        let config = EngineConfig::default();
        let mut tx = Transition::new(&mut graph, &mut store, &config);
        refresh_proxies(&mut tx).await.unwrap();
        drop(tx);

        store.release_combo("k1");
        store.release_combo("k2");
        let mut tx = Transition::new(&mut graph, &mut store, &config);
        refresh_proxies(&mut tx).await.unwrap();
        let diff = tx.into_report().proxies;

        assert_eq!(diff.removed.len(), 3);
        assert!(graph.proxy_edges().is_empty());
    }

    #[tokio::test]
    async fn test_redraw_never_changes_visibility() {
        let (graph, mut store) = collapsed_pair().await;
        let mut graph = graph.with_redraw_reveal(true);
        let config = EngineConfig::default();

        let mut tx = Transition::new(&mut graph, &mut store, &config);
        refresh_proxies(&mut tx).await.unwrap();
        let diff = tx.into_report().proxies;

        assert_eq!(diff.restored_after_redraw, 5);
        for id in ["x", "y", "x-y", "y-x", "x-z"] {
            assert!(!graph.is_visible(id), "{} leaked through redraw", id);
        }
    }
}
