//! Re-enforcement of combo collapse snapshots.
//!
//! Expanding a DAG collapse shows every descendant and clears their own
//! collapse flags. Members of a still-collapsed combo, and nested
//! collapses that combo snapshotted, must survive that. This pass puts
//! them back.

use crate::error::Result;
use crate::transition::Transition;
use furl_core::NodePatch;
use furl_graph::{GraphModel, ReachabilityWalker};
use std::collections::BTreeSet;
use tracing::debug;

/// Reapplies the records of `combo_ids`. Returns how many ids were
/// hidden again.
///
/// For each record: its DAG-collapsed members go back into the DAG set
/// with their node flag, members and edges it owns are hidden again, and
/// the descendants of those DAG-collapsed members outside the combo are
/// hidden again.
pub(crate) async fn reapply_records<M: GraphModel>(
    tx: &mut Transition<'_, M>,
    combo_ids: &[String],
) -> Result<usize> {
    let mut to_hide = BTreeSet::new();
    let mut restored = Vec::new();

    {
        let model = &*tx.model;
        for combo_id in combo_ids {
            let Some(record) = tx.store.combo_record(combo_id) else {
                continue;
            };
            to_hide.extend(record.held().filter(|id| model.is_visible(id)).cloned());
            restored.extend(
                record
                    .dag_collapsed_members
                    .iter()
                    .filter(|m| model.node_data(m).is_some())
                    .map(|m| (m.clone(), record.members.clone())),
            );
        }
    }

    let (external_hides, counts) = {
        let model = &*tx.model;
        let walker = ReachabilityWalker::new(model);
        let mut hides = BTreeSet::new();
        for (member, combo_members) in &restored {
            let external: BTreeSet<String> = walker
                .descendants(member)
                .into_iter()
                .filter(|d| !combo_members.contains(d))
                .collect();
            hides.extend(walker.edges_touching(&external));
            hides.extend(external);
        }
        let counts: Vec<(String, usize)> = restored
            .iter()
            .map(|(member, _)| (member.clone(), walker.descendants(member).len()))
            .collect();
        (hides, counts)
    };

    for (member, count) in counts {
        if tx.store.toggle_dag(&member, true) {
            debug!("Restored nested collapse of {}", member);
        }
        tx.model.update_node_data(&member, &NodePatch::collapsed(count));
    }

    to_hide.extend(external_hides);
    let targets: Vec<String> = to_hide
        .into_iter()
        .filter(|id| tx.model.is_visible(id))
        .collect();
    let rehidden = targets.len();
    tx.hide(targets).await?;
    Ok(rehidden)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::state::CollapseStateStore;
    use furl_core::{Combo, Edge, Node};
    use furl_graph::MemoryGraph;

    /// K = {n, m}, n → o with o outside K, n DAG-collapsed and K collapsed.
    fn collapsed_fixture() -> (MemoryGraph, CollapseStateStore) {
        let mut graph = MemoryGraph::new();
        graph.add_combo(Combo::new("k")).unwrap();
        graph.add_node(Node::new("n").in_combo("k").hidden()).unwrap();
        graph.add_node(Node::new("m").in_combo("k").hidden()).unwrap();
        graph.add_node(Node::new("o").hidden()).unwrap();
        graph.add_edge(Edge::new("n-o", "n", "o").hidden()).unwrap();

        let mut store = CollapseStateStore::new();
        store.toggle_dag("n", true);
        store.snapshot_combo(
            "k",
            ["n".to_string(), "m".to_string()].into(),
            ["n-o".to_string()].into(),
            |id| id == "n-o",
        );
        (graph, store)
    }

    #[tokio::test]
    async fn test_rehides_leaked_members_and_external_descendants() {
        let (mut graph, mut store) = collapsed_fixture();
        // Simulate an ancestor expand that revealed everything and
        // cleared the nested collapse.
        graph
            .show_elements(&["n".to_string(), "m".to_string(), "o".to_string()], false)
            .await
            .unwrap();
        store.toggle_dag("n", false);

        let config = EngineConfig::default();
        let mut tx = Transition::new(&mut graph, &mut store, &config);
        let rehidden = reapply_records(&mut tx, &["k".to_string()]).await.unwrap();
        drop(tx);

        assert_eq!(rehidden, 3);
        assert!(store.is_dag_collapsed("n"));
        assert!(!graph.is_visible("n"));
        assert!(!graph.is_visible("m"));
        assert!(!graph.is_visible("o"));
        let n = graph.node_data("n").unwrap();
        assert!(n.collapsed);
        assert_eq!(n.badge, Some(1));
    }

    #[tokio::test]
    async fn test_consistent_state_is_left_alone() {
        let (mut graph, mut store) = collapsed_fixture();
        let flips = graph.stats().visibility_flips;

        let config = EngineConfig::default();
        let mut tx = Transition::new(&mut graph, &mut store, &config);
        let rehidden = reapply_records(&mut tx, &["k".to_string(), "gone".to_string()])
            .await
            .unwrap();
        let report = tx.into_report();

        assert_eq!(rehidden, 0);
        assert!(report.hidden.is_empty());
        assert_eq!(graph.stats().visibility_flips, flips);
    }
}
