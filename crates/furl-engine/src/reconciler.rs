//! Collapse and expand transitions.
//!
//! Each function takes the session state for one transition, returns
//! `Ok(false)` when the request is a no-op, and otherwise leaves the
//! model consistent: visibility applied, combo auto-visibility updated,
//! combo bounds recomputed and proxy edges patched.
//!
//! # DAG collapse
//!
//! ```text
//!   Expanded ──collapse_node──▶ Collapsed
//!      ▲                            │
//!      └────────expand_node─────────┘
//! ```
//!
//! Collapsing hides every descendant and the edges touching them.
//! Expanding clears the collapse flag of the node *and of every
//! descendant*, then reveals the descendants nothing else keeps hidden:
//! another DAG collapse still covering them, or a collapsed combo.
//!
//! # Combo collapse
//!
//! Collapsing a combo snapshots what was already hidden among its
//! members and connected edges, then hides the rest. Expanding restores
//! exactly what the collapse itself hid.

use crate::error::Result;
use crate::reapply::reapply_records;
use crate::transition::Transition;
use crate::visibility::sync_combo_visibility;
use furl_core::{ComboPatch, NodePatch};
use furl_graph::{GraphModel, ReachabilityWalker};
use std::collections::BTreeSet;
use tracing::debug;

/// Collapses `node_id`, hiding everything reachable from it.
pub(crate) async fn collapse_node<M: GraphModel>(
    tx: &mut Transition<'_, M>,
    node_id: &str,
) -> Result<bool> {
    if tx.model.node_data(node_id).is_none() {
        debug!("Collapse of unknown node {} ignored", node_id);
        return Ok(false);
    }
    if tx.store.is_dag_collapsed(node_id) {
        return Ok(false);
    }

    let (descendants, edges) = {
        let walker = ReachabilityWalker::new(&*tx.model);
        (walker.descendants(node_id), walker.descendant_edges(node_id))
    };
    if descendants.is_empty() {
        return Ok(false);
    }

    tx.store.toggle_dag(node_id, true);
    tx.model
        .update_node_data(node_id, &NodePatch::collapsed(descendants.len()));

    debug!(
        "Collapsing {}: {} descendants, {} edges",
        node_id,
        descendants.len(),
        edges.len()
    );
    tx.hide(descendants.into_iter().chain(edges)).await?;
    sync_combo_visibility(tx).await?;
    tx.settle().await?;
    Ok(true)
}

/// Expands `node_id`.
pub(crate) async fn expand_node<M: GraphModel>(
    tx: &mut Transition<'_, M>,
    node_id: &str,
) -> Result<bool> {
    if tx.model.node_data(node_id).is_none() {
        debug!("Expand of unknown node {} ignored", node_id);
        return Ok(false);
    }
    if !tx.store.is_dag_collapsed(node_id) {
        return Ok(false);
    }

    let (descendants, edges) = {
        let walker = ReachabilityWalker::new(&*tx.model);
        (walker.descendants(node_id), walker.descendant_edges(node_id))
    };

    // Expanding clears the whole subtree.
    tx.store.toggle_dag(node_id, false);
    tx.model.update_node_data(node_id, &NodePatch::expanded());
    for id in &descendants {
        if tx.store.toggle_dag(id, false) {
            tx.model.update_node_data(id, &NodePatch::expanded());
        }
    }

    // Descendants another DAG collapse still covers stay hidden.
    let shadow = {
        let walker = ReachabilityWalker::new(&*tx.model);
        walker.shadow(tx.store.dag_collapsed())
    };

    // Members of a collapsed combo that this collapse was hiding now
    // belong to the combo, so expanding the combo brings them back.
    let mut adopted = Vec::new();
    for (combo_id, record) in tx.store.records_mut() {
        let mut changed = false;
        for id in descendants.iter().filter(|id| !shadow.contains(*id)) {
            changed |= record.adopt(id);
        }
        if changed {
            adopted.push((combo_id.clone(), record.hidden_count));
        }
    }
    for (combo_id, hidden_count) in &adopted {
        tx.model
            .update_combo_data(combo_id, &ComboPatch::collapsed(*hidden_count));
    }

    let held = tx.store.held_by_combos();
    let reveal: Vec<String> = descendants
        .iter()
        .filter(|id| !shadow.contains(*id) && !held.contains(*id))
        .cloned()
        .collect();
    debug!(
        "Expanding {}: revealing {} of {} descendants",
        node_id,
        reveal.len(),
        descendants.len()
    );
    tx.show(reveal).await?;

    let edges_to_show: Vec<String> = edges
        .iter()
        .filter(|id| !held.contains(*id) && tx.endpoints_visible(id))
        .cloned()
        .collect();
    tx.show(edges_to_show).await?;

    sync_combo_visibility(tx).await?;

    let affected: Vec<String> = tx
        .store
        .records()
        .filter(|(_, record)| {
            record
                .dag_collapsed_members
                .iter()
                .chain(record.members.iter())
                .any(|m| descendants.contains(m))
        })
        .map(|(combo_id, _)| combo_id.clone())
        .collect();
    if !affected.is_empty() {
        let rehidden = reapply_records(tx, &affected).await?;
        debug!("Reapplied {} combo records, {} ids hidden again", affected.len(), rehidden);
    }

    tx.settle().await?;
    Ok(true)
}

/// Collapses `combo_id`, hiding its members and their edges.
pub(crate) async fn collapse_combo<M: GraphModel>(
    tx: &mut Transition<'_, M>,
    combo_id: &str,
) -> Result<bool> {
    if tx.model.combo_data(combo_id).is_none() {
        debug!("Collapse of unknown combo {} ignored", combo_id);
        return Ok(false);
    }
    if tx.store.has_record(combo_id) {
        return Ok(false);
    }

    let (members, connected): (BTreeSet<String>, BTreeSet<String>) = {
        let walker = ReachabilityWalker::new(&*tx.model);
        let members: BTreeSet<String> = tx.model.combo_members(combo_id).into_iter().collect();
        let connected = walker.edges_touching(&members);
        (members, connected)
    };

    let (held, hidden_count) = {
        let model = &*tx.model;
        let Some(record) = tx
            .store
            .snapshot_combo(combo_id, members, connected, |id| !model.is_visible(id))
        else {
            return Ok(false);
        };
        (
            record.held().cloned().collect::<Vec<_>>(),
            record.hidden_count,
        )
    };

    debug!("Collapsing combo {}: hiding {} members", combo_id, hidden_count);
    tx.model
        .update_combo_data(combo_id, &ComboPatch::collapsed(hidden_count));
    tx.hide(held).await?;
    sync_combo_visibility(tx).await?;
    tx.settle().await?;
    Ok(true)
}

/// Expands `combo_id`, restoring what its collapse hid.
pub(crate) async fn expand_combo<M: GraphModel>(
    tx: &mut Transition<'_, M>,
    combo_id: &str,
) -> Result<bool> {
    let Some(record) = tx.store.release_combo(combo_id) else {
        return Ok(false);
    };
    if tx.model.combo_data(combo_id).is_none() {
        debug!("Dropped record of vanished combo {}", combo_id);
        return Ok(false);
    }

    // Nested collapses the combo snapshotted come back first, so the
    // reveal below leaves their descendants hidden.
    let restored: Vec<(String, usize)> = {
        let walker = ReachabilityWalker::new(&*tx.model);
        record
            .dag_collapsed_members
            .iter()
            .filter(|m| tx.model.node_data(m).is_some())
            .map(|m| (m.clone(), walker.descendants(m).len()))
            .collect()
    };
    for (member, count) in &restored {
        tx.store.toggle_dag(member, true);
        tx.model
            .update_node_data(member, &NodePatch::collapsed(*count));
    }

    let (shadow, member_edges) = {
        let walker = ReachabilityWalker::new(&*tx.model);
        (
            walker.shadow(tx.store.dag_collapsed()),
            walker.edges_touching(&record.members),
        )
    };

    let reveal: Vec<String> = record
        .members
        .iter()
        .filter(|m| !record.already_hidden.contains(*m) && !shadow.contains(*m))
        .cloned()
        .collect();
    debug!(
        "Expanding combo {}: revealing {} of {} members",
        combo_id,
        reveal.len(),
        record.members.len()
    );
    tx.show(reveal).await?;

    let edges_to_show: Vec<String> = record
        .connected_edges
        .iter()
        .filter(|e| !record.already_hidden.contains(*e) && tx.endpoints_visible(e))
        .cloned()
        .collect();
    tx.show(edges_to_show).await?;

    // Descendants of still-collapsed members outside the combo may have
    // been revealed by an ancestor expand in the meantime.
    let external: Vec<String> = {
        let walker = ReachabilityWalker::new(&*tx.model);
        let outside: BTreeSet<String> = restored
            .iter()
            .flat_map(|(member, _)| walker.descendants(member))
            .filter(|d| !record.members.contains(d))
            .collect();
        walker
            .edges_touching(&outside)
            .into_iter()
            .chain(outside)
            .collect()
    };
    tx.hide(external).await?;

    // Edges hidden through another combo's snapshot are not in this
    // record; show any whose endpoints are both back.
    let stragglers: Vec<String> = member_edges
        .into_iter()
        .filter(|e| !tx.model.is_visible(e) && tx.endpoints_visible(e))
        .collect();
    tx.show(stragglers).await?;

    tx.model.update_combo_data(combo_id, &ComboPatch::expanded());
    sync_combo_visibility(tx).await?;
    tx.settle().await?;
    Ok(true)
}
