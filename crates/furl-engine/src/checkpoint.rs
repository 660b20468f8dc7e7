//! Rollback of a transition that failed part way.
//!
//! Collapse state is committed before the awaited hide/show calls, since
//! later steps read it. If one of those calls fails, the state is put
//! back as it was so that re-issuing the same action starts from scratch
//! instead of finding the node already collapsed.

use crate::state::CollapseStateStore;
use crate::transition::Transition;
use furl_core::{ComboPatch, NodePatch, Visibility};
use furl_graph::GraphModel;
use tracing::warn;

struct Flags {
    id: String,
    collapsed: bool,
    badge: Option<usize>,
}

/// Collapse state and visibility captured before a transition.
pub(crate) struct Checkpoint {
    store: CollapseStateStore,
    nodes: Vec<Flags>,
    combos: Vec<Flags>,
    /// Real elements only. Proxies are rebuilt from the restored state.
    visibility: Vec<(String, Visibility)>,
}

impl Checkpoint {
    pub(crate) fn capture<M: GraphModel + ?Sized>(model: &M, store: &CollapseStateStore) -> Self {
        let nodes = model
            .nodes()
            .into_iter()
            .map(|n| Flags {
                id: n.id.clone(),
                collapsed: n.collapsed,
                badge: n.badge,
            })
            .collect();
        let combos = model
            .combos()
            .into_iter()
            .map(|c| Flags {
                id: c.id.clone(),
                collapsed: c.collapsed,
                badge: c.badge,
            })
            .collect();

        let mut visibility: Vec<(String, Visibility)> = model
            .nodes()
            .into_iter()
            .map(|n| (n.id.clone(), n.visibility))
            .collect();
        visibility.extend(
            model
                .edges()
                .into_iter()
                .filter(|e| !e.is_proxy)
                .map(|e| (e.id.clone(), e.visibility)),
        );
        visibility.extend(
            model
                .combos()
                .into_iter()
                .map(|c| (c.id.clone(), c.visibility)),
        );

        Self {
            store: store.clone(),
            nodes,
            combos,
            visibility,
        }
    }

    /// Puts the captured state back. Visibility and proxies are restored
    /// on a best-effort basis: the model already failed once, so further
    /// failures are logged rather than returned.
    pub(crate) async fn restore<M: GraphModel>(self, tx: &mut Transition<'_, M>) {
        *tx.store = self.store;

        for flags in &self.nodes {
            let changed = tx
                .model
                .node_data(&flags.id)
                .is_some_and(|n| n.collapsed != flags.collapsed || n.badge != flags.badge);
            if changed {
                tx.model.update_node_data(
                    &flags.id,
                    &NodePatch {
                        collapsed: Some(flags.collapsed),
                        badge: Some(flags.badge),
                    },
                );
            }
        }
        for flags in &self.combos {
            let changed = tx
                .model
                .combo_data(&flags.id)
                .is_some_and(|c| c.collapsed != flags.collapsed || c.badge != flags.badge);
            if changed {
                tx.model.update_combo_data(
                    &flags.id,
                    &ComboPatch {
                        collapsed: Some(flags.collapsed),
                        badge: Some(flags.badge),
                        ..ComboPatch::default()
                    },
                );
            }
        }

        let mut to_show = Vec::new();
        let mut to_hide = Vec::new();
        for (id, before) in self.visibility {
            match (before, tx.model.visibility(&id)) {
                (Visibility::Visible, Some(Visibility::Hidden)) => to_show.push(id),
                (Visibility::Hidden, Some(Visibility::Visible)) => to_hide.push(id),
                _ => {}
            }
        }
        if let Err(e) = tx.show(to_show).await {
            warn!("Rollback could not show elements again: {}", e);
        }
        if let Err(e) = tx.hide(to_hide).await {
            warn!("Rollback could not hide elements again: {}", e);
        }
        if let Err(e) = tx.settle().await {
            warn!("Rollback could not refresh proxies: {}", e);
        }
    }
}
