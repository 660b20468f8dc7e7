//! Graph session: the entry point for collapse controls.

use crate::action::Action;
use crate::checkpoint::Checkpoint;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::overlay::{OverlayMembership, OverlayRegistry};
use crate::reconciler;
use crate::state::CollapseStateStore;
use crate::transition::{Transition, TransitionOutcome};
use furl_graph::{port_connections, GraphModel, ReachabilityWalker};
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

struct SessionState<M> {
    model: M,
    store: CollapseStateStore,
    overlays: OverlayRegistry,
}

/// Owns a graph model and its collapse state.
///
/// Only one transition runs at a time. A request that arrives while
/// another is still settling is dropped and reported as
/// [`TransitionOutcome::Rejected`]; re-issuing it later is safe because
/// every transition is idempotent.
pub struct CollapseSession<M: GraphModel> {
    config: EngineConfig,
    state: Mutex<SessionState<M>>,
}

impl<M: GraphModel> CollapseSession<M> {
    pub fn new(model: M) -> Self {
        Self::with_config(model, EngineConfig::default())
    }

    pub fn with_config(model: M, config: EngineConfig) -> Self {
        Self {
            config,
            state: Mutex::new(SessionState {
                model,
                store: CollapseStateStore::new(),
                overlays: OverlayRegistry::new(),
            }),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub async fn collapse_node(&self, node_id: &str) -> Result<TransitionOutcome> {
        self.apply(Action::CollapseNode(node_id.to_string())).await
    }

    pub async fn expand_node(&self, node_id: &str) -> Result<TransitionOutcome> {
        self.apply(Action::ExpandNode(node_id.to_string())).await
    }

    pub async fn toggle_node(&self, node_id: &str) -> Result<TransitionOutcome> {
        self.apply(Action::ToggleNode(node_id.to_string())).await
    }

    pub async fn collapse_combo(&self, combo_id: &str) -> Result<TransitionOutcome> {
        self.apply(Action::CollapseCombo(combo_id.to_string())).await
    }

    pub async fn expand_combo(&self, combo_id: &str) -> Result<TransitionOutcome> {
        self.apply(Action::ExpandCombo(combo_id.to_string())).await
    }

    pub async fn toggle_combo(&self, combo_id: &str) -> Result<TransitionOutcome> {
        self.apply(Action::ToggleCombo(combo_id.to_string())).await
    }

    /// Runs one transition.
    pub async fn apply(&self, action: Action) -> Result<TransitionOutcome> {
        let Ok(mut guard) = self.state.try_lock() else {
            debug!("Dropped {}: a transition is in flight", action);
            return Ok(TransitionOutcome::Rejected);
        };
        let SessionState {
            model,
            store,
            overlays,
        } = &mut *guard;

        store.prune(|id| model.element_type(id).is_some());

        let checkpoint = Checkpoint::capture(&*model, &*store);
        let mut tx = Transition::new(model, store, &self.config);
        let result = match &action {
            Action::CollapseNode(id) => reconciler::collapse_node(&mut tx, id).await,
            Action::ExpandNode(id) => reconciler::expand_node(&mut tx, id).await,
            Action::ToggleNode(id) => {
                if tx.store.is_dag_collapsed(id) {
                    reconciler::expand_node(&mut tx, id).await
                } else {
                    reconciler::collapse_node(&mut tx, id).await
                }
            }
            Action::CollapseCombo(id) => reconciler::collapse_combo(&mut tx, id).await,
            Action::ExpandCombo(id) => reconciler::expand_combo(&mut tx, id).await,
            Action::ToggleCombo(id) => {
                if tx.store.has_record(id) {
                    reconciler::expand_combo(&mut tx, id).await
                } else {
                    reconciler::collapse_combo(&mut tx, id).await
                }
            }
        };
        let changed = match result {
            Ok(changed) => changed,
            Err(e) => {
                warn!("{} failed, rolling back: {}", action, e);
                checkpoint.restore(&mut tx).await;
                return Err(e);
            }
        };
        let report = tx.into_report();

        if !changed {
            debug!("{}: nothing to do", action);
            return Ok(TransitionOutcome::Unchanged);
        }

        let overlays_updated = overlays.refresh(&*model, &*store);
        debug!(
            "{}: hid {}, showed {}, proxies +{} -{}, overlays {}",
            action,
            report.hidden.len(),
            report.shown.len(),
            report.proxies.added.len(),
            report.proxies.removed.len(),
            overlays_updated
        );
        Ok(TransitionOutcome::Applied(report))
    }

    /// Collapses every node configured to start collapsed, in model
    /// order. Returns how many were collapsed.
    pub async fn apply_initial_collapses(&self) -> Result<usize> {
        let pending: Vec<String> = self
            .inspect(|model, _| {
                model
                    .nodes()
                    .into_iter()
                    .filter(|n| n.starts_collapsed())
                    .map(|n| n.id.clone())
                    .collect()
            })
            .await;

        let mut collapsed = 0;
        for id in pending {
            if self.collapse_node(&id).await?.is_applied() {
                collapsed += 1;
            }
        }
        if collapsed > 0 {
            info!("Collapsed {} nodes on load", collapsed);
        }
        Ok(collapsed)
    }

    /// True when `node_id` has at least one descendant, so a collapse
    /// button makes sense.
    pub async fn is_collapsible(&self, node_id: &str) -> bool {
        self.inspect(|model, _| ReachabilityWalker::new(model).has_descendants(node_id))
            .await
    }

    /// Edges attached to each port of `node_id`.
    pub async fn query_port_connections(&self, node_id: &str) -> BTreeMap<String, usize> {
        self.inspect(|model, _| port_connections(model, node_id))
            .await
    }

    /// Registers an overlay and maps its members right away.
    pub async fn register_overlay(
        &self,
        name: impl Into<String>,
        overlay: Box<dyn OverlayMembership>,
    ) {
        let mut guard = self.state.lock().await;
        let SessionState {
            model,
            store,
            overlays,
        } = &mut *guard;
        overlays.register(name, overlay);
        overlays.refresh(&*model, &*store);
    }

    /// Reads the model and collapse state. Waits for a running
    /// transition to finish.
    pub async fn inspect<R>(&self, f: impl FnOnce(&M, &CollapseStateStore) -> R) -> R {
        let guard = self.state.lock().await;
        f(&guard.model, &guard.store)
    }

    /// Edits the model outside of any transition, e.g. to delete
    /// elements. Collapse state referring to removed ids is dropped at
    /// the start of the next transition.
    pub async fn edit_model<R>(&self, f: impl FnOnce(&mut M) -> R) -> R {
        let mut guard = self.state.lock().await;
        f(&mut guard.model)
    }

    pub fn into_model(self) -> M {
        self.state.into_inner().model
    }
}
