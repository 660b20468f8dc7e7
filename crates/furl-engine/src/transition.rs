//! One reconciliation pass and what it changed.

use crate::bounds::refresh_bounds;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::proxy::{refresh_proxies, ProxyDiff};
use crate::state::CollapseStateStore;
use furl_core::Visibility;
use furl_graph::GraphModel;
use std::collections::BTreeSet;

/// Net visibility change of one transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionReport {
    /// Ids that ended up hidden.
    pub hidden: BTreeSet<String>,
    /// Ids that ended up shown.
    pub shown: BTreeSet<String>,
    pub proxies: ProxyDiff,
    /// Combos whose geometry was recomputed.
    pub combos_resized: usize,
}

impl TransitionReport {
    /// True when nothing observable changed.
    pub fn is_empty(&self) -> bool {
        self.hidden.is_empty() && self.shown.is_empty() && self.proxies.is_empty()
    }
}

/// Result of a collapse or expand request.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    Applied(TransitionReport),
    /// The request was a no-op (already in the requested state, stale
    /// id, or nothing to hide).
    Unchanged,
    /// Another transition was in flight; the request was dropped.
    Rejected,
}

impl TransitionOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TransitionOutcome::Applied(_))
    }

    pub fn report(&self) -> Option<&TransitionReport> {
        match self {
            TransitionOutcome::Applied(report) => Some(report),
            _ => None,
        }
    }
}

/// Borrowed session state for the duration of one transition.
pub(crate) struct Transition<'a, M: GraphModel> {
    pub(crate) model: &'a mut M,
    pub(crate) store: &'a mut CollapseStateStore,
    pub(crate) config: &'a EngineConfig,
    pub(crate) report: TransitionReport,
}

impl<'a, M: GraphModel> Transition<'a, M> {
    pub(crate) fn new(
        model: &'a mut M,
        store: &'a mut CollapseStateStore,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            model,
            store,
            config,
            report: TransitionReport::default(),
        }
    }

    /// Hides the currently visible ids among `ids`. Unknown ids are skipped.
    pub(crate) async fn hide(&mut self, ids: impl IntoIterator<Item = String>) -> Result<()> {
        let targets: Vec<String> = ids
            .into_iter()
            .filter(|id| self.model.visibility(id) == Some(Visibility::Visible))
            .collect();
        if targets.is_empty() {
            return Ok(());
        }

        self.model.hide_elements(&targets, self.config.animate).await?;
        for id in targets {
            if !self.report.shown.remove(&id) {
                self.report.hidden.insert(id);
            }
        }
        Ok(())
    }

    /// Shows the currently hidden ids among `ids`. Unknown ids are skipped.
    pub(crate) async fn show(&mut self, ids: impl IntoIterator<Item = String>) -> Result<()> {
        let targets: Vec<String> = ids
            .into_iter()
            .filter(|id| self.model.visibility(id) == Some(Visibility::Hidden))
            .collect();
        if targets.is_empty() {
            return Ok(());
        }

        self.model.show_elements(&targets, self.config.animate).await?;
        for id in targets {
            if !self.report.hidden.remove(&id) {
                self.report.shown.insert(id);
            }
        }
        Ok(())
    }

    /// True when the edge exists and both its endpoints are visible.
    pub(crate) fn endpoints_visible(&self, edge_id: &str) -> bool {
        self.model
            .edge_data(edge_id)
            .is_some_and(|e| self.model.is_visible(&e.source) && self.model.is_visible(&e.target))
    }

    /// Bounds refresh followed by proxy refresh. Each step reads the
    /// state the previous one committed.
    pub(crate) async fn settle(&mut self) -> Result<()> {
        self.report.combos_resized += refresh_bounds(&mut *self.model, &*self.store, self.config);
        refresh_proxies(self).await
    }

    pub(crate) fn into_report(self) -> TransitionReport {
        self.report
    }
}
