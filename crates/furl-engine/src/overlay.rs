//! Overlay membership (hulls, bubble sets and the like).
//!
//! An overlay outlines a group of elements. When some of them get hidden
//! inside a collapsed combo, the overlay should outline the combo
//! instead, and when they come back it should outline them again. The
//! engine only needs to read and write the member list, so overlays are
//! reached through [`OverlayMembership`].

use crate::proxy::resolve_endpoint;
use crate::state::CollapseStateStore;
use furl_graph::GraphModel;
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

/// Member list access for an overlay drawn on top of the graph.
pub trait OverlayMembership: Send {
    fn members(&self) -> Vec<String>;
    fn set_members(&mut self, ids: Vec<String>);
}

struct OverlayEntry {
    /// Members as declared at registration, before any substitution.
    declared: Vec<String>,
    overlay: Box<dyn OverlayMembership>,
}

/// Registered overlays, keyed by name.
#[derive(Default)]
pub struct OverlayRegistry {
    entries: IndexMap<String, OverlayEntry>,
}

impl OverlayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an overlay, remembering its current members as the
    /// declared ones. Replaces any overlay registered under `name`.
    pub fn register(&mut self, name: impl Into<String>, overlay: Box<dyn OverlayMembership>) {
        let declared = overlay.members();
        self.entries
            .insert(name.into(), OverlayEntry { declared, overlay });
    }

    pub fn unregister(&mut self, name: &str) -> Option<Box<dyn OverlayMembership>> {
        self.entries.shift_remove(name).map(|entry| entry.overlay)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current member list of an overlay.
    pub fn members(&self, name: &str) -> Option<Vec<String>> {
        self.entries.get(name).map(|entry| entry.overlay.members())
    }

    /// Maps every declared member to where it is drawn now and pushes the
    /// result to overlays whose list changed. Members with no drawable
    /// stand-in are dropped; duplicates collapse to their first position.
    /// Returns how many overlays were updated.
    pub fn refresh<M: GraphModel + ?Sized>(&mut self, model: &M, store: &CollapseStateStore) -> usize {
        let mut updated = 0;
        for (name, entry) in self.entries.iter_mut() {
            let resolved: IndexSet<String> = entry
                .declared
                .iter()
                .filter_map(|id| resolve_endpoint(model, store, id))
                .collect();
            let resolved: Vec<String> = resolved.into_iter().collect();
            if resolved != entry.overlay.members() {
                debug!("Overlay {} now spans {} elements", name, resolved.len());
                entry.overlay.set_members(resolved);
                updated += 1;
            }
        }
        updated
    }
}

impl std::fmt::Debug for OverlayRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayRegistry")
            .field("overlays", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}
