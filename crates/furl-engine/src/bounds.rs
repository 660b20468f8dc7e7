//! Combo geometry refresh.
//!
//! Renderers size a combo from all of its members, hidden or not. After
//! a collapse that leaves a combo with stale geometry, so this pass
//! recomputes it from what is actually on screen.

use crate::config::EngineConfig;
use crate::state::CollapseStateStore;
use furl_core::{Bounds, ComboPatch};
use furl_graph::GraphModel;

/// Recomputes the bounds of every visible combo. Returns how many combos
/// were updated.
///
/// An expanded combo with visible members wraps them (plus padding) and
/// caches their center. A collapsed combo, or one with no visible
/// member, becomes a placeholder square around the cached center.
pub fn refresh_bounds<M: GraphModel + ?Sized>(
    model: &mut M,
    store: &CollapseStateStore,
    config: &EngineConfig,
) -> usize {
    let mut patches = Vec::new();

    for combo in model.combos() {
        if combo.visibility.is_hidden() {
            continue;
        }

        let members = model.combo_members(&combo.id);
        let visible_bounds = members
            .iter()
            .filter(|m| model.is_visible(m))
            .filter_map(|m| model.element_bounds(m))
            .reduce(|acc, b| acc.union(&b));

        let patch = match visible_bounds {
            Some(content) if !store.has_record(&combo.id) => ComboPatch {
                bounds: Some(content.padded(&config.combo_padding)),
                content_center: Some(content.center()),
                ..ComboPatch::default()
            },
            _ => {
                let center = combo
                    .content_center
                    .or_else(|| combo.bounds.map(|b| b.center()))
                    .or_else(|| {
                        members
                            .iter()
                            .filter_map(|m| model.element_bounds(m))
                            .reduce(|acc, b| acc.union(&b))
                            .map(|b| b.center())
                    })
                    .unwrap_or_default();
                let size = config.collapsed_combo_size;
                ComboPatch {
                    bounds: Some(Bounds::around(center, size, size)),
                    content_center: Some(center),
                    ..ComboPatch::default()
                }
            }
        };

        if patch.bounds != combo.bounds || patch.content_center != combo.content_center {
            patches.push((combo.id.clone(), patch));
        }
    }

    let updated = patches.len();
    for (id, patch) in patches {
        model.update_combo_data(&id, &patch);
    }
    updated
}
