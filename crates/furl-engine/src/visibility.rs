//! Combo auto-visibility.
//!
//! A combo the user did not collapse follows its members: hidden when
//! all of them are hidden, shown as soon as one is visible. A combo the
//! user collapsed stays visible as a placeholder, unless every member is
//! also covered by a DAG collapse, in which case it goes away with them
//! and comes back when that collapse is expanded.

use crate::error::Result;
use crate::transition::Transition;
use furl_graph::{GraphModel, ReachabilityWalker};
use tracing::debug;

pub(crate) async fn sync_combo_visibility<M: GraphModel>(tx: &mut Transition<'_, M>) -> Result<()> {
    let mut to_hide = Vec::new();
    let mut to_show = Vec::new();

    {
        let model = &*tx.model;
        let walker = ReachabilityWalker::new(model);
        let shadow = walker.shadow(tx.store.dag_collapsed());

        for combo in model.combos() {
            let members = model.combo_members(&combo.id);
            let should_show = if tx.store.has_record(&combo.id) {
                members.is_empty() || !members.iter().all(|m| shadow.contains(m))
            } else if members.is_empty() {
                continue;
            } else {
                members.iter().any(|m| model.is_visible(m))
            };

            let visible = combo.visibility.is_visible();
            if should_show && !visible {
                to_show.push(combo.id.clone());
            } else if !should_show && visible {
                to_hide.push(combo.id.clone());
            }
        }
    }

    if !to_hide.is_empty() || !to_show.is_empty() {
        debug!(
            "Combo auto-visibility: hiding {:?}, showing {:?}",
            to_hide, to_show
        );
    }
    tx.hide(to_hide).await?;
    tx.show(to_show).await
}
