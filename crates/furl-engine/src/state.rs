//! Collapse state owned by one graph session.
//!
//! Two independent mechanisms hide elements: DAG collapse (per node) and
//! combo collapse (per combo). The store remembers which nodes are
//! DAG-collapsed and, for each collapsed combo, a snapshot taken at
//! collapse time so expanding it restores exactly what it hid.

use std::collections::{BTreeMap, BTreeSet};

/// Snapshot taken when a combo collapses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComboCollapseRecord {
    /// Member and edge ids that were already hidden for other reasons.
    pub already_hidden: BTreeSet<String>,
    /// Members this collapse hid itself. Drives the "+N" badge.
    pub hidden_count: usize,
    /// Members that were DAG-collapsed at collapse time.
    pub dag_collapsed_members: BTreeSet<String>,
    pub members: BTreeSet<String>,
    /// Real edges touching at least one member.
    pub connected_edges: BTreeSet<String>,
}

impl ComboCollapseRecord {
    /// Ids this collapse keeps hidden.
    pub fn held(&self) -> impl Iterator<Item = &String> + '_ {
        self.members
            .iter()
            .chain(self.connected_edges.iter())
            .filter(|id| !self.already_hidden.contains(*id))
    }

    pub fn holds(&self, id: &str) -> bool {
        (self.members.contains(id) || self.connected_edges.contains(id))
            && !self.already_hidden.contains(id)
    }

    /// Takes over a member that was hidden for another reason when that
    /// reason goes away while the combo is still collapsed. Returns false
    /// if the member was already owned.
    pub fn adopt(&mut self, member: &str) -> bool {
        if self.members.contains(member) && self.already_hidden.remove(member) {
            self.hidden_count += 1;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CollapseStateStore {
    dag_collapsed: BTreeSet<String>,
    combo_records: BTreeMap<String, ComboCollapseRecord>,
}

impl CollapseStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the DAG-collapse flag of a node. Returns true if it changed.
    pub fn toggle_dag(&mut self, node_id: &str, collapsed: bool) -> bool {
        if collapsed {
            self.dag_collapsed.insert(node_id.to_string())
        } else {
            self.dag_collapsed.remove(node_id)
        }
    }

    pub fn is_dag_collapsed(&self, node_id: &str) -> bool {
        self.dag_collapsed.contains(node_id)
    }

    pub fn dag_collapsed(&self) -> &BTreeSet<String> {
        &self.dag_collapsed
    }

    /// Records a combo collapse.
    ///
    /// `is_hidden` reports the current visibility of members and edges.
    /// Returns `None` if the combo is already collapsed.
    pub fn snapshot_combo(
        &mut self,
        combo_id: &str,
        members: BTreeSet<String>,
        connected_edges: BTreeSet<String>,
        is_hidden: impl Fn(&str) -> bool,
    ) -> Option<&ComboCollapseRecord> {
        if self.combo_records.contains_key(combo_id) {
            return None;
        }

        let already_hidden: BTreeSet<String> = members
            .iter()
            .chain(connected_edges.iter())
            .filter(|id| is_hidden(id))
            .cloned()
            .collect();
        let hidden_count = members
            .iter()
            .filter(|m| !already_hidden.contains(*m))
            .count();
        let dag_collapsed_members = members
            .iter()
            .filter(|m| self.dag_collapsed.contains(*m))
            .cloned()
            .collect();

        let record = ComboCollapseRecord {
            already_hidden,
            hidden_count,
            dag_collapsed_members,
            members,
            connected_edges,
        };
        Some(
            self.combo_records
                .entry(combo_id.to_string())
                .or_insert(record),
        )
    }

    /// Removes and returns the record of a collapsed combo.
    pub fn release_combo(&mut self, combo_id: &str) -> Option<ComboCollapseRecord> {
        self.combo_records.remove(combo_id)
    }

    pub fn combo_record(&self, combo_id: &str) -> Option<&ComboCollapseRecord> {
        self.combo_records.get(combo_id)
    }

    pub fn has_record(&self, combo_id: &str) -> bool {
        self.combo_records.contains_key(combo_id)
    }

    pub fn records(&self) -> impl Iterator<Item = (&String, &ComboCollapseRecord)> {
        self.combo_records.iter()
    }

    pub(crate) fn records_mut(
        &mut self,
    ) -> impl Iterator<Item = (&String, &mut ComboCollapseRecord)> {
        self.combo_records.iter_mut()
    }

    /// Every id currently held hidden by some combo collapse.
    pub fn held_by_combos(&self) -> BTreeSet<String> {
        self.combo_records
            .values()
            .flat_map(|record| record.held().cloned())
            .collect()
    }

    /// Drops state for elements that no longer exist in the model.
    pub fn prune(&mut self, exists: impl Fn(&str) -> bool) {
        self.dag_collapsed.retain(|id| exists(id));
        self.combo_records.retain(|id, _| exists(id));
    }
}
