//! Port usage queries for the edge-creation interaction.

use crate::model::GraphModel;
use std::collections::BTreeMap;

/// Number of real edges attached to each port of `node_id`.
///
/// An edge counts against its source port when the node is the source
/// and against its target port when the node is the target. Edges
/// without a port key are not counted. Proxy edges never are.
pub fn port_connections<M: GraphModel + ?Sized>(model: &M, node_id: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for edge in model.edges() {
        if edge.is_proxy {
            continue;
        }
        if edge.source == node_id {
            if let Some(key) = &edge.source_port {
                *counts.entry(key.clone()).or_insert(0) += 1;
            }
        }
        if edge.target == node_id {
            if let Some(key) = &edge.target_port {
                *counts.entry(key.clone()).or_insert(0) += 1;
            }
        }
    }
    counts
}
