//! Partial updates applied through the model's update methods.
//!
//! A `None` field leaves the target untouched.

use crate::combo::Combo;
use crate::edge::{CurveStyle, Edge};
use crate::geometry::{Bounds, Point};
use crate::node::Node;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    pub collapsed: Option<bool>,
    pub badge: Option<Option<usize>>,
}

impl NodePatch {
    /// Marks a node collapsed with `hidden` descendants behind it.
    pub fn collapsed(hidden: usize) -> Self {
        Self {
            collapsed: Some(true),
            badge: Some(Some(hidden)),
        }
    }

    pub fn expanded() -> Self {
        Self {
            collapsed: Some(false),
            badge: Some(None),
        }
    }

    pub fn apply(&self, node: &mut Node) {
        if let Some(collapsed) = self.collapsed {
            node.collapsed = collapsed;
        }
        if let Some(badge) = self.badge {
            node.badge = badge;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgePatch {
    pub curve: Option<CurveStyle>,
}

impl EdgePatch {
    pub fn apply(&self, edge: &mut Edge) {
        if let Some(curve) = self.curve {
            edge.curve = curve;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComboPatch {
    pub collapsed: Option<bool>,
    pub badge: Option<Option<usize>>,
    pub bounds: Option<Bounds>,
    pub content_center: Option<Point>,
}

impl ComboPatch {
    /// Collapsed placeholder; the badge is omitted when nothing new was hidden.
    pub fn collapsed(hidden: usize) -> Self {
        Self {
            collapsed: Some(true),
            badge: Some((hidden > 0).then_some(hidden)),
            ..Self::default()
        }
    }

    pub fn expanded() -> Self {
        Self {
            collapsed: Some(false),
            badge: Some(None),
            ..Self::default()
        }
    }

    pub fn apply(&self, combo: &mut Combo) {
        if let Some(collapsed) = self.collapsed {
            combo.collapsed = collapsed;
        }
        if let Some(badge) = self.badge {
            combo.badge = badge;
        }
        if let Some(bounds) = self.bounds {
            combo.bounds = Some(bounds);
        }
        if let Some(center) = self.content_center {
            combo.content_center = Some(center);
        }
    }
}
