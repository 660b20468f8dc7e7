//! Combo (grouping container) records.
//!
//! Membership is not stored here: a combo's members are the nodes whose
//! `combo` field names it.

use crate::geometry::{Bounds, Point};
use crate::Visibility;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combo {
    pub id: String,

    #[serde(default)]
    pub visibility: Visibility,

    /// Set while the user keeps this combo collapsed.
    #[serde(default)]
    pub collapsed: bool,

    /// Count shown as "+N" while collapsed.
    #[serde(default)]
    pub badge: Option<usize>,

    /// Current geometry, recomputed from visible members.
    #[serde(default)]
    pub bounds: Option<Bounds>,

    /// Last known center of the members. Used to place the combo when
    /// every member is hidden so it does not jump to the origin.
    #[serde(default)]
    pub content_center: Option<Point>,
}

impl Combo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            visibility: Visibility::Visible,
            collapsed: false,
            badge: None,
            bounds: None,
            content_center: None,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visibility = Visibility::Hidden;
        self
    }
}
