//! Engine configuration.

use furl_core::Padding;
use serde::{Deserialize, Serialize};

/// Tunables for a collapse session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Forwarded to hide/show so the renderer can animate transitions.
    pub animate: bool,
    /// Curve offset for the two proxy edges of a mutual pair.
    pub mutual_curve_offset: f64,
    /// Side length of a collapsed (or empty) combo placeholder.
    pub collapsed_combo_size: f64,
    /// Space between visible members and the combo outline. A number or
    /// 1 to 4 values in CSS order.
    pub combo_padding: Padding,
    /// Re-hide anything a full redraw reveals on its own.
    pub restore_after_redraw: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            animate: true,
            mutual_curve_offset: 30.0,
            collapsed_combo_size: 32.0,
            combo_padding: Padding::uniform(10.0),
            restore_after_redraw: true,
        }
    }
}
