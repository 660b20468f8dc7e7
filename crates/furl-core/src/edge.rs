//! Edge records.
//!
//! Real edges come from the host application. Proxy edges are synthesized
//! by the engine to stand in for real edges whose endpoints are hidden
//! inside a collapsed combo; they carry `is_proxy` so traversals and port
//! counts can ignore them.

use crate::Visibility;
use serde::{Deserialize, Serialize};

/// How an edge is drawn between its endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveStyle {
    #[default]
    Straight,
    /// Quadratic curve with a signed control-point offset.
    Curved { offset: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,

    #[serde(default)]
    pub visibility: Visibility,

    /// Synthesized by the engine rather than supplied by the host.
    #[serde(default)]
    pub is_proxy: bool,

    #[serde(default)]
    pub source_port: Option<String>,

    #[serde(default)]
    pub target_port: Option<String>,

    #[serde(default)]
    pub curve: CurveStyle,
}

impl Edge {
    /// Creates a real edge.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            visibility: Visibility::Visible,
            is_proxy: false,
            source_port: None,
            target_port: None,
            curve: CurveStyle::Straight,
        }
    }

    /// Creates a synthetic proxy edge.
    pub fn proxy(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        curve: CurveStyle,
    ) -> Self {
        Self {
            is_proxy: true,
            curve,
            ..Self::new(id, source, target)
        }
    }

    pub fn with_ports(mut self, source_port: Option<&str>, target_port: Option<&str>) -> Self {
        self.source_port = source_port.map(str::to_string);
        self.target_port = target_port.map(str::to_string);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visibility = Visibility::Hidden;
        self
    }

    /// True when either endpoint is `id`.
    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}
