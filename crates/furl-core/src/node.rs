//! Node records.

use crate::geometry::{Bounds, Point};
use crate::Visibility;
use serde::{Deserialize, Serialize};

const DEFAULT_NODE_SIZE: f64 = 32.0;

fn default_node_size() -> f64 {
    DEFAULT_NODE_SIZE
}

/// A node in the diagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique element id.
    pub id: String,

    /// The combo this node belongs to, if any.
    #[serde(default)]
    pub combo: Option<String>,

    #[serde(default)]
    pub visibility: Visibility,

    /// Collapse button configuration. Absent means defaults.
    #[serde(default)]
    pub collapse: Option<CollapseConfig>,

    /// Set while the node is DAG-collapsed. Drives the button icon.
    #[serde(default)]
    pub collapsed: bool,

    /// Count shown as "+N" while collapsed.
    #[serde(default)]
    pub badge: Option<usize>,

    #[serde(default)]
    pub position: Point,

    #[serde(default = "default_node_size")]
    pub size: f64,

    /// Connection ports exposed to the edge-creation interaction.
    #[serde(default)]
    pub ports: Vec<Port>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            combo: None,
            visibility: Visibility::Visible,
            collapse: None,
            collapsed: false,
            badge: None,
            position: Point::default(),
            size: DEFAULT_NODE_SIZE,
            ports: Vec::new(),
        }
    }

    pub fn in_combo(mut self, combo: impl Into<String>) -> Self {
        self.combo = Some(combo.into());
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    pub fn with_ports(mut self, ports: Vec<Port>) -> Self {
        self.ports = ports;
        self
    }

    pub fn with_collapse(mut self, config: CollapseConfig) -> Self {
        self.collapse = Some(config);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visibility = Visibility::Hidden;
        self
    }

    /// Whether the node asks to start out collapsed, either through its
    /// collapse config or through the `collapsed` attribute itself.
    pub fn starts_collapsed(&self) -> bool {
        self.collapsed || self.collapse.as_ref().is_some_and(|c| c.collapsed)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::around(self.position, self.size, self.size)
    }

    pub fn port(&self, key: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.key == key)
    }
}

/// Per-node collapse button configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapseConfig {
    /// Collapse the node as soon as the graph is ready.
    #[serde(default)]
    pub collapsed: bool,
}

/// How many edges a port accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortArity {
    Limited(usize),
    Unbounded,
}

impl Default for PortArity {
    fn default() -> Self {
        PortArity::Limited(1)
    }
}

/// A named connection point on a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub key: String,
    #[serde(default)]
    pub arity: PortArity,
}

impl Port {
    pub fn new(key: impl Into<String>, arity: PortArity) -> Self {
        Self {
            key: key.into(),
            arity,
        }
    }

    /// True once `connections` edges use this port and no more may attach.
    pub fn at_capacity(&self, connections: usize) -> bool {
        match self.arity {
            PortArity::Limited(max) => connections >= max,
            PortArity::Unbounded => false,
        }
    }
}
