//! Collapse control requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A request from a collapse control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "id", rename_all = "snake_case")]
pub enum Action {
    CollapseNode(String),
    ExpandNode(String),
    /// Expands a collapsed node, collapses anything else.
    ToggleNode(String),
    CollapseCombo(String),
    ExpandCombo(String),
    ToggleCombo(String),
}

impl Action {
    /// The node or combo the action targets.
    pub fn target(&self) -> &str {
        match self {
            Action::CollapseNode(id)
            | Action::ExpandNode(id)
            | Action::ToggleNode(id)
            | Action::CollapseCombo(id)
            | Action::ExpandCombo(id)
            | Action::ToggleCombo(id) => id,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Action::CollapseNode(_) => "collapse node",
            Action::ExpandNode(_) => "expand node",
            Action::ToggleNode(_) => "toggle node",
            Action::CollapseCombo(_) => "collapse combo",
            Action::ExpandCombo(_) => "expand combo",
            Action::ToggleCombo(_) => "toggle combo",
        };
        write!(f, "{} {}", verb, self.target())
    }
}
