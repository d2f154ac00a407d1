use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of a node in the supply network.
///
/// Kinds determine where slack applies during a solve: `Source` nodes may
/// spill surplus, `Demand` nodes may record shortfall, and `Junction` nodes
/// only pass flow through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Injects supply into the network (reservoir, borefield, import).
    Source,
    /// Pure pass-through node (treatment works, pumping station).
    Junction,
    /// Withdraws demand from the network (demand zone, town).
    Demand,
}

impl NodeKind {
    /// Parses a kind from its CSV spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "source" => Some(Self::Source),
            "junction" => Some(Self::Junction),
            "demand" => Some(Self::Demand),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Junction => "junction",
            Self::Demand => "demand",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named node in the supply network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Unique node name.
    pub name: String,
    /// Node role.
    pub kind: NodeKind,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}
