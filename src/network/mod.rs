//! Network topology: nodes, arcs, and validated incidence structure.

pub mod arc;
pub mod node;

use std::collections::HashMap;
use std::fmt;

pub use arc::Arc;
pub use node::{Node, NodeKind};

/// Network construction error with the offending element named.
#[derive(Debug)]
pub struct NetworkError {
    /// Element the error refers to (node or arc label).
    pub element: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "network error: {} — {}", self.element, self.message)
    }
}

/// A validated, immutable supply network.
///
/// Construction checks node/arc consistency once; all downstream code may
/// index into `nodes()` and `arcs()` without re-validating. Incidence lists
/// are precomputed per node.
#[derive(Debug, Clone)]
pub struct Network {
    nodes: Vec<Node>,
    arcs: Vec<Arc>,
    node_index: HashMap<String, usize>,
    arcs_in: Vec<Vec<usize>>,
    arcs_out: Vec<Vec<usize>>,
}

impl Network {
    /// Builds a network from nodes and arcs.
    ///
    /// # Errors
    ///
    /// Returns a `NetworkError` when the node list is empty, node names
    /// repeat, an arc references an unknown node, an arc is a self-loop or
    /// a duplicate `(start, end)` pair, or arc bounds/cost are malformed.
    pub fn new(nodes: Vec<Node>, arcs: Vec<Arc>) -> Result<Self, NetworkError> {
        if nodes.is_empty() {
            return Err(NetworkError {
                element: "nodes".to_string(),
                message: "network must contain at least one node".to_string(),
            });
        }

        let mut node_index = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if node.name.trim().is_empty() {
                return Err(NetworkError {
                    element: format!("node #{i}"),
                    message: "node name must be non-empty".to_string(),
                });
            }
            if node_index.insert(node.name.clone(), i).is_some() {
                return Err(NetworkError {
                    element: node.name.clone(),
                    message: "duplicate node name".to_string(),
                });
            }
        }

        let mut arcs_in = vec![Vec::new(); nodes.len()];
        let mut arcs_out = vec![Vec::new(); nodes.len()];
        let mut seen_pairs: HashMap<(usize, usize), ()> = HashMap::new();

        for (a, arc) in arcs.iter().enumerate() {
            let start = *node_index.get(&arc.start).ok_or_else(|| NetworkError {
                element: arc.label(),
                message: format!("start node \"{}\" is not defined", arc.start),
            })?;
            let end = *node_index.get(&arc.end).ok_or_else(|| NetworkError {
                element: arc.label(),
                message: format!("end node \"{}\" is not defined", arc.end),
            })?;
            if start == end {
                return Err(NetworkError {
                    element: arc.label(),
                    message: "self-loop arcs are not allowed".to_string(),
                });
            }
            if seen_pairs.insert((start, end), ()).is_some() {
                return Err(NetworkError {
                    element: arc.label(),
                    message: "duplicate arc".to_string(),
                });
            }
            if !arc.cost.is_finite() {
                return Err(NetworkError {
                    element: arc.label(),
                    message: "cost must be finite".to_string(),
                });
            }
            if arc.lower_ml < 0.0 || arc.lower_ml.is_nan() {
                return Err(NetworkError {
                    element: arc.label(),
                    message: format!("lower bound must be >= 0, got {}", arc.lower_ml),
                });
            }
            if arc.upper_ml < arc.lower_ml || arc.upper_ml.is_nan() {
                return Err(NetworkError {
                    element: arc.label(),
                    message: format!(
                        "upper bound must be >= lower bound, got [{}, {}]",
                        arc.lower_ml, arc.upper_ml
                    ),
                });
            }
            arcs_out[start].push(a);
            arcs_in[end].push(a);
        }

        Ok(Self {
            nodes,
            arcs,
            node_index,
            arcs_in,
            arcs_out,
        })
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Index of the node with the given name.
    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.node_index.get(name).copied()
    }

    /// Indices of arcs entering node `n`.
    pub fn arcs_in(&self, n: usize) -> &[usize] {
        &self.arcs_in[n]
    }

    /// Indices of arcs leaving node `n`.
    pub fn arcs_out(&self, n: usize) -> &[usize] {
        &self.arcs_out[n]
    }

    /// Names of all nodes with the given kind.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }
}
