//! Timestep-indexed supply/demand tables and supply state classification.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

/// Aggregate supply position at one timestep.
///
/// Supply above demand is a surplus, below is a shortage, equal (within
/// tolerance) is balanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplyState {
    Surplus,
    Shortage,
    Balanced,
}

impl SupplyState {
    /// Classifies total supply against total demand with a tolerance.
    pub fn classify(total_supply_ml: f64, total_demand_ml: f64, tolerance: f64) -> Self {
        let gap = total_supply_ml - total_demand_ml;
        if gap > tolerance {
            Self::Surplus
        } else if gap < -tolerance {
            Self::Shortage
        } else {
            Self::Balanced
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Surplus => "surplus",
            Self::Shortage => "shortage",
            Self::Balanced => "balanced",
        }
    }
}

impl fmt::Display for SupplyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Table shape or content error.
#[derive(Debug)]
pub struct SeriesError {
    /// What the error refers to (column name or timestep).
    pub element: String,
    pub message: String,
}

impl fmt::Display for SeriesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "series error: {} — {}", self.element, self.message)
    }
}

/// A wide time-series table: one row per timestep, one column per node.
///
/// Values are Ml per timestep. Rows are sorted by timestep label on
/// construction; every column holds exactly one value per row.
#[derive(Debug, Clone)]
pub struct SeriesTable {
    nodes: Vec<String>,
    col_index: HashMap<String, usize>,
    timesteps: Vec<u64>,
    /// Row-major values: `rows[t][c]` is the value for `nodes[c]` at `timesteps[t]`.
    rows: Vec<Vec<f64>>,
}

impl SeriesTable {
    /// Builds a table from column names and `(timestep, values)` rows.
    ///
    /// # Errors
    ///
    /// Returns a `SeriesError` on duplicate column names, duplicate
    /// timestep labels, row width mismatch, or negative/non-finite values.
    pub fn new(nodes: Vec<String>, mut data: Vec<(u64, Vec<f64>)>) -> Result<Self, SeriesError> {
        let mut col_index = HashMap::with_capacity(nodes.len());
        for (c, name) in nodes.iter().enumerate() {
            if col_index.insert(name.clone(), c).is_some() {
                return Err(SeriesError {
                    element: name.clone(),
                    message: "duplicate column".to_string(),
                });
            }
        }

        data.sort_by_key(|(t, _)| *t);
        let mut timesteps = Vec::with_capacity(data.len());
        let mut rows = Vec::with_capacity(data.len());
        for (t, values) in data {
            if timesteps.last() == Some(&t) {
                return Err(SeriesError {
                    element: format!("timestep {t}"),
                    message: "duplicate timestep row".to_string(),
                });
            }
            if values.len() != nodes.len() {
                return Err(SeriesError {
                    element: format!("timestep {t}"),
                    message: format!("expected {} values, got {}", nodes.len(), values.len()),
                });
            }
            for (c, v) in values.iter().enumerate() {
                if !v.is_finite() || *v < 0.0 {
                    return Err(SeriesError {
                        element: format!("{} @ timestep {t}", nodes[c]),
                        message: format!("values must be finite and >= 0, got {v}"),
                    });
                }
            }
            timesteps.push(t);
            rows.push(values);
        }

        Ok(Self {
            nodes,
            col_index,
            timesteps,
            rows,
        })
    }

    /// Number of timestep rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column (node) names in table order.
    pub fn node_names(&self) -> &[String] {
        &self.nodes
    }

    /// Timestep label of row `index`.
    pub fn timestep(&self, index: usize) -> Option<u64> {
        self.timesteps.get(index).copied()
    }

    /// Value for `node` at row `index`; `None` when the row is out of range,
    /// zero when the node has no column (junctions never appear in supply or
    /// demand tables).
    pub fn value(&self, index: usize, node: &str) -> Option<f64> {
        let row = self.rows.get(index)?;
        Some(match self.col_index.get(node) {
            Some(&c) => row[c],
            None => 0.0,
        })
    }

    /// Sum of all columns at row `index`.
    pub fn total_at(&self, index: usize) -> f64 {
        self.rows.get(index).map_or(0.0, |row| row.iter().sum())
    }

    /// Sum over the whole table.
    pub fn grand_total(&self) -> f64 {
        self.rows.iter().flatten().sum()
    }
}
