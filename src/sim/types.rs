//! Per-timestep solution records and run-level option/error types.

use std::fmt;

use serde::Serialize;

use crate::series::SupplyState;
use crate::solver::{LpOptions, SolveError};

/// Run-level options: timestep cap plus per-solve LP options.
#[derive(Debug, Clone, Default)]
pub struct SimOptions {
    /// Maximum number of timesteps to solve; 0 means all available.
    pub max_timesteps: usize,
    /// Options applied to every per-timestep solve.
    pub lp: LpOptions,
}

/// Solved flow on one arc at one timestep.
#[derive(Debug, Clone, Serialize)]
pub struct ArcFlow {
    /// Arc start node name.
    pub start: String,
    /// Arc end node name.
    pub end: String,
    /// Solved flow (Ml).
    pub flow_ml: f64,
    /// Arc lower bound (Ml).
    pub lower_ml: f64,
    /// Arc upper bound (Ml; may be infinite).
    pub upper_ml: f64,
    /// `flow_ml / upper_ml` for capacitated arcs.
    pub utilization: Option<f64>,
    /// Whether the flow sits at the upper bound (within tolerance).
    pub binding: bool,
}

/// Complete record of one solved timestep.
#[derive(Debug, Clone, Serialize)]
pub struct StepSolution {
    /// Timestep label from the input series.
    pub timestep: u64,
    /// Supply position before solving.
    pub state: SupplyState,
    /// Total supply injected this step (Ml).
    pub supply_ml: f64,
    /// Total demand withdrawn this step (Ml).
    pub demand_ml: f64,
    /// Objective contribution of arc flows (slack penalties excluded).
    pub flow_cost: f64,
    /// Total unserved demand (Ml).
    pub shortfall_ml: f64,
    /// Total unrouted surplus (Ml).
    pub spill_ml: f64,
    /// Highest utilization over capacitated arcs (0 when none).
    pub peak_utilization: f64,
    /// Number of arcs at their upper bound.
    pub binding_arcs: usize,
    /// Per-arc flows in network arc order.
    pub flows: Vec<ArcFlow>,
}

impl fmt::Display for StepSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>4} [{:<8}] | cost={:>9.2} | supply={:>7.2} Ml  demand={:>7.2} Ml  \
             short={:>6.2} Ml  spill={:>6.2} Ml | peak util={:>5.1}%  binding={}",
            self.timestep,
            self.state.as_str(),
            self.flow_cost,
            self.supply_ml,
            self.demand_ml,
            self.shortfall_ml,
            self.spill_ml,
            self.peak_utilization * 100.0,
            self.binding_arcs,
        )
    }
}

/// Run failure: scenario shape problems or a per-timestep solve failure.
#[derive(Debug)]
pub enum SimError {
    /// The scenario carries no timestep rows.
    EmptyRun,
    /// Supply/demand tables or columns do not fit the network.
    Shape(String),
    /// The solver failed at a specific timestep.
    Solve { timestep: u64, error: SolveError },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRun => write!(f, "simulation error: no timesteps to solve"),
            Self::Shape(msg) => write!(f, "simulation error: {msg}"),
            Self::Solve { timestep, error } => {
                write!(f, "simulation error at timestep {timestep}: {error}")
            }
        }
    }
}
