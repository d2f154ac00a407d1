//! Min-cost flow formulation and solve, delegated to an external LP solver.

pub mod lp;

use std::fmt;

pub use lp::{solve_step, LpOutcome};

/// Options applied to every per-timestep solve.
#[derive(Debug, Clone)]
pub struct LpOptions {
    /// Cost per Ml of unserved demand. Must exceed every arc cost so the
    /// shortfall slack stays inert whenever the network can serve demand.
    pub shortage_penalty: f64,
    /// Cost per Ml of surplus supply routed to spill (>= 0).
    pub spill_cost: f64,
    /// Tolerance for binding/rounding checks (>= 0).
    pub flow_tolerance: f64,
}

impl Default for LpOptions {
    fn default() -> Self {
        Self {
            shortage_penalty: 500.0,
            spill_cost: 0.0,
            flow_tolerance: 1e-6,
        }
    }
}

/// Solve failure for one timestep program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// No flow assignment satisfies the arc lower bounds and balances.
    Infeasible,
    /// The objective can decrease without bound (negative-cost cycle on
    /// uncapacitated arcs).
    Unbounded,
    /// The solver failed for another reason.
    Solver(String),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Infeasible => write!(f, "program is infeasible"),
            Self::Unbounded => write!(f, "program is unbounded"),
            Self::Solver(msg) => write!(f, "solver failure: {msg}"),
        }
    }
}
