//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::network::{Network, NodeKind};
use crate::sim::{KpiReport, StepSolution};

/// Combined state response: network summary, KPIs, and the latest step.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    /// Network the run was solved on.
    pub network: NetworkSummary,
    /// Aggregate KPI report.
    pub kpi: KpiReport,
    /// Headline figures for the last solved timestep, `null` for empty runs.
    pub latest_step: Option<StepSummary>,
}

/// Compact description of the solved network.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkSummary {
    /// Total node count.
    pub nodes: usize,
    /// Total arc count.
    pub arcs: usize,
    /// Names of the source nodes.
    pub sources: Vec<String>,
    /// Names of the demand nodes.
    pub demands: Vec<String>,
}

impl NetworkSummary {
    pub fn from_network(network: &Network) -> Self {
        let names = |kind: NodeKind| {
            network
                .nodes_of_kind(kind)
                .map(|n| n.name.clone())
                .collect()
        };
        Self {
            nodes: network.node_count(),
            arcs: network.arc_count(),
            sources: names(NodeKind::Source),
            demands: names(NodeKind::Demand),
        }
    }
}

/// Headline figures for one solved timestep, without the per-arc flows.
#[derive(Debug, Serialize)]
pub struct StepSummary {
    /// Timestep label.
    pub timestep: u64,
    /// Supply/demand balance classification.
    pub state: String,
    /// Total supply offered (Ml).
    pub supply_ml: f64,
    /// Total demand requested (Ml).
    pub demand_ml: f64,
    /// Cost of the routed flows.
    pub flow_cost: f64,
    /// Unserved demand (Ml).
    pub shortfall_ml: f64,
    /// Unrouted surplus (Ml).
    pub spill_ml: f64,
    /// Highest arc utilization this step (fraction).
    pub peak_utilization: f64,
    /// Arcs at their upper bound this step.
    pub binding_arcs: usize,
}

impl From<&StepSolution> for StepSummary {
    fn from(s: &StepSolution) -> Self {
        Self {
            timestep: s.timestep,
            state: s.state.as_str().to_string(),
            supply_ml: s.supply_ml,
            demand_ml: s.demand_ml,
            flow_cost: s.flow_cost,
            shortfall_ml: s.shortfall_ml,
            spill_ml: s.spill_ml,
            peak_utilization: s.peak_utilization,
            binding_arcs: s.binding_arcs,
        }
    }
}

/// Optional range query parameters for the steps endpoint.
#[derive(Debug, Deserialize)]
pub struct StepsQuery {
    /// Start timestep label (inclusive).
    pub from: Option<u64>,
    /// End timestep label (inclusive).
    pub to: Option<u64>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
