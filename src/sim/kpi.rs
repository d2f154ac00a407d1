//! Post-hoc KPI aggregation over a solved run.

use std::fmt;

use serde::Serialize;

use crate::series::SupplyState;

use super::types::StepSolution;

/// Aggregate indicators derived from a complete run.
///
/// Computed post-hoc from the step vector so reported figures always agree
/// with the per-step records.
#[derive(Debug, Clone, Serialize)]
pub struct KpiReport {
    /// Timesteps solved.
    pub steps: usize,
    /// Sum of per-step flow costs.
    pub total_flow_cost: f64,
    /// Total demand over the run (Ml).
    pub total_demand_ml: f64,
    /// Total unserved demand (Ml).
    pub total_shortfall_ml: f64,
    /// Total unrouted surplus (Ml).
    pub total_spill_ml: f64,
    /// Steps classified as shortage.
    pub shortage_steps: usize,
    /// Steps classified as surplus.
    pub surplus_steps: usize,
    /// Percentage of demand served: `100 * (demand - shortfall) / demand`.
    pub demand_served_pct: f64,
    /// Highest arc utilization seen at any step (percent).
    pub peak_utilization_pct: f64,
    /// Total (arc, step) incidences at the upper bound.
    pub binding_arc_steps: usize,
}

impl KpiReport {
    /// Aggregates the complete step vector.
    pub fn from_steps(steps: &[StepSolution]) -> Self {
        let mut total_flow_cost = 0.0;
        let mut total_demand_ml = 0.0;
        let mut total_shortfall_ml = 0.0;
        let mut total_spill_ml = 0.0;
        let mut shortage_steps = 0;
        let mut surplus_steps = 0;
        let mut peak_utilization = 0.0_f64;
        let mut binding_arc_steps = 0;

        for s in steps {
            total_flow_cost += s.flow_cost;
            total_demand_ml += s.demand_ml;
            total_shortfall_ml += s.shortfall_ml;
            total_spill_ml += s.spill_ml;
            match s.state {
                SupplyState::Shortage => shortage_steps += 1,
                SupplyState::Surplus => surplus_steps += 1,
                SupplyState::Balanced => {}
            }
            peak_utilization = peak_utilization.max(s.peak_utilization);
            binding_arc_steps += s.binding_arcs;
        }

        let demand_served_pct = if total_demand_ml > 0.0 {
            100.0 * (total_demand_ml - total_shortfall_ml) / total_demand_ml
        } else {
            100.0
        };

        Self {
            steps: steps.len(),
            total_flow_cost,
            total_demand_ml,
            total_shortfall_ml,
            total_spill_ml,
            shortage_steps,
            surplus_steps,
            demand_served_pct,
            peak_utilization_pct: peak_utilization * 100.0,
            binding_arc_steps,
        }
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Run Report ---")?;
        writeln!(f, "Timesteps solved:     {}", self.steps)?;
        writeln!(f, "Total flow cost:      {:.2}", self.total_flow_cost)?;
        writeln!(f, "Total demand:         {:.2} Ml", self.total_demand_ml)?;
        writeln!(
            f,
            "Demand served:        {:.1}% (shortfall {:.2} Ml)",
            self.demand_served_pct, self.total_shortfall_ml
        )?;
        writeln!(f, "Surplus spilled:      {:.2} Ml", self.total_spill_ml)?;
        writeln!(
            f,
            "Shortage steps:       {} / {}  (surplus steps: {})",
            self.shortage_steps, self.steps, self.surplus_steps
        )?;
        writeln!(
            f,
            "Peak arc utilization: {:.1}%",
            self.peak_utilization_pct
        )?;
        write!(f, "Binding arc-steps:    {}", self.binding_arc_steps)
    }
}
