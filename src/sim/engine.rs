//! Simulation engine: balance, formulate, solve, and record each timestep.

use crate::network::{Network, NodeKind};
use crate::series::{SeriesTable, SupplyState};
use crate::solver::{solve_step, LpOutcome};

use super::types::{ArcFlow, SimError, SimOptions, StepSolution};

/// Engine owning the network, the supply/demand tables, and run options.
///
/// Each timestep program is independent, so solving does not mutate the
/// engine; `run` is a fail-fast loop over `step`.
#[derive(Debug)]
pub struct Engine {
    network: Network,
    supply: SeriesTable,
    demand: SeriesTable,
    options: SimOptions,
}

impl Engine {
    /// Creates an engine after cross-validating tables against the network.
    ///
    /// # Errors
    ///
    /// Returns a `SimError` when either table is empty, the tables disagree
    /// on timestep labels, a supply column does not name a `Source` node, or
    /// a demand column does not name a `Demand` node.
    pub fn new(
        network: Network,
        supply: SeriesTable,
        demand: SeriesTable,
        options: SimOptions,
    ) -> Result<Self, SimError> {
        if supply.is_empty() || demand.is_empty() {
            return Err(SimError::EmptyRun);
        }
        if supply.len() != demand.len() {
            return Err(SimError::Shape(format!(
                "supply has {} timesteps but demand has {}",
                supply.len(),
                demand.len()
            )));
        }
        for i in 0..supply.len() {
            if supply.timestep(i) != demand.timestep(i) {
                return Err(SimError::Shape(format!(
                    "supply and demand disagree on timestep labels at row {i}"
                )));
            }
        }
        Self::check_columns(&network, &supply, NodeKind::Source, "supply")?;
        Self::check_columns(&network, &demand, NodeKind::Demand, "demand")?;

        Ok(Self {
            network,
            supply,
            demand,
            options,
        })
    }

    fn check_columns(
        network: &Network,
        table: &SeriesTable,
        kind: NodeKind,
        label: &str,
    ) -> Result<(), SimError> {
        for name in table.node_names() {
            match network.node_index(name) {
                None => {
                    return Err(SimError::Shape(format!(
                        "{label} column \"{name}\" does not name a network node"
                    )));
                }
                Some(idx) if network.nodes()[idx].kind != kind => {
                    return Err(SimError::Shape(format!(
                        "{label} column \"{name}\" names a {} node, expected {kind}",
                        network.nodes()[idx].kind
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Number of timesteps the run will solve (series length, capped).
    pub fn total_steps(&self) -> usize {
        if self.options.max_timesteps == 0 {
            self.supply.len()
        } else {
            self.supply.len().min(self.options.max_timesteps)
        }
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn options(&self) -> &SimOptions {
        &self.options
    }

    /// Solves timestep row `index` and returns its record.
    ///
    /// # Errors
    ///
    /// Returns a `SimError` when `index` is out of range or the per-step
    /// program fails to solve.
    pub fn step(&self, index: usize) -> Result<StepSolution, SimError> {
        let timestep = self
            .supply
            .timestep(index)
            .ok_or_else(|| SimError::Shape(format!("timestep row {index} out of range")))?;

        let mut supply = vec![0.0; self.network.node_count()];
        let mut demand = vec![0.0; self.network.node_count()];
        for (n, node) in self.network.nodes().iter().enumerate() {
            supply[n] = self.supply.value(index, &node.name).unwrap_or(0.0);
            demand[n] = self.demand.value(index, &node.name).unwrap_or(0.0);
        }

        let supply_ml: f64 = supply.iter().sum();
        let demand_ml: f64 = demand.iter().sum();
        let tolerance = self.options.lp.flow_tolerance;
        let state = SupplyState::classify(supply_ml, demand_ml, tolerance);

        let outcome = solve_step(&self.network, &supply, &demand, &self.options.lp)
            .map_err(|error| SimError::Solve { timestep, error })?;

        Ok(self.record(timestep, state, supply_ml, demand_ml, &outcome))
    }

    fn record(
        &self,
        timestep: u64,
        state: SupplyState,
        supply_ml: f64,
        demand_ml: f64,
        outcome: &LpOutcome,
    ) -> StepSolution {
        let tolerance = self.options.lp.flow_tolerance;
        let mut peak_utilization = 0.0_f64;
        let mut binding_arcs = 0;

        let flows: Vec<ArcFlow> = self
            .network
            .arcs()
            .iter()
            .zip(&outcome.flows)
            .map(|(arc, &flow_ml)| {
                let utilization = arc.utilization(flow_ml);
                if let Some(u) = utilization {
                    peak_utilization = peak_utilization.max(u);
                }
                let binding = arc.upper_ml.is_finite() && flow_ml >= arc.upper_ml - tolerance;
                if binding {
                    binding_arcs += 1;
                }
                ArcFlow {
                    start: arc.start.clone(),
                    end: arc.end.clone(),
                    flow_ml,
                    lower_ml: arc.lower_ml,
                    upper_ml: arc.upper_ml,
                    utilization,
                    binding,
                }
            })
            .collect();

        StepSolution {
            timestep,
            state,
            supply_ml,
            demand_ml,
            flow_cost: outcome.flow_cost,
            shortfall_ml: outcome.total_shortfall_ml(),
            spill_ml: outcome.total_spill_ml(),
            peak_utilization,
            binding_arcs,
            flows,
        }
    }

    /// Solves all (capped) timesteps, fail-fast on the first solver error.
    pub fn run(&self) -> Result<Vec<StepSolution>, SimError> {
        let total = self.total_steps();
        let mut steps = Vec::with_capacity(total);
        for i in 0..total {
            steps.push(self.step(i)?);
        }
        Ok(steps)
    }
}
