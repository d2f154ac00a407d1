//! Scenario assembly: CSV-backed runs and built-in presets.

use std::fmt;
use std::path::Path;

use crate::config::ScenarioConfig;
use crate::io::loader::{self, DataError};
use crate::network::{Arc, Network, NetworkError, Node, NodeKind};
use crate::series::SeriesTable;
use crate::sim::{Engine, SimError};
use crate::synth::DemandProfile;

/// Seed offset for the second town's demand RNG to avoid correlation with
/// the first.
const TOWN_B_SEED_OFFSET: u64 = 31;

/// A fully assembled scenario: network, series, and run configuration.
#[derive(Debug)]
pub struct Scenario {
    pub network: Network,
    pub supply: SeriesTable,
    pub demand: SeriesTable,
    pub config: ScenarioConfig,
}

/// Scenario assembly error.
#[derive(Debug)]
pub enum ScenarioError {
    Data(DataError),
    Network(NetworkError),
    /// Config has no `[paths]` table, so there is nothing to load.
    MissingPaths,
    UnknownPreset(String),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Data(e) => write!(f, "{e}"),
            Self::Network(e) => write!(f, "{e}"),
            Self::MissingPaths => write!(
                f,
                "scenario error: config has no [paths] table; use a preset or add one"
            ),
            Self::UnknownPreset(name) => write!(
                f,
                "scenario error: unknown preset \"{name}\" (available: {})",
                Scenario::PRESETS.join(", ")
            ),
        }
    }
}

impl Scenario {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["demo", "stress"];

    /// Assembles a scenario from a configuration with a `[paths]` table.
    ///
    /// # Errors
    ///
    /// Returns a `ScenarioError` when `[paths]` is absent, a CSV file fails
    /// to load, or the network is invalid.
    pub fn from_config(config: ScenarioConfig) -> Result<Self, ScenarioError> {
        let paths = config.paths.as_ref().ok_or(ScenarioError::MissingPaths)?;

        let nodes = loader::load_nodes(Path::new(&paths.nodes)).map_err(ScenarioError::Data)?;
        let arcs = loader::load_arcs(Path::new(&paths.arcs)).map_err(ScenarioError::Data)?;
        let supply = loader::load_series(Path::new(&paths.supply)).map_err(ScenarioError::Data)?;
        let demand = loader::load_series(Path::new(&paths.demand)).map_err(ScenarioError::Data)?;
        let network = Network::new(nodes, arcs).map_err(ScenarioError::Network)?;

        Ok(Self {
            network,
            supply,
            demand,
            config,
        })
    }

    /// Assembles a built-in preset, seeded from `config.simulation.seed`.
    ///
    /// # Errors
    ///
    /// Returns a `ScenarioError` if the preset name is unknown.
    pub fn from_preset(name: &str, config: ScenarioConfig) -> Result<Self, ScenarioError> {
        match name {
            "demo" => Ok(Self::demo(config)),
            "stress" => Ok(Self::stress(config)),
            _ => Err(ScenarioError::UnknownPreset(name.to_string())),
        }
    }

    /// Builds the simulation engine for this scenario.
    ///
    /// # Errors
    ///
    /// Returns a `SimError` when the series do not fit the network.
    pub fn build_engine(self) -> Result<Engine, SimError> {
        let options = self.config.sim_options();
        Engine::new(self.network, self.supply, self.demand, options)
    }

    /// Two-source town network with generous capacity; feasible throughout.
    fn demo(config: ScenarioConfig) -> Self {
        let seed = config.simulation.seed;
        let (network, supply, demand) = town_network(
            TownParams {
                reservoir_ml: 12.0,
                borefield_ml: 6.0,
                trunk_a_cap: 10.0,
                trunk_b_cap: 8.0,
                bypass_cap: 4.0,
                town_a_base: 6.0,
                town_b_base: 4.0,
            },
            seed,
        );
        Self {
            network,
            supply,
            demand,
            config,
        }
    }

    /// Same topology with tight trunk capacity and reduced sources, so peak
    /// demand steps run short.
    fn stress(config: ScenarioConfig) -> Self {
        let seed = config.simulation.seed;
        let (network, supply, demand) = town_network(
            TownParams {
                reservoir_ml: 8.0,
                borefield_ml: 3.0,
                trunk_a_cap: 5.0,
                trunk_b_cap: 4.0,
                bypass_cap: 2.0,
                town_a_base: 7.0,
                town_b_base: 5.0,
            },
            seed,
        );
        Self {
            network,
            supply,
            demand,
            config,
        }
    }
}

struct TownParams {
    reservoir_ml: f64,
    borefield_ml: f64,
    trunk_a_cap: f64,
    trunk_b_cap: f64,
    bypass_cap: f64,
    town_a_base: f64,
    town_b_base: f64,
}

/// Shared preset topology: two sources feeding a treatment works that
/// serves two towns, plus a dearer raw-water bypass to TownB.
fn town_network(p: TownParams, seed: u64) -> (Network, SeriesTable, SeriesTable) {
    const STEPS: usize = 14;

    let nodes = vec![
        Node::new("Reservoir", NodeKind::Source),
        Node::new("Borefield", NodeKind::Source),
        Node::new("Wtw", NodeKind::Junction),
        Node::new("TownA", NodeKind::Demand),
        Node::new("TownB", NodeKind::Demand),
    ];
    let arcs = vec![
        Arc::capacitated("Reservoir", "Wtw", 1.0, p.reservoir_ml),
        Arc::capacitated("Borefield", "Wtw", 2.5, p.borefield_ml),
        Arc::capacitated("Wtw", "TownA", 0.5, p.trunk_a_cap),
        Arc::capacitated("Wtw", "TownB", 0.8, p.trunk_b_cap),
        Arc::capacitated("Reservoir", "TownB", 3.0, p.bypass_cap),
    ];
    // Preset topology is fixed and known-valid.
    let network = Network::new(nodes, arcs).unwrap_or_else(|e| panic!("preset network: {e}"));

    let supply_rows = (0..STEPS)
        .map(|t| (t as u64 + 1, vec![p.reservoir_ml, p.borefield_ml]))
        .collect();
    let supply = SeriesTable::new(
        vec!["Reservoir".to_string(), "Borefield".to_string()],
        supply_rows,
    )
    .unwrap_or_else(|e| panic!("preset supply: {e}"));

    let mut town_a = DemandProfile::new(p.town_a_base, 1.5, 0.0, 0.2, STEPS, seed);
    let mut town_b = DemandProfile::new(
        p.town_b_base,
        1.0,
        0.6,
        0.15,
        STEPS,
        seed.wrapping_add(TOWN_B_SEED_OFFSET),
    );
    let demand_rows = (0..STEPS)
        .map(|t| (t as u64 + 1, vec![town_a.demand_ml(t), town_b.demand_ml(t)]))
        .collect();
    let demand = SeriesTable::new(vec!["TownA".to_string(), "TownB".to_string()], demand_rows)
        .unwrap_or_else(|e| panic!("preset demand: {e}"));

    (network, supply, demand)
}
