//! Shared test fixtures for integration tests.

use waternet_sim::config::ScenarioConfig;
use waternet_sim::scenario::Scenario;
use waternet_sim::sim::Engine;

/// Builds an engine for a named preset with the given seed.
pub fn preset_engine(name: &str, seed: u64) -> Engine {
    let mut config = ScenarioConfig::default();
    config.simulation.seed = seed;
    Scenario::from_preset(name, config)
        .unwrap_or_else(|e| panic!("preset \"{name}\" should load: {e}"))
        .build_engine()
        .unwrap_or_else(|e| panic!("preset \"{name}\" engine should build: {e}"))
}
