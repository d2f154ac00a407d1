//! TOML-based run configuration.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::sim::SimOptions;
use crate::solver::LpOptions;

/// Top-level run configuration parsed from TOML.
///
/// All sections have defaults; `[paths]` is optional and, when present,
/// points the run at CSV data files instead of a built-in preset. Load from
/// TOML with [`ScenarioConfig::from_toml_file`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run length and seeding.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Per-solve LP options.
    #[serde(default)]
    pub solver: SolverConfig,
    /// CSV data file locations (all four required together).
    #[serde(default)]
    pub paths: Option<PathsConfig>,
}

/// Run length and seeding.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Maximum timesteps to solve; 0 means all rows in the series.
    pub max_timesteps: usize,
    /// Seed for preset synthetic series (ignored for CSV data).
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_timesteps: 0,
            seed: 42,
        }
    }
}

/// Per-solve LP options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    /// Cost per Ml of unserved demand (must be > 0 and above arc costs).
    pub shortage_penalty: f64,
    /// Cost per Ml of spilled surplus (>= 0).
    pub spill_cost: f64,
    /// Tolerance for binding/balance checks (>= 0).
    pub flow_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let lp = LpOptions::default();
        Self {
            shortage_penalty: lp.shortage_penalty,
            spill_cost: lp.spill_cost,
            flow_tolerance: lp.flow_tolerance,
        }
    }
}

/// CSV data file locations.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Node table (`node,kind`).
    pub nodes: String,
    /// Arc table (`start,end,cost,lower_ml,upper_ml`).
    pub arcs: String,
    /// Supply series (`timestep` + one column per source node).
    pub supply: String,
    /// Demand series (`timestep` + one column per demand node).
    pub demand: String,
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"solver.shortage_penalty"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.solver;

        if s.shortage_penalty <= 0.0 || !s.shortage_penalty.is_finite() {
            errors.push(ConfigError {
                field: "solver.shortage_penalty".into(),
                message: format!("must be finite and > 0, got {}", s.shortage_penalty),
            });
        }
        if s.spill_cost < 0.0 || !s.spill_cost.is_finite() {
            errors.push(ConfigError {
                field: "solver.spill_cost".into(),
                message: format!("must be finite and >= 0, got {}", s.spill_cost),
            });
        }
        if s.flow_tolerance < 0.0 || !s.flow_tolerance.is_finite() {
            errors.push(ConfigError {
                field: "solver.flow_tolerance".into(),
                message: format!("must be finite and >= 0, got {}", s.flow_tolerance),
            });
        }

        if let Some(paths) = &self.paths {
            for (field, value) in [
                ("paths.nodes", &paths.nodes),
                ("paths.arcs", &paths.arcs),
                ("paths.supply", &paths.supply),
                ("paths.demand", &paths.demand),
            ] {
                if value.trim().is_empty() {
                    errors.push(ConfigError {
                        field: field.into(),
                        message: "must be a non-empty path".into(),
                    });
                }
            }
        }

        errors
    }

    /// Converts the solver/simulation sections into engine options.
    pub fn sim_options(&self) -> SimOptions {
        SimOptions {
            max_timesteps: self.simulation.max_timesteps,
            lp: LpOptions {
                shortage_penalty: self.solver.shortage_penalty,
                spill_cost: self.solver.spill_cost,
                flow_tolerance: self.solver.flow_tolerance,
            },
        }
    }
}
