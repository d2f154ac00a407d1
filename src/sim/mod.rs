//! Timestep simulation: engine, step records, and KPI aggregation.

pub mod engine;
pub mod kpi;
pub mod types;

pub use engine::Engine;
pub use kpi::KpiReport;
pub use types::{ArcFlow, SimError, SimOptions, StepSolution};
