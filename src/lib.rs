//! Water distribution network simulator built on per-timestep min-cost flow.
//!
//! Loads a node/arc network and supply/demand series (from CSV files or a
//! built-in preset), solves one linear program per timestep, and reports
//! flows, shortfall, spill, and run-level KPIs.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod io;
/// Network topology: nodes, arcs, validation, and adjacency.
pub mod network;
pub mod scenario;
pub mod series;
/// Simulation engine, step records, and KPI aggregation.
pub mod sim;
pub mod solver;
pub mod synth;
