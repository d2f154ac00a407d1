//! CSV ingestion and export.

pub mod export;
pub mod loader;

pub use export::{export_csv, write_csv};
pub use loader::{load_arcs, load_nodes, load_series, DataError};
