//! CSV export for solved runs.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::StepSolution;

/// Column header for flow export, one row per (timestep, arc).
const HEADER: &str = "timestep,state,start,end,flow_ml,lower_ml,upper_ml,\
                      utilization,binding,step_cost,step_shortfall_ml,step_spill_ml";

/// Exports a solved run to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(steps: &[StepSolution], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(steps, buf)
}

/// Writes a solved run as CSV to any writer.
///
/// One row per (timestep, arc); the per-step totals repeat on each of the
/// step's rows. Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(steps: &[StepSolution], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for step in steps {
        for flow in &step.flows {
            wtr.write_record(&[
                step.timestep.to_string(),
                step.state.as_str().to_string(),
                flow.start.clone(),
                flow.end.clone(),
                format!("{:.4}", flow.flow_ml),
                format!("{:.4}", flow.lower_ml),
                bound_cell(flow.upper_ml),
                flow.utilization
                    .map_or_else(String::new, |u| format!("{u:.4}")),
                flow.binding.to_string(),
                format!("{:.4}", step.flow_cost),
                format!("{:.4}", step.shortfall_ml),
                format!("{:.4}", step.spill_ml),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

fn bound_cell(upper_ml: f64) -> String {
    if upper_ml.is_finite() {
        format!("{upper_ml:.4}")
    } else {
        "inf".to_string()
    }
}
