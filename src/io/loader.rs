//! CSV ingestion for node, arc, and supply/demand tables.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::network::{Arc, Node, NodeKind};
use crate::series::SeriesTable;

/// Data ingestion error with file/record context.
#[derive(Debug)]
pub struct DataError {
    /// What was being read (file path or record position).
    pub context: String,
    /// Human-readable problem description.
    pub message: String,
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data error: {} — {}", self.context, self.message)
    }
}

impl DataError {
    fn new(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// Row shape of `nodes.csv`.
#[derive(Debug, Deserialize)]
struct NodeRecord {
    node: String,
    kind: String,
}

/// Row shape of `arcs.csv`. `upper_ml` accepts the literal `inf` for
/// uncapacitated arcs (standard float parsing).
#[derive(Debug, Deserialize)]
struct ArcRecord {
    start: String,
    end: String,
    cost: f64,
    lower_ml: f64,
    upper_ml: f64,
}

/// Reads the node table (`node,kind`) from any reader.
///
/// # Errors
///
/// Returns a `DataError` on CSV shape problems or unknown kind spellings.
pub fn load_nodes_from_reader(reader: impl Read) -> Result<Vec<Node>, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut nodes = Vec::new();
    for (i, record) in rdr.deserialize::<NodeRecord>().enumerate() {
        let rec = record.map_err(|e| DataError::new(format!("nodes row {}", i + 1), e.to_string()))?;
        let kind = NodeKind::parse(&rec.kind).ok_or_else(|| {
            DataError::new(
                format!("nodes row {} ({})", i + 1, rec.node),
                format!("unknown kind \"{}\", expected source|junction|demand", rec.kind),
            )
        })?;
        nodes.push(Node::new(rec.node, kind));
    }
    Ok(nodes)
}

/// Reads the arc table (`start,end,cost,lower_ml,upper_ml`) from any reader.
///
/// # Errors
///
/// Returns a `DataError` on CSV shape problems or unparseable numbers.
pub fn load_arcs_from_reader(reader: impl Read) -> Result<Vec<Arc>, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut arcs = Vec::new();
    for (i, record) in rdr.deserialize::<ArcRecord>().enumerate() {
        let rec = record.map_err(|e| DataError::new(format!("arcs row {}", i + 1), e.to_string()))?;
        arcs.push(Arc::new(rec.start, rec.end, rec.cost, rec.lower_ml, rec.upper_ml));
    }
    Ok(arcs)
}

/// Reads a wide time-series table (`timestep` column plus one column per
/// node) from any reader.
///
/// # Errors
///
/// Returns a `DataError` when the leading header is not `timestep`, a cell
/// fails to parse, or the assembled table violates series invariants
/// (duplicate timesteps, negative values).
pub fn load_series_from_reader(reader: impl Read) -> Result<SeriesTable, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| DataError::new("series header", e.to_string()))?
        .clone();
    let mut columns = headers.iter();
    match columns.next() {
        Some("timestep") => {}
        other => {
            return Err(DataError::new(
                "series header",
                format!(
                    "first column must be \"timestep\", got {:?}",
                    other.unwrap_or("")
                ),
            ));
        }
    }
    let nodes: Vec<String> = columns.map(str::to_string).collect();

    let mut data = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let rec = record.map_err(|e| DataError::new(format!("series row {}", i + 1), e.to_string()))?;
        if rec.len() != nodes.len() + 1 {
            return Err(DataError::new(
                format!("series row {}", i + 1),
                format!("expected {} cells, got {}", nodes.len() + 1, rec.len()),
            ));
        }
        let timestep: u64 = rec[0].parse().map_err(|_| {
            DataError::new(
                format!("series row {}", i + 1),
                format!("timestep \"{}\" is not an unsigned integer", &rec[0]),
            )
        })?;
        let mut values = Vec::with_capacity(nodes.len());
        for (c, cell) in rec.iter().skip(1).enumerate() {
            let v: f64 = cell.parse().map_err(|_| {
                DataError::new(
                    format!("series row {} column \"{}\"", i + 1, nodes[c]),
                    format!("value \"{cell}\" is not a number"),
                )
            })?;
            values.push(v);
        }
        data.push((timestep, values));
    }

    SeriesTable::new(nodes, data).map_err(|e| DataError::new(e.element, e.message))
}

/// Path wrapper for [`load_nodes_from_reader`].
pub fn load_nodes(path: &Path) -> Result<Vec<Node>, DataError> {
    let file = open(path)?;
    load_nodes_from_reader(file).map_err(|e| with_path(path, e))
}

/// Path wrapper for [`load_arcs_from_reader`].
pub fn load_arcs(path: &Path) -> Result<Vec<Arc>, DataError> {
    let file = open(path)?;
    load_arcs_from_reader(file).map_err(|e| with_path(path, e))
}

/// Path wrapper for [`load_series_from_reader`].
pub fn load_series(path: &Path) -> Result<SeriesTable, DataError> {
    let file = open(path)?;
    load_series_from_reader(file).map_err(|e| with_path(path, e))
}

fn open(path: &Path) -> Result<File, DataError> {
    File::open(path)
        .map_err(|e| DataError::new(path.display().to_string(), format!("cannot open: {e}")))
}

fn with_path(path: &Path, e: DataError) -> DataError {
    DataError::new(format!("{}: {}", path.display(), e.context), e.message)
}
