use serde::Serialize;

/// A directed arc carrying flow between two nodes.
///
/// Flow on an arc is bounded by `[lower_ml, upper_ml]` per timestep and
/// priced at `cost` per Ml. An uncapacitated arc uses `f64::INFINITY` as its
/// upper bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Arc {
    /// Name of the node the arc leaves.
    pub start: String,
    /// Name of the node the arc enters.
    pub end: String,
    /// Cost per Ml of flow.
    pub cost: f64,
    /// Minimum flow per timestep (Ml, >= 0).
    pub lower_ml: f64,
    /// Maximum flow per timestep (Ml; may be infinite).
    pub upper_ml: f64,
}

impl Arc {
    pub fn new(
        start: impl Into<String>,
        end: impl Into<String>,
        cost: f64,
        lower_ml: f64,
        upper_ml: f64,
    ) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            cost,
            lower_ml,
            upper_ml,
        }
    }

    /// Convenience constructor for a `[0, upper]` arc.
    pub fn capacitated(start: impl Into<String>, end: impl Into<String>, cost: f64, upper_ml: f64) -> Self {
        Self::new(start, end, cost, 0.0, upper_ml)
    }

    /// Returns `"start->end"` for messages and export rows.
    pub fn label(&self) -> String {
        format!("{}->{}", self.start, self.end)
    }

    /// Fraction of the upper bound used by `flow_ml`, or `None` when the
    /// arc is uncapacitated or has a zero bound.
    pub fn utilization(&self, flow_ml: f64) -> Option<f64> {
        if self.upper_ml.is_finite() && self.upper_ml > 0.0 {
            Some(flow_ml / self.upper_ml)
        } else {
            None
        }
    }
}
