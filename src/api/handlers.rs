//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::sim::StepSolution;

use super::AppState;
use super::types::{ErrorResponse, StateResponse, StepSummary, StepsQuery};

/// Returns the network summary, KPI report, and latest step summary.
///
/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    Json(StateResponse {
        network: state.network.clone(),
        kpi: state.kpi.clone(),
        latest_step: state.steps.last().map(StepSummary::from),
    })
}

/// Returns full step records, optionally filtered by timestep range.
///
/// `GET /steps` → 200 + `Vec<StepSolution>` JSON
/// `GET /steps?from=N&to=M` → filtered range (inclusive)
/// `GET /steps?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_steps(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StepsQuery>,
) -> impl IntoResponse {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(u64::MAX);

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("`from` ({from}) must be <= `to` ({to})"),
            }),
        ));
    }

    let records: Vec<StepSolution> = state
        .steps
        .iter()
        .filter(|s| s.timestep >= from && s.timestep <= to)
        .cloned()
        .collect();

    Ok(Json(records))
}
