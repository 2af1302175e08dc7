// GET handlers: hourly roll-up query, version

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::AppState;
use crate::error::EventError;
use crate::event_repo::rollup;
use crate::version::{NAME, VERSION};

/// Query string for GET /hourly. All three parameters are required; they are
/// Options here so a missing one gets a diagnostic naming it instead of a
/// generic extractor rejection.
#[derive(Debug, Deserialize)]
pub(super) struct HourlyParams {
    customer_id: Option<String>,
    start: Option<String>,
    end: Option<String>,
}

/// GET /hourly?customer_id=..&start=..&end=.. — per-hour event counts for the
/// customer in [start, end), as a JSON object keyed by hour timestamp.
pub(super) async fn hourly_handler(
    State(state): State<AppState>,
    Query(params): Query<HourlyParams>,
) -> Response {
    let (Some(customer_id), Some(start), Some(end)) = (params.customer_id, params.start, params.end)
    else {
        return (
            StatusCode::BAD_REQUEST,
            "missing one of required query parameters: customer_id, start or end",
        )
            .into_response();
    };

    match rollup::hourly_event_counts(state.repo.as_ref(), &customer_id, &start, &end).await {
        Ok(counts) => axum::Json(counts).into_response(),
        Err(e @ EventError::MalformedTimestamp(_)) => {
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, operation = "hourly_counts", "hourly query failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "query failed").into_response()
        }
    }
}

/// GET /version — returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}
