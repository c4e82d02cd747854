use axum::{extract::State, http::StatusCode, Json};
use feedback::{AggregateSnapshot, FeedbackStore};
use tracing::{error, info};

use crate::state::SharedState;
use crate::store_exec::with_store_blocking;
use crate::types::{api_error, AnalysisResponse, ApiResult, FeedbackRequest, MessageResponse};

pub async fn store_feedback(
    State(state): State<SharedState>,
    Json(req): Json<FeedbackRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let record = req.into_record();

    with_store_blocking(state.feedback.clone(), move |store| store.append(&record))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?
        .map_err(|e| {
            error!(error = %e, "feedback append failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e)
        })?;

    Ok(Json(MessageResponse {
        message: "Feedback stored successfully".to_string(),
    }))
}

/// Recompute the snapshot from the full log and persist it.
pub async fn analyze_feedback(
    State(state): State<SharedState>,
) -> ApiResult<Json<AnalysisResponse>> {
    let aggregator = state.aggregator;
    let target = state.snapshot.clone();

    // refresh() logs its own failures
    let analysis = with_store_blocking(state.feedback.clone(), move |store| {
        aggregator.refresh(&**store, &target)
    })
    .await
    .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?
    .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    info!(average_rating = analysis.average_rating, "feedback analysis served");
    Ok(Json(AnalysisResponse { analysis }))
}

pub async fn get_analysis(State(state): State<SharedState>) -> ApiResult<Json<AggregateSnapshot>> {
    let file = state.snapshot.clone();
    let snapshot = tokio::task::spawn_blocking(move || file.load_or_empty())
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?;
    Ok(Json(snapshot))
}
