use axum::{extract::State, http::StatusCode, Json};
use feedback::AggregateSnapshot;
use tracing::{error, warn};

use crate::prompts::{self, LATEST_TRENDS};
use crate::state::SharedState;
use crate::types::{
    api_error, ApiResult, ChatRequest, ChatResponse, ProjectRequest, RecommendationResponse,
    TaskPrioritizationResponse,
};

pub async fn recommend_tech_stack(
    State(state): State<SharedState>,
    Json(req): Json<ProjectRequest>,
) -> ApiResult<Json<RecommendationResponse>> {
    require_project(&req.project)?;

    let snapshot = current_snapshot(&state).await;
    let prompt = prompts::recommendation_prompt(&req.project, &snapshot);
    let text = complete(&state, &prompt).await?;

    let stack = prompts::split_stack(&text);
    if stack.is_empty() {
        return Err(api_error(StatusCode::NOT_FOUND, "No recommendations found"));
    }

    Ok(Json(RecommendationResponse {
        stack,
        latest_trends: LATEST_TRENDS.to_string(),
    }))
}

pub async fn prioritize_tasks(
    State(state): State<SharedState>,
    Json(req): Json<ProjectRequest>,
) -> ApiResult<Json<TaskPrioritizationResponse>> {
    require_project(&req.project)?;

    let snapshot = current_snapshot(&state).await;
    let prompt = prompts::prioritization_prompt(&req.project, &snapshot);
    let text = complete(&state, &prompt).await?;

    let prioritized_tasks = prompts::split_tasks(&text);
    if prioritized_tasks.is_empty() {
        return Err(api_error(StatusCode::NOT_FOUND, "No tasks found"));
    }

    Ok(Json(TaskPrioritizationResponse { prioritized_tasks }))
}

pub async fn chat(
    State(state): State<SharedState>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    if req.message.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "message must not be empty"));
    }
    let reply = complete(&state, &prompts::chat_prompt(&req.message)).await?;
    Ok(Json(ChatResponse { reply }))
}

fn require_project(project: &str) -> ApiResult<()> {
    if project.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, "project description must not be empty"));
    }
    Ok(())
}

async fn complete(state: &SharedState, prompt: &str) -> ApiResult<String> {
    state.provider.complete(prompt).await.map_err(|e| {
        error!(error = %e, "LLM completion failed");
        api_error(StatusCode::BAD_GATEWAY, e)
    })
}

/// Re-read the persisted snapshot. A missing or unreadable snapshot only
/// disables prompt adjustment.
async fn current_snapshot(state: &SharedState) -> AggregateSnapshot {
    let file = state.snapshot.clone();
    match tokio::task::spawn_blocking(move || file.load_or_empty()).await {
        Ok(Ok(snapshot)) => snapshot,
        Ok(Err(e)) => {
            warn!(error = %e, "feedback snapshot unreadable, prompts not adjusted");
            AggregateSnapshot::empty()
        }
        Err(e) => {
            warn!(error = %e, "snapshot task join failed");
            AggregateSnapshot::empty()
        }
    }
}
