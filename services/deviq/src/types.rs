use axum::{http::StatusCode, Json};
use feedback::{AggregateSnapshot, FeedbackRecord};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize)]
pub struct ProjectRequest {
    pub project: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecommendationResponse {
    pub stack: Vec<String>,
    pub latest_trends: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TaskPrioritizationResponse {
    pub prioritized_tasks: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FeedbackRequest {
    pub project: String,
    #[serde(default)]
    pub recommendation_or_prioritization: String,
    /// Number or string; stored verbatim.
    #[serde(default)]
    pub rating: serde_json::Value,
    #[serde(default)]
    pub feedback: String,
}

impl FeedbackRequest {
    pub fn into_record(self) -> FeedbackRecord {
        let rating = match self.rating {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        FeedbackRecord::new(
            self.project,
            self.recommendation_or_prioritization,
            rating,
            self.feedback,
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub analysis: AggregateSnapshot,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

pub fn api_error(status: StatusCode, error: impl ToString) -> (StatusCode, Json<ApiError>) {
    (status, Json(ApiError { error: error.to_string() }))
}
