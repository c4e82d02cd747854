use axum::{extract::State, Json};

pub async fn get_health(State(state): State<crate::state::SharedState>) -> Json<serde_json::Value> {
    let info = state.provider.info();
    let (reachable, error) = match state.provider.ping().await {
        Ok(()) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };

    Json(serde_json::json!({
        "provider": info,
        "reachable": reachable,
        "error": error,
        "started_at": state.started_at,
    }))
}
