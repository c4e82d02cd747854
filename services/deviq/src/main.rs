mod config;
mod prompts;
mod provider;
mod provider_openai;
mod routes;
mod routes_advice;
mod routes_feedback;
mod routes_health;
mod state;
mod store_exec;
mod types;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::provider::LLMProvider;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;

    ensure_parent_dir(&cfg.feedback_log)?;
    ensure_parent_dir(&cfg.snapshot_path)?;

    let provider = crate::provider_openai::OpenAiProvider::new(
        cfg.llm_base_url.clone(),
        cfg.llm_api_key.clone(),
        cfg.llm_model.clone(),
        cfg.llm_max_tokens,
    );

    // The provider may come up later; only warn.
    match provider.ping().await {
        Ok(()) => info!(base_url = %cfg.llm_base_url, "llm provider: ok"),
        Err(e) => warn!(base_url = %cfg.llm_base_url, error = %e, "llm provider unreachable at startup"),
    }

    let app_state = Arc::new(AppState::new(&cfg, Arc::new(provider)));
    let app = crate::routes::build_router(app_state);

    let addr = &cfg.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(
        feedback_log = %cfg.feedback_log.display(),
        snapshot = %cfg.snapshot_path.display(),
        "deviq listening on http://{addr}"
    );
    axum::serve(listener, app).await.context("server exited")?;

    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }
    Ok(())
}
