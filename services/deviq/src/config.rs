use anyhow::{bail, Context, Result};
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub llm_base_url: String,
    pub llm_api_key: Option<String>,
    pub llm_model: String,
    pub llm_max_tokens: u32,

    pub bind_addr: String,
    pub feedback_log: PathBuf,
    pub snapshot_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let llm_base_url = get_or("LLM_BASE_URL", "https://api.openai.com");
        let llm_api_key = lookup("LLM_API_KEY")
            .or_else(|| lookup("OPENAI_API_KEY"))
            .filter(|k| !k.trim().is_empty());
        let llm_model = get_or("LLM_MODEL", "gpt-4o-mini");
        let llm_max_tokens = get_or("LLM_MAX_TOKENS", "150")
            .parse::<u32>()
            .context("LLM_MAX_TOKENS must be a positive integer")?;

        let bind_addr = get_or("DEVIQ_BIND_ADDR", "127.0.0.1:8000");
        let feedback_log = PathBuf::from(get_or("FEEDBACK_LOG", "data/feedback.csv"));
        let snapshot_path = PathBuf::from(get_or("FEEDBACK_SNAPSHOT", "data/feedback_analysis.json"));

        // fail fast, fail loud
        if !llm_base_url.starts_with("http://") && !llm_base_url.starts_with("https://") {
            bail!("LLM_BASE_URL must start with http:// or https://");
        }
        if llm_max_tokens == 0 {
            bail!("LLM_MAX_TOKENS must be greater than zero");
        }

        Ok(Self {
            llm_base_url: llm_base_url.trim_end_matches('/').to_string(),
            llm_api_key,
            llm_model,
            llm_max_tokens,
            bind_addr,
            feedback_log,
            snapshot_path,
        })
    }
}
