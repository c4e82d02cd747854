use anyhow::{anyhow, Context};
use async_trait::async_trait;

/// OpenAI-compatible chat completions endpoint (OpenAI, LM Studio, vLLM, ...).
pub struct OpenAiProvider {
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiProvider {
    pub fn new(base_url: String, api_key: Option<String>, model: String, max_tokens: u32) -> Self {
        Self {
            base_url,
            api_key,
            model,
            max_tokens,
            client: reqwest::Client::new(),
        }
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }
}

#[async_trait]
impl crate::provider::LLMProvider for OpenAiProvider {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{"role":"user","content": prompt}],
            "max_tokens": self.max_tokens,
            "temperature": 0.2
        });

        let url = format!("{}/v1/chat/completions", self.base_url);
        let resp = self
            .authorized(self.client.post(url).json(&body))
            .send()
            .await
            .context("completion request failed")?
            .error_for_status()?;
        let json: serde_json::Value = resp.json().await.context("completion body was not JSON")?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| anyhow!("completion response had no message content"))
    }

    async fn ping(&self) -> anyhow::Result<()> {
        let url = format!("{}/v1/models", self.base_url);
        self.authorized(self.client.get(url))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    fn info(&self) -> crate::provider::ProviderInfo {
        crate::provider::ProviderInfo {
            name: "openai-compatible".to_string(),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
        }
    }
}
