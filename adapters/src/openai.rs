//! Chat-completions summarization adapter.

use async_trait::async_trait;
use config::SummarizerConfig;
use errors::SummarizeError;
use pd_core::traits::Summarizer;
use pd_core::types::ApiKey;
use serde::Deserialize;

const SYSTEM_PROMPT: &str = "You summarize PDF documents. Produce a concise summary of the \
                             document text you are given, keeping the key points and \
                             conclusions.";

pub struct OpenAiSummarizer {
    client: reqwest::Client,
    base_url: String,
    model: String
}

impl OpenAiSummarizer {
    pub fn new(config: &SummarizerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>
}

fn network(e: reqwest::Error) -> SummarizeError {
    SummarizeError::Network {
        reason: e.to_string()
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    type Error = SummarizeError;

    async fn generate(&self, text: &str, credential: &ApiKey) -> Result<String, Self::Error> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": text }
            ]
        });

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(credential.as_str())
            .json(&body)
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        let body = response.text().await.map_err(network)?;
        if !status.is_success() {
            return Err(SummarizeError::Api {
                status: status.as_u16(),
                body
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|_| SummarizeError::EmptyResponse)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(SummarizeError::EmptyResponse)?;

        Ok(content)
    }
}
