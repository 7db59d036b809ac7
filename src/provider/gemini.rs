//! Gemini generateContent adapter.
//!
//! Gemini addresses the model in the URL path rather than the body, and
//! reports usage under `usageMetadata`; both differences stay local here.

use crate::env;
use crate::provider::adapter::{
    AdapterError, ProviderAdapter, ProviderReply, ProviderSettings, estimate_tokens,
    truncate_message,
};
use crate::registry::ProviderId;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

pub struct GeminiAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl GeminiAdapter {
    pub fn new(client: reqwest::Client, settings: &ProviderSettings, default_model: &str) -> Self {
        Self {
            client,
            base_url: settings
                .endpoint
                .clone()
                .unwrap_or_else(|| env::endpoint::GEMINI.to_string()),
            api_key: settings.api_key.clone(),
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| default_model.to_string()),
        }
    }

    fn request_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    total_token_count: u64,
}

impl ProviderAdapter for GeminiAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn invoke(&self, prompt: String) -> BoxFuture<'_, Result<ProviderReply, AdapterError>> {
        Box::pin(async move {
            let api_key = self
                .api_key
                .as_deref()
                .ok_or(AdapterError::MissingCredential(ProviderId::Gemini))?;

            let body = GenerateRequest {
                contents: vec![Content {
                    parts: vec![Part { text: &prompt }],
                }],
            };

            let response = self
                .client
                .post(self.request_url())
                .header("x-goog-api-key", api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| AdapterError::network(ProviderId::Gemini, &e))?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(AdapterError::Api {
                    provider: ProviderId::Gemini,
                    status: status.as_u16(),
                    message: truncate_message(message),
                });
            }

            let reply: GenerateResponse = response
                .json()
                .await
                .map_err(|e| AdapterError::MalformedReply(ProviderId::Gemini, e.to_string()))?;

            let text: String = reply
                .candidates
                .into_iter()
                .next()
                .and_then(|candidate| candidate.content)
                .map(|content| {
                    content
                        .parts
                        .into_iter()
                        .filter_map(|part| part.text)
                        .collect()
                })
                .unwrap_or_default();
            if text.is_empty() {
                return Err(AdapterError::MalformedReply(
                    ProviderId::Gemini,
                    "response carried no candidates".to_string(),
                ));
            }

            let tokens_used = reply
                .usage_metadata
                .map(|u| u.total_token_count)
                .filter(|total| *total > 0)
                .unwrap_or_else(|| estimate_tokens(&text));

            Ok(ProviderReply { text, tokens_used })
        })
    }
}
