//! Anthropic Messages API adapter.

use crate::env;
use crate::provider::adapter::{
    AdapterError, ProviderAdapter, ProviderReply, ProviderSettings, estimate_tokens,
    truncate_message,
};
use crate::registry::ProviderId;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_OUTPUT_TOKENS: u32 = 8_192;

pub struct AnthropicAdapter {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl AnthropicAdapter {
    pub fn new(client: reqwest::Client, settings: &ProviderSettings, default_model: &str) -> Self {
        Self {
            client,
            endpoint: settings
                .endpoint
                .clone()
                .unwrap_or_else(|| env::endpoint::ANTHROPIC.to_string()),
            api_key: settings.api_key.clone(),
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| default_model.to_string()),
        }
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

impl ProviderAdapter for AnthropicAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn invoke(&self, prompt: String) -> BoxFuture<'_, Result<ProviderReply, AdapterError>> {
        Box::pin(async move {
            let api_key = self
                .api_key
                .as_deref()
                .ok_or(AdapterError::MissingCredential(ProviderId::Anthropic))?;

            let body = MessagesRequest {
                model: &self.model,
                max_tokens: MAX_OUTPUT_TOKENS,
                messages: vec![Message {
                    role: "user",
                    content: &prompt,
                }],
            };

            let response = self
                .client
                .post(&self.endpoint)
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
                .send()
                .await
                .map_err(|e| AdapterError::network(ProviderId::Anthropic, &e))?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(AdapterError::Api {
                    provider: ProviderId::Anthropic,
                    status: status.as_u16(),
                    message: truncate_message(message),
                });
            }

            let reply: MessagesResponse = response
                .json()
                .await
                .map_err(|e| AdapterError::MalformedReply(ProviderId::Anthropic, e.to_string()))?;

            let text: String = reply
                .content
                .into_iter()
                .filter_map(|block| block.text)
                .collect();
            if text.is_empty() {
                return Err(AdapterError::MalformedReply(
                    ProviderId::Anthropic,
                    "response carried no text content".to_string(),
                ));
            }

            let tokens_used = reply
                .usage
                .map(|u| u.input_tokens + u.output_tokens)
                .filter(|total| *total > 0)
                .unwrap_or_else(|| estimate_tokens(&text));

            Ok(ProviderReply { text, tokens_used })
        })
    }
}
