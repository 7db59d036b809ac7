//! OpenAI chat completions adapter.

use crate::env;
use crate::provider::adapter::{
    AdapterError, ProviderAdapter, ProviderReply, ProviderSettings, estimate_tokens,
    truncate_message,
};
use crate::registry::ProviderId;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

pub struct OpenAiAdapter {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiAdapter {
    pub fn new(client: reqwest::Client, settings: &ProviderSettings, default_model: &str) -> Self {
        Self {
            client,
            endpoint: settings
                .endpoint
                .clone()
                .unwrap_or_else(|| env::endpoint::OPENAI.to_string()),
            api_key: settings.api_key.clone(),
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| default_model.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    #[serde(default)]
    total_tokens: u64,
}

impl ProviderAdapter for OpenAiAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::OpenAi
    }

    fn invoke(&self, prompt: String) -> BoxFuture<'_, Result<ProviderReply, AdapterError>> {
        Box::pin(async move {
            let api_key = self
                .api_key
                .as_deref()
                .ok_or(AdapterError::MissingCredential(ProviderId::OpenAi))?;

            let body = ChatRequest {
                model: &self.model,
                messages: vec![ChatMessage {
                    role: "user",
                    content: &prompt,
                }],
            };

            let response = self
                .client
                .post(&self.endpoint)
                .bearer_auth(api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| AdapterError::network(ProviderId::OpenAi, &e))?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(AdapterError::Api {
                    provider: ProviderId::OpenAi,
                    status: status.as_u16(),
                    message: truncate_message(message),
                });
            }

            let reply: ChatResponse = response
                .json()
                .await
                .map_err(|e| AdapterError::MalformedReply(ProviderId::OpenAi, e.to_string()))?;

            let text = reply
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .unwrap_or_default();
            if text.is_empty() {
                return Err(AdapterError::MalformedReply(
                    ProviderId::OpenAi,
                    "response carried no choices".to_string(),
                ));
            }

            let tokens_used = reply
                .usage
                .map(|u| u.total_tokens)
                .filter(|total| *total > 0)
                .unwrap_or_else(|| estimate_tokens(&text));

            Ok(ProviderReply { text, tokens_used })
        })
    }
}
