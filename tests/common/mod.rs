//! Shared test fixtures: a scriptable in-memory provider adapter and a
//! dispatcher builder over the default capability registry.

// Not every test binary exercises every fixture.
#![allow(dead_code)]

use futures::future::BoxFuture;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use switchboard::dispatch::{Dispatcher, UsageLedger};
use switchboard::provider::{AdapterError, ProviderAdapter, ProviderReply};
use switchboard::registry::{CapabilityRegistry, ProviderId};

/// One scripted or default reply.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    Ok(String),
    Fail(String),
}

/// In-memory stand-in for a wire adapter.
///
/// Behavior per call, in priority order: fail if the prompt contains the
/// configured failure marker, then pop the front of the script queue, then
/// fall back to the default behavior. Every received prompt is recorded.
pub struct MockAdapter {
    provider: ProviderId,
    default: MockBehavior,
    script: Mutex<VecDeque<MockBehavior>>,
    failure_marker: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl MockAdapter {
    pub fn ok(provider: ProviderId, text: &str) -> Arc<Self> {
        Arc::new(Self {
            provider,
            default: MockBehavior::Ok(text.to_string()),
            script: Mutex::new(VecDeque::new()),
            failure_marker: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(provider: ProviderId) -> Arc<Self> {
        Arc::new(Self {
            provider,
            default: MockBehavior::Fail("induced failure".to_string()),
            script: Mutex::new(VecDeque::new()),
            failure_marker: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn scripted(
        provider: ProviderId,
        script: Vec<MockBehavior>,
        default: MockBehavior,
    ) -> Arc<Self> {
        Arc::new(Self {
            provider,
            default,
            script: Mutex::new(script.into()),
            failure_marker: None,
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Rebuild this adapter so any prompt containing `marker` fails.
    pub fn with_failure_marker(self: Arc<Self>, marker: &str) -> Arc<Self> {
        Arc::new(Self {
            provider: self.provider,
            default: self.default.clone(),
            script: Mutex::new(self.script.lock().unwrap().clone()),
            failure_marker: Some(marker.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ProviderAdapter for MockAdapter {
    fn provider(&self) -> ProviderId {
        self.provider
    }

    fn invoke(&self, prompt: String) -> BoxFuture<'_, Result<ProviderReply, AdapterError>> {
        Box::pin(async move {
            self.prompts.lock().unwrap().push(prompt.clone());

            if let Some(marker) = &self.failure_marker {
                if prompt.contains(marker) {
                    return Err(AdapterError::Api {
                        provider: self.provider,
                        status: 500,
                        message: "marker-induced failure".to_string(),
                    });
                }
            }

            let behavior = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.default.clone());

            match behavior {
                // Raw length/4 estimate, deliberately unclamped: short texts
                // yield 0 so the dispatcher's >=1 invariant gets exercised.
                MockBehavior::Ok(text) => Ok(ProviderReply {
                    tokens_used: (text.len() / 4) as u64,
                    text,
                }),
                MockBehavior::Fail(message) => Err(AdapterError::Api {
                    provider: self.provider,
                    status: 500,
                    message,
                }),
            }
        })
    }
}

/// Dispatcher over the default registry and the given mock adapters.
pub fn dispatcher_with(adapters: &[Arc<MockAdapter>]) -> Arc<Dispatcher> {
    let registry = Arc::new(CapabilityRegistry::with_default_profiles());
    let map: HashMap<ProviderId, Arc<dyn ProviderAdapter>> = adapters
        .iter()
        .map(|adapter| (adapter.provider(), adapter.clone() as Arc<dyn ProviderAdapter>))
        .collect();
    Arc::new(Dispatcher::new(registry, map, Arc::new(UsageLedger::new())))
}

/// All four providers answering successfully with the given texts.
pub fn all_ok() -> Vec<Arc<MockAdapter>> {
    vec![
        MockAdapter::ok(ProviderId::Anthropic, "anthropic answer"),
        MockAdapter::ok(ProviderId::OpenAi, "openai answer"),
        MockAdapter::ok(ProviderId::Gemini, "gemini answer"),
        MockAdapter::ok(ProviderId::Mistral, "mistral answer"),
    ]
}
