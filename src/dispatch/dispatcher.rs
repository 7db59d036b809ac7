//! Selection execution with fallback-on-failure.
//!
//! The dispatcher walks the chosen provider followed by the selector's
//! ranked fallback list. Each hop is independent: an adapter failure is
//! logged and converted into the next attempt, never surfaced until the
//! whole chain is exhausted. One ledger write per success, none on total
//! failure.

use crate::analysis::TaskCategory;
use crate::dispatch::ledger::{UsageLedger, UsageRecord};
use crate::error::RouteError;
use crate::provider::adapter::ProviderAdapter;
use crate::registry::{CapabilityRegistry, ProviderId};
use crate::selector::{SelectionDecision, Selector};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

/// Outcome of one successful dispatch. `provider` is the backend that
/// actually answered, which may be a fallback rather than the initial
/// choice.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub text: String,
    pub provider: ProviderId,
    pub model: String,
    pub tokens_used: u64,
    pub cost: f64,
}

/// Routes prompts to adapters according to selector decisions.
pub struct Dispatcher {
    registry: Arc<CapabilityRegistry>,
    selector: Selector,
    adapters: HashMap<ProviderId, Arc<dyn ProviderAdapter>>,
    ledger: Arc<UsageLedger>,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<CapabilityRegistry>,
        adapters: HashMap<ProviderId, Arc<dyn ProviderAdapter>>,
        ledger: Arc<UsageLedger>,
    ) -> Self {
        let selector = Selector::new(registry.clone());
        Self {
            registry,
            selector,
            adapters,
            ledger,
        }
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &Arc<UsageLedger> {
        &self.ledger
    }

    /// Generate text for a prompt, trying the selected provider and then
    /// each fallback in order. Fails only when every candidate errors.
    pub async fn generate(
        &self,
        prompt: &str,
        category: TaskCategory,
        override_provider: Option<ProviderId>,
    ) -> Result<ExecutionResult, RouteError> {
        let decision = self.selector.select(prompt, category, override_provider);
        self.execute(prompt, category, &decision).await
    }

    async fn execute(
        &self,
        prompt: &str,
        category: TaskCategory,
        decision: &SelectionDecision,
    ) -> Result<ExecutionResult, RouteError> {
        let request_id = Uuid::new_v4();
        info!(
            %request_id,
            provider = %decision.provider,
            model = %decision.model,
            %category,
            rationale = %decision.rationale,
            "dispatching generation request"
        );

        let mut attempts: Vec<(ProviderId, String)> = Vec::new();

        let candidates =
            std::iter::once(decision.provider).chain(decision.fallbacks.iter().copied());
        for candidate in candidates {
            let Some(adapter) = self.adapters.get(&candidate) else {
                attempts.push((candidate, "no adapter configured".to_string()));
                continue;
            };

            let started = Instant::now();
            match adapter.invoke(prompt.to_string()).await {
                Ok(reply) => {
                    let latency = started.elapsed();
                    // The fallback list only ever holds registered providers,
                    // so the profile lookup cannot miss.
                    let profile = self
                        .registry
                        .get(candidate)
                        .expect("dispatched provider has a capability profile");
                    let tokens = reply.tokens_used.max(1);
                    let cost = tokens as f64 * profile.cost_per_token;

                    self.ledger
                        .record(UsageRecord {
                            provider: candidate,
                            model: profile.model.clone(),
                            category,
                            tokens,
                            cost,
                            latency,
                            recorded_at: Utc::now(),
                        })
                        .await;

                    info!(
                        %request_id,
                        provider = %candidate,
                        tokens,
                        cost,
                        duration_ms = latency.as_millis() as u64,
                        fell_back = candidate != decision.provider,
                        "generation request completed"
                    );

                    return Ok(ExecutionResult {
                        text: reply.text,
                        provider: candidate,
                        model: profile.model.clone(),
                        tokens_used: tokens,
                        cost,
                    });
                }
                Err(error) => {
                    warn!(
                        %request_id,
                        provider = %candidate,
                        %error,
                        "provider attempt failed, trying next fallback"
                    );
                    attempts.push((candidate, error.to_string()));
                }
            }
        }

        warn!(%request_id, attempts = attempts.len(), "all providers exhausted");
        Err(RouteError::AllProvidersFailed { attempts })
    }
}
