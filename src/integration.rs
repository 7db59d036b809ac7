//! High-level system wiring.
//!
//! [`RoutingSystem`] assembles the registry, adapters, dispatcher, fan-out
//! aggregator, and team orchestrator from one [`RouterConfig`] and exposes
//! the three public operations collaborators call. Every invocation is
//! stateless; concurrent callers share only the read-only registry and the
//! append-only ledger.

use crate::analysis::TaskCategory;
use crate::cli::RouterConfig;
use crate::dispatch::{Dispatcher, ExecutionResult, UsageLedger, UsageTotals};
use crate::error::RouteError;
use crate::fanout::{Comparison, FanoutAggregator};
use crate::provider::{
    AnthropicAdapter, GeminiAdapter, MistralAdapter, OpenAiAdapter, ProviderAdapter,
};
use crate::registry::{CapabilityRegistry, ProviderId};
use crate::team::{TeamBuild, TeamError, TeamOrchestrator};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Fully wired routing core.
pub struct RoutingSystem {
    dispatcher: Arc<Dispatcher>,
    fanout: FanoutAggregator,
    team: TeamOrchestrator,
}

impl RoutingSystem {
    /// Wire the system from configuration. Credentials are not checked
    /// here: a missing key surfaces as a dispatch-time fallback, not a
    /// startup failure.
    pub fn new(config: &RouterConfig) -> Result<Self> {
        config.validate().context("invalid configuration")?;

        let registry = Arc::new(CapabilityRegistry::with_default_profiles());
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        let mut adapters: HashMap<ProviderId, Arc<dyn ProviderAdapter>> = HashMap::new();
        for profile in registry.profiles() {
            let settings = config.settings_for(profile.provider);
            let adapter: Arc<dyn ProviderAdapter> = match profile.provider {
                ProviderId::Anthropic => {
                    Arc::new(AnthropicAdapter::new(client.clone(), settings, &profile.model))
                }
                ProviderId::OpenAi => {
                    Arc::new(OpenAiAdapter::new(client.clone(), settings, &profile.model))
                }
                ProviderId::Gemini => {
                    Arc::new(GeminiAdapter::new(client.clone(), settings, &profile.model))
                }
                ProviderId::Mistral => {
                    Arc::new(MistralAdapter::new(client.clone(), settings, &profile.model))
                }
            };
            adapters.insert(profile.provider, adapter);
        }

        let ledger = Arc::new(UsageLedger::new());
        let dispatcher = Arc::new(Dispatcher::new(registry, adapters, ledger));

        Ok(Self {
            fanout: FanoutAggregator::new(dispatcher.clone()),
            team: TeamOrchestrator::new(dispatcher.clone()),
            dispatcher,
        })
    }

    /// Route one prompt to the best-fit provider with fallback.
    pub async fn generate(
        &self,
        prompt: &str,
        category: TaskCategory,
        provider_override: Option<ProviderId>,
    ) -> Result<ExecutionResult, RouteError> {
        self.dispatcher
            .generate(prompt, category, provider_override)
            .await
    }

    /// Run the same prompt across several providers and compare.
    pub async fn compare_across(
        &self,
        prompt: &str,
        category: TaskCategory,
        providers: &[ProviderId],
    ) -> Result<Comparison, RouteError> {
        self.fanout.compare_across(prompt, category, providers).await
    }

    /// Decompose a goal into subtasks, execute them, and integrate.
    pub async fn build_from_goal(
        &self,
        goal: &str,
        context: &serde_json::Value,
    ) -> Result<TeamBuild, TeamError> {
        self.team.build_from_goal(goal, context).await
    }

    /// Aggregate usage recorded by this process.
    pub async fn usage_totals(&self) -> UsageTotals {
        self.dispatcher.ledger().totals().await
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Registered providers, for CLI default fan-out sets.
    pub fn providers(&self) -> Vec<ProviderId> {
        self.dispatcher.registry().providers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_wires_from_default_config() {
        let system = RoutingSystem::new(&RouterConfig::default()).unwrap();
        assert_eq!(system.providers().len(), 4);
    }

    #[test]
    fn invalid_config_is_rejected_at_wiring() {
        let mut config = RouterConfig::default();
        config.gemini.endpoint = Some("::::".to_string());
        assert!(RoutingSystem::new(&config).is_err());
    }
}
