//! Provider selection.
//!
//! [`Selector::select`] is a pure decision function: identical inputs always
//! produce identical decisions, and nothing here performs I/O. The auto
//! heuristic is a fixed-precedence rule table ([`default_rules`]) evaluated
//! first-match-wins against the prompt's [`TaskAnalysis`]; a caller-supplied
//! override short-circuits the table entirely.

use crate::analysis::{
    Complexity, LARGE_CONTEXT_TOKENS, TaskAnalysis, TaskAnalyzer, TaskCategory,
};
use crate::registry::{CapabilityRegistry, ProviderId, SpeedClass, Strength};
use serde::Serialize;
use std::sync::Arc;

/// One entry in the selection decision table.
///
/// `applies` gates the rule on the task analysis; `choose` resolves it to a
/// concrete provider against the registry. A rule whose `choose` finds no
/// matching provider is skipped and evaluation continues down the table.
#[derive(Clone)]
pub struct SelectionRule {
    pub name: &'static str,
    pub applies: fn(&TaskAnalysis) -> bool,
    pub choose: fn(&CapabilityRegistry) -> Option<ProviderId>,
}

impl std::fmt::Debug for SelectionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionRule").field("name", &self.name).finish()
    }
}

/// The built-in decision table, in precedence order.
pub fn default_rules() -> Vec<SelectionRule> {
    vec![
        SelectionRule {
            name: "scaffold-or-database",
            applies: |a| matches!(a.category, TaskCategory::Scaffold | TaskCategory::Database),
            choose: architecture_specialist,
        },
        SelectionRule {
            name: "creative-component",
            applies: |a| a.category == TaskCategory::Component && a.requires_creativity,
            choose: |r| r.strongest_in(Strength::Creativity).map(|p| p.provider),
        },
        SelectionRule {
            name: "oversized-context",
            applies: |a| a.estimated_tokens > LARGE_CONTEXT_TOKENS,
            choose: |r| r.largest_context_reasoner().map(|p| p.provider),
        },
        SelectionRule {
            name: "complex-code",
            applies: |a| a.complexity == Complexity::High && a.requires_code_generation,
            choose: |r| r.largest_context_reasoner().map(|p| p.provider),
        },
        SelectionRule {
            name: "lightweight",
            applies: |a| a.complexity == Complexity::Low || a.category == TaskCategory::General,
            choose: |r| r.fastest_cheapest().map(|p| p.provider),
        },
        SelectionRule {
            name: "api-or-code",
            applies: |a| matches!(a.category, TaskCategory::ApiDesign | TaskCategory::Code),
            choose: architecture_specialist,
        },
        SelectionRule {
            name: "default",
            applies: |_| true,
            choose: |r| r.fastest_cheapest().map(|p| p.provider),
        },
    ]
}

fn architecture_specialist(registry: &CapabilityRegistry) -> Option<ProviderId> {
    registry
        .strongest_in(Strength::Architecture)
        .or_else(|| registry.strongest_in(Strength::ComplexReasoning))
        .map(|p| p.provider)
}

/// Ephemeral outcome of one selection, consumed by the dispatcher.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionDecision {
    pub provider: ProviderId,
    pub model: String,
    /// Observability only; has no behavioral effect.
    pub rationale: String,
    pub estimated_cost: f64,
    /// Rough wall-clock estimate in seconds, from speed class x complexity.
    pub estimated_latency_secs: f64,
    /// Alternates to try on failure, excluding the chosen provider, ordered
    /// by descending quality then ascending cost.
    pub fallbacks: Vec<ProviderId>,
}

/// Pure provider-selection engine over a shared read-only registry.
#[derive(Debug, Clone)]
pub struct Selector {
    registry: Arc<CapabilityRegistry>,
    analyzer: TaskAnalyzer,
    rules: Vec<SelectionRule>,
}

impl Selector {
    pub fn new(registry: Arc<CapabilityRegistry>) -> Self {
        Self::with_rules(registry, default_rules())
    }

    pub fn with_rules(registry: Arc<CapabilityRegistry>, rules: Vec<SelectionRule>) -> Self {
        Self {
            registry,
            analyzer: TaskAnalyzer::default(),
            rules,
        }
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Pick a provider for the prompt.
    ///
    /// A registered `override_provider` wins unconditionally; `None` (or an
    /// override without a capability profile) runs the auto decision table.
    pub fn select(
        &self,
        prompt: &str,
        category: TaskCategory,
        override_provider: Option<ProviderId>,
    ) -> SelectionDecision {
        let analysis = self.analyzer.analyze(prompt, category);

        if let Some(requested) = override_provider {
            if let Some(profile) = self.registry.get(requested) {
                return self.decision(
                    profile.provider,
                    &analysis,
                    format!("caller override: {requested}"),
                );
            }
            // Unregistered override: fall through to auto selection.
        }

        let (rule_name, provider) = self
            .rules
            .iter()
            .filter(|rule| (rule.applies)(&analysis))
            .find_map(|rule| (rule.choose)(&self.registry).map(|id| (rule.name, id)))
            .expect("registry is non-empty and the default rule always resolves");

        let strengths = self
            .registry
            .get(provider)
            .map(|p| {
                p.strengths
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        self.decision(
            provider,
            &analysis,
            format!("rule '{rule_name}' matched {provider} (strengths: [{strengths}])"),
        )
    }

    /// Analyze without selecting; exposed for orchestration callers.
    pub fn analyze(&self, prompt: &str, category: TaskCategory) -> TaskAnalysis {
        self.analyzer.analyze(prompt, category)
    }

    fn decision(
        &self,
        provider: ProviderId,
        analysis: &TaskAnalysis,
        rationale: String,
    ) -> SelectionDecision {
        let profile = self
            .registry
            .get(provider)
            .expect("chosen provider always has a profile");

        let mut fallbacks: Vec<&crate::registry::CapabilityProfile> = self
            .registry
            .profiles()
            .filter(|p| p.provider != provider)
            .collect();
        fallbacks.sort_by(|a, b| {
            b.quality
                .cmp(&a.quality)
                .then_with(|| a.cost_per_token.total_cmp(&b.cost_per_token))
        });

        SelectionDecision {
            provider,
            model: profile.model.clone(),
            rationale,
            estimated_cost: analysis.estimated_tokens as f64 * profile.cost_per_token,
            estimated_latency_secs: base_latency_secs(profile.speed)
                * complexity_multiplier(analysis.complexity),
            fallbacks: fallbacks.into_iter().map(|p| p.provider).collect(),
        }
    }
}

fn base_latency_secs(speed: SpeedClass) -> f64 {
    match speed {
        SpeedClass::Fast => 2.0,
        SpeedClass::Medium => 4.0,
        SpeedClass::Slow => 8.0,
    }
}

fn complexity_multiplier(complexity: Complexity) -> f64 {
    match complexity {
        Complexity::Low => 1.0,
        Complexity::Medium => 1.5,
        Complexity::High => 2.5,
    }
}
