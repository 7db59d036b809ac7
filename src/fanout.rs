//! Fan-out comparison across providers.
//!
//! Runs the same prompt concurrently against a requested set of providers,
//! joins on every launched call (a slow participant delays the aggregate but
//! a failing one never aborts the others), flags divergent responses by
//! length, and optionally synthesizes a consensus answer through one more
//! dispatch.

use crate::analysis::TaskCategory;
use crate::dispatch::{Dispatcher, ExecutionResult};
use crate::error::RouteError;
use crate::registry::ProviderId;
use futures::future::join_all;
use std::fmt::Write as _;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Fraction of the mean response length beyond which a response is flagged
/// as divergent. Heuristic, kept tunable rather than load-bearing.
pub const DIVERGENCE_THRESHOLD: f64 = 0.30;

/// One provider's run within a comparison. `requested` is the provider the
/// caller asked for; the embedded result names whichever backend actually
/// answered after that provider's own fallback chain.
#[derive(Debug, Clone)]
pub struct ProviderRun {
    pub requested: ProviderId,
    pub result: ExecutionResult,
    pub latency: Duration,
}

/// Aggregate outcome of a comparison.
#[derive(Debug, Clone)]
pub struct Comparison {
    pub runs: Vec<ProviderRun>,
    /// Human-readable notes on responses whose length deviates from the
    /// mean by more than [`DIVERGENCE_THRESHOLD`].
    pub differences: Vec<String>,
    /// Synthesized "best of all" answer, present when any difference was
    /// flagged and the synthesis dispatch succeeded.
    pub consensus: Option<String>,
}

pub struct FanoutAggregator {
    dispatcher: Arc<Dispatcher>,
}

impl FanoutAggregator {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Run `prompt` across every provider in `providers` concurrently and
    /// collect all settled results. Fails only if every requested provider
    /// fails (each request already recovers through its own fallbacks).
    pub async fn compare_across(
        &self,
        prompt: &str,
        category: TaskCategory,
        providers: &[ProviderId],
    ) -> Result<Comparison, RouteError> {
        info!(count = providers.len(), %category, "starting fan-out comparison");

        let calls = providers.iter().map(|&requested| {
            let dispatcher = self.dispatcher.clone();
            async move {
                let started = Instant::now();
                let outcome = dispatcher.generate(prompt, category, Some(requested)).await;
                (requested, started.elapsed(), outcome)
            }
        });

        let mut runs = Vec::with_capacity(providers.len());
        let mut failures: Vec<(ProviderId, String)> = Vec::new();
        for (requested, latency, outcome) in join_all(calls).await {
            match outcome {
                Ok(result) => runs.push(ProviderRun {
                    requested,
                    result,
                    latency,
                }),
                Err(error) => {
                    warn!(provider = %requested, %error, "fan-out participant failed");
                    failures.push((requested, error.to_string()));
                }
            }
        }

        if runs.is_empty() {
            return Err(RouteError::AllProvidersFailed { attempts: failures });
        }

        let differences = flag_divergent(&runs);
        let consensus = if differences.is_empty() {
            None
        } else {
            self.synthesize(prompt, category, &runs).await
        };

        info!(
            settled = runs.len(),
            failed = failures.len(),
            flagged = differences.len(),
            consensus = consensus.is_some(),
            "fan-out comparison complete"
        );

        Ok(Comparison {
            runs,
            differences,
            consensus,
        })
    }

    async fn synthesize(
        &self,
        prompt: &str,
        category: TaskCategory,
        runs: &[ProviderRun],
    ) -> Option<String> {
        let meta_prompt = consensus_prompt(prompt, runs);
        match self.dispatcher.generate(&meta_prompt, category, None).await {
            Ok(result) => Some(result.text),
            Err(error) => {
                // The comparison itself succeeded; a failed synthesis leaves
                // the per-provider results intact with no consensus field.
                warn!(%error, "consensus synthesis failed");
                None
            }
        }
    }
}

fn flag_divergent(runs: &[ProviderRun]) -> Vec<String> {
    if runs.len() < 2 {
        return Vec::new();
    }

    let mean =
        runs.iter().map(|r| r.result.text.len() as f64).sum::<f64>() / runs.len() as f64;
    let allowed = mean * DIVERGENCE_THRESHOLD;

    runs.iter()
        .filter(|run| (run.result.text.len() as f64 - mean).abs() > allowed)
        .map(|run| {
            format!(
                "{} response length {} deviates more than {:.0}% from the mean of {:.0}",
                run.requested,
                run.result.text.len(),
                DIVERGENCE_THRESHOLD * 100.0,
                mean
            )
        })
        .collect()
}

fn consensus_prompt(prompt: &str, runs: &[ProviderRun]) -> String {
    let mut meta = String::new();
    let _ = writeln!(
        meta,
        "Multiple assistants answered the same request. Synthesize one answer \
         that combines the best of each response.\n\nOriginal request:\n{prompt}\n"
    );
    for (index, run) in runs.iter().enumerate() {
        let _ = writeln!(
            meta,
            "--- Response {} (from {}) ---\n{}\n",
            index + 1,
            run.requested,
            run.result.text
        );
    }
    meta.push_str("Produce the single best combined answer.");
    meta
}
