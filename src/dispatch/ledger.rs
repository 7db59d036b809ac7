//! Append-only usage ledger.
//!
//! One record per successful dispatch, safe for concurrent writers. Costs
//! are model-level estimates, not metered truth.

use crate::analysis::TaskCategory;
use crate::registry::ProviderId;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;

/// One successful dispatch.
#[derive(Debug, Clone, Serialize)]
pub struct UsageRecord {
    pub provider: ProviderId,
    pub model: String,
    pub category: TaskCategory,
    pub tokens: u64,
    pub cost: f64,
    #[serde(with = "duration_millis")]
    pub latency: Duration,
    pub recorded_at: DateTime<Utc>,
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u128(d.as_millis())
    }
}

/// Aggregate view over the ledger.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UsageTotals {
    pub requests: u64,
    pub tokens: u64,
    pub cost: f64,
    pub per_provider: HashMap<ProviderId, ProviderTotals>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProviderTotals {
    pub requests: u64,
    pub tokens: u64,
    pub cost: f64,
}

#[derive(Debug, Default)]
pub struct UsageLedger {
    entries: Mutex<Vec<UsageRecord>>,
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, record: UsageRecord) {
        let mut entries = self.entries.lock().await;
        entries.push(record);
    }

    /// Snapshot of every record, in append order.
    pub async fn snapshot(&self) -> Vec<UsageRecord> {
        self.entries.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub async fn totals(&self) -> UsageTotals {
        let entries = self.entries.lock().await;
        let mut totals = UsageTotals::default();
        for record in entries.iter() {
            totals.requests += 1;
            totals.tokens += record.tokens;
            totals.cost += record.cost;

            let provider = totals.per_provider.entry(record.provider).or_default();
            provider.requests += 1;
            provider.tokens += record.tokens;
            provider.cost += record.cost;
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(provider: ProviderId, tokens: u64, cost: f64) -> UsageRecord {
        UsageRecord {
            provider,
            model: "test-model".to_string(),
            category: TaskCategory::General,
            tokens,
            cost,
            latency: Duration::from_millis(10),
            recorded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn totals_aggregate_across_providers() {
        let ledger = UsageLedger::new();
        ledger.record(record(ProviderId::Anthropic, 100, 0.0003)).await;
        ledger.record(record(ProviderId::Anthropic, 50, 0.00015)).await;
        ledger.record(record(ProviderId::Mistral, 20, 0.000002)).await;

        let totals = ledger.totals().await;
        assert_eq!(totals.requests, 3);
        assert_eq!(totals.tokens, 170);
        assert_eq!(totals.per_provider[&ProviderId::Anthropic].requests, 2);
        assert_eq!(totals.per_provider[&ProviderId::Mistral].tokens, 20);
    }

    #[tokio::test]
    async fn snapshot_preserves_append_order() {
        let ledger = UsageLedger::new();
        ledger.record(record(ProviderId::OpenAi, 1, 0.0)).await;
        ledger.record(record(ProviderId::Gemini, 2, 0.0)).await;

        let snapshot = ledger.snapshot().await;
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].provider, ProviderId::OpenAi);
        assert_eq!(snapshot[1].provider, ProviderId::Gemini);
    }

    #[tokio::test]
    async fn concurrent_writers_lose_nothing() {
        let ledger = std::sync::Arc::new(UsageLedger::new());
        let mut handles = Vec::new();
        for _ in 0..16 {
            let ledger = ledger.clone();
            handles.push(tokio::spawn(async move {
                ledger.record(record(ProviderId::Mistral, 1, 0.0)).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(ledger.len().await, 16);
    }
}
