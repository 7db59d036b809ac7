//! Dispatch-level error taxonomy.
//!
//! Adapter failures are caught inside the dispatcher and converted into the
//! next fallback attempt; only a fully exhausted chain surfaces here. The
//! team orchestrator layers its own error type on top (see [`crate::team`]).

use crate::registry::ProviderId;

/// Error returned by the dispatcher's public entry points.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// The chosen provider and every fallback raised an adapter error.
    #[error("all providers failed ({} attempted): {}", .attempts.len(), summarize(.attempts))]
    AllProvidersFailed {
        /// One `(provider, error)` pair per attempted hop, in attempt order.
        attempts: Vec<(ProviderId, String)>,
    },
}

fn summarize(attempts: &[(ProviderId, String)]) -> String {
    attempts
        .iter()
        .map(|(provider, error)| format!("{provider}: {error}"))
        .collect::<Vec<_>>()
        .join("; ")
}
