//! Provider adapter seam.
//!
//! One adapter exclusively owns the wire-level call to a single backend and
//! normalizes whatever that backend returns into a [`ProviderReply`]. The
//! dispatcher never branches on provider identity beyond table lookup; every
//! backend difference (auth header, request shape, response shape) stays
//! behind this trait.

use crate::registry::ProviderId;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// Normalized reply from any backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    pub text: String,
    /// Total tokens consumed; estimated from text length when the backend
    /// omits usage metadata. Always >= 1.
    pub tokens_used: u64,
}

/// Uniform adapter failure kind. Every variant is retryable against the
/// next fallback provider.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AdapterError {
    #[error("no credential configured for {0}")]
    MissingCredential(ProviderId),
    #[error("network error talking to {0}: {1}")]
    Network(ProviderId, String),
    #[error("{provider} returned status {status}: {message}")]
    Api {
        provider: ProviderId,
        status: u16,
        message: String,
    },
    #[error("malformed reply from {0}: {1}")]
    MalformedReply(ProviderId, String),
}

impl AdapterError {
    pub fn provider(&self) -> ProviderId {
        match self {
            AdapterError::MissingCredential(p)
            | AdapterError::Network(p, _)
            | AdapterError::MalformedReply(p, _) => *p,
            AdapterError::Api { provider, .. } => *provider,
        }
    }

    pub(crate) fn network(provider: ProviderId, error: &reqwest::Error) -> Self {
        let detail = if error.is_timeout() {
            "request timed out".to_string()
        } else {
            error.to_string()
        };
        AdapterError::Network(provider, detail)
    }
}

/// Per-provider connection settings from process configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderSettings {
    /// Endpoint override; the adapter's built-in default applies when unset.
    pub endpoint: Option<String>,
    /// Bearer credential. Absence surfaces at dispatch time, not startup.
    pub api_key: Option<String>,
    /// Model override; the capability profile's model applies when unset.
    pub model: Option<String>,
}

/// Capability interface over one generation backend.
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> ProviderId;

    /// Execute one generation call and normalize the reply.
    fn invoke(&self, prompt: String) -> BoxFuture<'_, Result<ProviderReply, AdapterError>>;
}

/// Character-count token estimate (~4 chars per token), used when a backend
/// omits usage metadata. Never returns 0.
pub(crate) fn estimate_tokens(text: &str) -> u64 {
    ((text.len() as f64 / 4.0).ceil() as u64).max(1)
}

/// Cap upstream error bodies so log lines and error chains stay readable.
pub(crate) fn truncate_message(message: String) -> String {
    const MAX_CHARS: usize = 300;
    if message.chars().count() <= MAX_CHARS {
        message
    } else {
        let truncated: String = message.chars().take(MAX_CHARS).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_estimate_never_returns_zero() {
        assert_eq!(estimate_tokens(""), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let long = "x".repeat(1000);
        let truncated = truncate_message(long);
        assert!(truncated.len() < 400);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn error_exposes_originating_provider() {
        let err = AdapterError::Api {
            provider: ProviderId::Gemini,
            status: 429,
            message: "quota".to_string(),
        };
        assert_eq!(err.provider(), ProviderId::Gemini);
    }
}
