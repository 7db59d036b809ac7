//! Static capability catalogue for the registered generation backends.
//!
//! The registry is built once at startup and never mutated afterwards, so it
//! can be shared across concurrent dispatches behind an `Arc` without locking.
//! Each provider carries a complete [`CapabilityProfile`] describing its
//! context window, per-token cost, speed/quality classes, and task strengths.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Identity of one generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Anthropic,
    OpenAi,
    Gemini,
    Mistral,
}

impl ProviderId {
    /// All providers the registry can know about, in declaration order.
    pub const ALL: [ProviderId; 4] = [
        ProviderId::Anthropic,
        ProviderId::OpenAi,
        ProviderId::Gemini,
        ProviderId::Mistral,
    ];
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderId::Anthropic => "anthropic",
            ProviderId::OpenAi => "openai",
            ProviderId::Gemini => "gemini",
            ProviderId::Mistral => "mistral",
        };
        f.write_str(name)
    }
}

impl FromStr for ProviderId {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(ProviderId::Anthropic),
            "openai" | "gpt" => Ok(ProviderId::OpenAi),
            "gemini" | "google" => Ok(ProviderId::Gemini),
            "mistral" => Ok(ProviderId::Mistral),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

/// Error returned when a provider name cannot be resolved.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown provider '{0}' (expected one of: anthropic, openai, gemini, mistral)")]
pub struct UnknownProvider(pub String);

/// Task-level strengths and weaknesses a backend can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strength {
    Architecture,
    ComplexReasoning,
    CodeGeneration,
    Creativity,
    Design,
    LargeContext,
    Reasoning,
    Speed,
    General,
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strength::Architecture => "architecture",
            Strength::ComplexReasoning => "complex-reasoning",
            Strength::CodeGeneration => "code-generation",
            Strength::Creativity => "creativity",
            Strength::Design => "design",
            Strength::LargeContext => "large-context",
            Strength::Reasoning => "reasoning",
            Strength::Speed => "speed",
            Strength::General => "general",
        };
        f.write_str(name)
    }
}

/// Latency class of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedClass {
    Fast,
    Medium,
    Slow,
}

/// Output quality class of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityClass {
    Low,
    Medium,
    High,
}

/// Complete capability description of one provider. Immutable after startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityProfile {
    pub provider: ProviderId,
    pub model: String,
    /// Context window size in tokens
    pub context_window: u64,
    /// Model-level cost estimate in USD per token (not metered truth)
    pub cost_per_token: f64,
    pub strengths: Vec<Strength>,
    pub weaknesses: Vec<Strength>,
    pub speed: SpeedClass,
    pub quality: QualityClass,
}

impl CapabilityProfile {
    pub fn has_strength(&self, strength: Strength) -> bool {
        self.strengths.contains(&strength)
    }
}

/// Error raised when the registry is handed an unusable profile set.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate capability profile for provider '{0}'")]
    DuplicateProvider(ProviderId),
    #[error("incomplete capability profile for provider '{0}': {1}")]
    IncompleteProfile(ProviderId, String),
    #[error("registry requires at least one capability profile")]
    Empty,
}

/// Read-only catalogue of provider capability profiles.
#[derive(Debug, Clone)]
pub struct CapabilityRegistry {
    profiles: HashMap<ProviderId, CapabilityProfile>,
}

impl CapabilityRegistry {
    /// Build a registry from explicit profiles, rejecting duplicates and
    /// incomplete entries.
    pub fn new(profiles: Vec<CapabilityProfile>) -> Result<Self, RegistryError> {
        if profiles.is_empty() {
            return Err(RegistryError::Empty);
        }
        let mut map = HashMap::with_capacity(profiles.len());
        for profile in profiles {
            Self::validate(&profile)?;
            if map.insert(profile.provider, profile.clone()).is_some() {
                return Err(RegistryError::DuplicateProvider(profile.provider));
            }
        }
        Ok(Self { profiles: map })
    }

    /// The built-in catalogue covering all four backends.
    pub fn with_default_profiles() -> Self {
        Self::new(default_profiles()).expect("built-in profiles are complete and unique")
    }

    fn validate(profile: &CapabilityProfile) -> Result<(), RegistryError> {
        if profile.model.trim().is_empty() {
            return Err(RegistryError::IncompleteProfile(
                profile.provider,
                "empty model identifier".to_string(),
            ));
        }
        if profile.context_window == 0 {
            return Err(RegistryError::IncompleteProfile(
                profile.provider,
                "zero context window".to_string(),
            ));
        }
        if profile.strengths.is_empty() {
            return Err(RegistryError::IncompleteProfile(
                profile.provider,
                "no strength tags".to_string(),
            ));
        }
        Ok(())
    }

    pub fn get(&self, provider: ProviderId) -> Option<&CapabilityProfile> {
        self.profiles.get(&provider)
    }

    pub fn contains(&self, provider: ProviderId) -> bool {
        self.profiles.contains_key(&provider)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Registered providers in stable declaration order.
    pub fn providers(&self) -> Vec<ProviderId> {
        ProviderId::ALL
            .into_iter()
            .filter(|id| self.profiles.contains_key(id))
            .collect()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &CapabilityProfile> {
        ProviderId::ALL.iter().filter_map(|id| self.profiles.get(id))
    }

    /// First registered provider carrying the given strength tag, preferring
    /// higher quality when several match.
    pub fn strongest_in(&self, strength: Strength) -> Option<&CapabilityProfile> {
        self.profiles()
            .filter(|p| p.has_strength(strength))
            .max_by(|a, b| {
                a.quality
                    .cmp(&b.quality)
                    .then_with(|| b.cost_per_token.total_cmp(&a.cost_per_token))
            })
    }

    /// Largest-context provider among those tagged with reasoning ability.
    pub fn largest_context_reasoner(&self) -> Option<&CapabilityProfile> {
        self.profiles()
            .filter(|p| p.has_strength(Strength::Reasoning) || p.has_strength(Strength::ComplexReasoning))
            .max_by_key(|p| p.context_window)
    }

    /// Fastest registered provider, breaking ties by lowest cost.
    pub fn fastest_cheapest(&self) -> Option<&CapabilityProfile> {
        self.profiles().min_by(|a, b| {
            speed_rank(a.speed)
                .cmp(&speed_rank(b.speed))
                .then_with(|| a.cost_per_token.total_cmp(&b.cost_per_token))
        })
    }
}

fn speed_rank(speed: SpeedClass) -> u8 {
    match speed {
        SpeedClass::Fast => 0,
        SpeedClass::Medium => 1,
        SpeedClass::Slow => 2,
    }
}

/// Built-in capability profiles for the four supported backends.
pub fn default_profiles() -> Vec<CapabilityProfile> {
    vec![
        CapabilityProfile {
            provider: ProviderId::Anthropic,
            model: "claude-sonnet-4".to_string(),
            context_window: 200_000,
            cost_per_token: 3.0e-6,
            strengths: vec![
                Strength::Architecture,
                Strength::ComplexReasoning,
                Strength::CodeGeneration,
            ],
            weaknesses: vec![Strength::Speed],
            speed: SpeedClass::Medium,
            quality: QualityClass::High,
        },
        CapabilityProfile {
            provider: ProviderId::OpenAi,
            model: "gpt-4o".to_string(),
            context_window: 128_000,
            cost_per_token: 2.5e-6,
            strengths: vec![Strength::Creativity, Strength::Design, Strength::General],
            weaknesses: vec![Strength::LargeContext],
            speed: SpeedClass::Medium,
            quality: QualityClass::High,
        },
        CapabilityProfile {
            provider: ProviderId::Gemini,
            model: "gemini-2.5-pro".to_string(),
            context_window: 1_048_576,
            cost_per_token: 1.25e-6,
            strengths: vec![Strength::LargeContext, Strength::Reasoning],
            weaknesses: vec![Strength::Speed],
            speed: SpeedClass::Slow,
            quality: QualityClass::High,
        },
        CapabilityProfile {
            provider: ProviderId::Mistral,
            model: "mistral-small-latest".to_string(),
            context_window: 32_768,
            cost_per_token: 1.0e-7,
            strengths: vec![Strength::Speed, Strength::General],
            weaknesses: vec![Strength::ComplexReasoning, Strength::LargeContext],
            speed: SpeedClass::Fast,
            quality: QualityClass::Medium,
        },
    ]
}
