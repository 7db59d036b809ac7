//! # Switchboard
//!
//! Routes natural-language generation tasks to one of several heterogeneous
//! LLM backends, each with its own cost, latency, context-window, and
//! quality profile, and coordinates the more advanced execution modes built
//! on top of that routing: parallel fan-out with consensus merging, and
//! multi-agent goal decomposition with integration.
//!
//! ## Architecture Overview
//!
//! - **[`registry`]**: static capability catalogue (context window, cost,
//!   speed/quality classes, strength tags) shared read-only by all callers
//! - **[`analysis`]**: pure prompt classification (complexity, token
//!   estimate, capability flags)
//! - **[`selector`]**: fixed-precedence rule table picking a provider, a
//!   model, and a ranked fallback chain
//! - **[`provider`]**: one wire-level adapter per backend, normalized to
//!   `{text, tokens_used}` behind a single trait
//! - **[`dispatch`]**: fallback-on-failure execution plus the append-only
//!   usage ledger
//! - **[`fanout`]**: concurrent same-prompt comparison with divergence
//!   flagging and consensus synthesis
//! - **[`team`]**: plan / assign / execute / integrate goal decomposition
//! - **[`integration`]**: the [`RoutingSystem`] facade wiring it all up
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use switchboard::{RouterConfig, RoutingSystem, TaskCategory};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = RouterConfig::load(None)?;
//!     let system = RoutingSystem::new(&config)?;
//!
//!     let result = system
//!         .generate("Build a login page", TaskCategory::Page, None)
//!         .await?;
//!     println!("[{}] {}", result.provider, result.text);
//!     Ok(())
//! }
//! ```

/// Static provider capability catalogue.
pub mod registry;

/// Pure prompt/task analysis feeding the selector.
pub mod analysis;

/// Provider selection: decision table, overrides, fallback ranking.
pub mod selector;

/// Wire-level adapters, one per backend.
pub mod provider;

/// Dispatch with fallback-on-failure and usage ledgering.
pub mod dispatch;

/// Fan-out comparison and consensus synthesis.
pub mod fanout;

/// Team-mode goal decomposition and integration.
pub mod team;

/// Dispatch-level error taxonomy.
pub mod error;

/// High-level system wiring and the public facade.
pub mod integration;

/// Endpoint and environment-variable constants.
pub mod env;

// CLI module for command-line interface
pub mod cli;

// Re-export the main routing types
pub use analysis::{Complexity, TaskAnalysis, TaskAnalyzer, TaskCategory};
pub use cli::{ConfigError, RouterConfig};
pub use dispatch::{Dispatcher, ExecutionResult, UsageLedger, UsageTotals};
pub use error::RouteError;
pub use fanout::{Comparison, FanoutAggregator, ProviderRun};
pub use integration::RoutingSystem;
pub use provider::{AdapterError, ProviderAdapter, ProviderReply, ProviderSettings};
pub use registry::{CapabilityProfile, CapabilityRegistry, ProviderId, QualityClass, SpeedClass, Strength};
pub use selector::{SelectionDecision, Selector};
pub use team::{SubtaskOutcome, SubtaskResult, TeamBuild, TeamError, TeamOrchestrator};
