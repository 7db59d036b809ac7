//! Command line argument parsing
//!
//! Subcommands:
//! - `generate`: route one prompt through the dispatcher
//! - `compare`: fan the prompt out across several providers
//! - `team`: decompose a goal into subtasks and integrate the results

use crate::registry::{ProviderId, UnknownProvider};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "switchboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Routes generation tasks across heterogeneous LLM backends")]
pub struct Args {
    /// Explicit config file, bypassing discovery
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate text for a single prompt
    Generate {
        prompt: String,

        /// Task category (scaffold, component, page, api-design, database,
        /// code, general); unrecognized labels fall back to general
        #[arg(long, default_value = "general")]
        category: String,

        /// Force a specific provider instead of auto selection
        #[arg(long, default_value = "auto")]
        provider: String,
    },

    /// Run the same prompt across several providers and compare
    Compare {
        prompt: String,

        #[arg(long, default_value = "general")]
        category: String,

        /// Comma-separated provider list (default: every registered provider)
        #[arg(long, value_delimiter = ',')]
        providers: Vec<String>,
    },

    /// Decompose a goal into subtasks, execute them, and integrate
    Team {
        goal: String,

        /// JSON file with shared project context passed to every subtask
        #[arg(long)]
        context: Option<PathBuf>,
    },
}

/// Resolve a `--provider` flag value; the sentinel "auto" means no override.
pub fn parse_provider_flag(value: &str) -> Result<Option<ProviderId>, UnknownProvider> {
    if value.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    value.parse().map(Some)
}
