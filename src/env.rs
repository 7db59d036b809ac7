//! Environment constants for the switchboard routing core.
//!
//! This module centralizes the hardcoded endpoint URLs, environment variable
//! names, and config-file locations used throughout the application, making
//! them easier to maintain and modify.

/// Main application directory name (hidden directory like .git, .vscode)
pub const SWITCHBOARD_DIR_NAME: &str = ".switchboard";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Project-local configuration file name
pub const LOCAL_CONFIG_FILE_NAME: &str = "switchboard.toml";

/// Default backend endpoints
pub mod endpoint {
    /// Anthropic Messages API
    pub const ANTHROPIC: &str = "https://api.anthropic.com/v1/messages";

    /// OpenAI chat completions API
    pub const OPENAI: &str = "https://api.openai.com/v1/chat/completions";

    /// Gemini generateContent API (model name is appended per-request)
    pub const GEMINI: &str = "https://generativelanguage.googleapis.com/v1beta/models";

    /// Mistral chat completions API
    pub const MISTRAL: &str = "https://api.mistral.ai/v1/chat/completions";
}

/// Environment variable names for per-provider credentials and overrides
pub mod var {
    pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const GEMINI_API_KEY: &str = "GEMINI_API_KEY";
    pub const MISTRAL_API_KEY: &str = "MISTRAL_API_KEY";

    pub const ANTHROPIC_BASE_URL: &str = "ANTHROPIC_BASE_URL";
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    pub const GEMINI_BASE_URL: &str = "GEMINI_BASE_URL";
    pub const MISTRAL_BASE_URL: &str = "MISTRAL_BASE_URL";
}

use std::path::PathBuf;

/// Build the user-level config file path, if a home directory is known
pub fn user_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(SWITCHBOARD_DIR_NAME).join(CONFIG_FILE_NAME))
}
