//! Prompt analysis feeding the selection heuristics.
//!
//! [`TaskAnalyzer::analyze`] is a pure function over the raw prompt text and
//! the caller-declared task category: no I/O, no failure modes. The keyword
//! lists driving complexity/creativity detection are a replaceable policy
//! table ([`KeywordPolicy`]), not a behavioral contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of task categories callers can declare.
///
/// Unrecognized labels default to [`TaskCategory::General`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskCategory {
    Scaffold,
    Component,
    Page,
    ApiDesign,
    Database,
    Code,
    General,
}

impl TaskCategory {
    /// Resolve a free-form label to a category, defaulting to `General`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "scaffold" => TaskCategory::Scaffold,
            "component" => TaskCategory::Component,
            "page" => TaskCategory::Page,
            "api-design" | "api_design" | "api" => TaskCategory::ApiDesign,
            "database" | "db" => TaskCategory::Database,
            "code" => TaskCategory::Code,
            _ => TaskCategory::General,
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskCategory::Scaffold => "scaffold",
            TaskCategory::Component => "component",
            TaskCategory::Page => "page",
            TaskCategory::ApiDesign => "api-design",
            TaskCategory::Database => "database",
            TaskCategory::Code => "code",
            TaskCategory::General => "general",
        };
        f.write_str(name)
    }
}

/// Complexity tier of a submitted prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// Ephemeral per-request analysis, produced once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAnalysis {
    pub category: TaskCategory,
    pub complexity: Complexity,
    pub estimated_tokens: u64,
    pub requires_large_context: bool,
    pub requires_code_generation: bool,
    pub requires_creativity: bool,
}

/// Signal keyword tables. Swap out to tune classification without touching
/// the analyzer itself.
#[derive(Debug, Clone)]
pub struct KeywordPolicy {
    pub complexity_signals: &'static [&'static str],
    pub code_signals: &'static [&'static str],
    pub creative_signals: &'static [&'static str],
}

impl Default for KeywordPolicy {
    fn default() -> Self {
        Self {
            complexity_signals: &[
                "complex",
                "advanced",
                "sophisticated",
                "intricate",
                "comprehensive",
            ],
            code_signals: &[
                "function", "class", "component", "api", "database", "schema", "endpoint",
            ],
            creative_signals: &["creative", "design", "beautiful", "modern", "innovative"],
        }
    }
}

/// Word-count thresholds for the complexity tiers.
const HIGH_COMPLEXITY_WORDS: usize = 100;
const MEDIUM_COMPLEXITY_WORDS: usize = 50;

/// Average token-per-word expansion used for the estimate.
const TOKENS_PER_WORD: f64 = 1.3;

/// Token estimate above which a prompt is considered large-context territory
/// by the selector (kept here next to the other analysis constants).
pub const LARGE_CONTEXT_TOKENS: u64 = 50_000;

/// Pure prompt classifier.
#[derive(Debug, Clone, Default)]
pub struct TaskAnalyzer {
    policy: KeywordPolicy,
}

impl TaskAnalyzer {
    pub fn new(policy: KeywordPolicy) -> Self {
        Self { policy }
    }

    /// Classify a prompt. Never fails.
    pub fn analyze(&self, prompt: &str, category: TaskCategory) -> TaskAnalysis {
        let lowered = prompt.to_lowercase();
        let word_count = prompt.split_whitespace().count();

        let has_complexity_signal = contains_any(&lowered, self.policy.complexity_signals);
        let has_code_signal = contains_any(&lowered, self.policy.code_signals);
        let has_creative_signal = contains_any(&lowered, self.policy.creative_signals);

        let complexity = if word_count > HIGH_COMPLEXITY_WORDS || has_complexity_signal {
            Complexity::High
        } else if word_count > MEDIUM_COMPLEXITY_WORDS || has_code_signal {
            Complexity::Medium
        } else {
            Complexity::Low
        };

        let estimated_tokens = (word_count as f64 * TOKENS_PER_WORD).ceil() as u64;

        let requires_large_context =
            complexity == Complexity::High || category == TaskCategory::Scaffold;
        let requires_code_generation = has_code_signal
            || matches!(
                category,
                TaskCategory::Scaffold
                    | TaskCategory::Component
                    | TaskCategory::ApiDesign
                    | TaskCategory::Database
            );
        let requires_creativity = has_creative_signal || category == TaskCategory::Component;

        TaskAnalysis {
            category,
            complexity,
            estimated_tokens,
            requires_large_context,
            requires_code_generation,
            requires_creativity,
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(prompt: &str, category: TaskCategory) -> TaskAnalysis {
        TaskAnalyzer::default().analyze(prompt, category)
    }

    #[test]
    fn short_plain_prompt_is_low_complexity() {
        let analysis = analyze("write a short greeting", TaskCategory::General);
        assert_eq!(analysis.complexity, Complexity::Low);
        assert!(!analysis.requires_large_context);
        assert!(!analysis.requires_code_generation);
        assert!(!analysis.requires_creativity);
    }

    #[test]
    fn complexity_keyword_forces_high() {
        let analysis = analyze("build a sophisticated pipeline", TaskCategory::General);
        assert_eq!(analysis.complexity, Complexity::High);
        assert!(analysis.requires_large_context);
    }

    #[test]
    fn code_keyword_forces_at_least_medium() {
        let analysis = analyze("add an endpoint for login", TaskCategory::General);
        assert_eq!(analysis.complexity, Complexity::Medium);
        assert!(analysis.requires_code_generation);
    }

    #[test]
    fn long_prompt_crosses_word_thresholds() {
        let medium = "word ".repeat(60);
        assert_eq!(analyze(&medium, TaskCategory::General).complexity, Complexity::Medium);

        let high = "word ".repeat(150);
        assert_eq!(analyze(&high, TaskCategory::General).complexity, Complexity::High);
    }

    #[test]
    fn token_estimate_is_monotonic_in_word_count() {
        let mut last = 0;
        for words in [0usize, 1, 10, 50, 100, 500] {
            let prompt = "token ".repeat(words);
            let estimate = analyze(&prompt, TaskCategory::General).estimated_tokens;
            assert!(estimate >= last, "estimate dropped at {words} words");
            last = estimate;
        }
    }

    #[test]
    fn token_estimate_matches_formula() {
        let analysis = analyze("one two three four", TaskCategory::General);
        // ceil(4 * 1.3) = 6
        assert_eq!(analysis.estimated_tokens, 6);
    }

    #[test]
    fn scaffold_category_requires_large_context_and_code() {
        let analysis = analyze("set up the project", TaskCategory::Scaffold);
        assert!(analysis.requires_large_context);
        assert!(analysis.requires_code_generation);
    }

    #[test]
    fn component_category_requires_creativity() {
        let analysis = analyze("build a navbar", TaskCategory::Component);
        assert!(analysis.requires_creativity);
        assert!(analysis.requires_code_generation);
    }

    #[test]
    fn creative_keyword_sets_creativity_flag() {
        let analysis = analyze("write a beautiful landing headline", TaskCategory::General);
        assert!(analysis.requires_creativity);
    }

    #[test]
    fn unknown_labels_default_to_general() {
        assert_eq!(TaskCategory::from_label("page"), TaskCategory::Page);
        assert_eq!(TaskCategory::from_label("API-Design"), TaskCategory::ApiDesign);
        assert_eq!(TaskCategory::from_label("???"), TaskCategory::General);
        assert_eq!(TaskCategory::from_label(""), TaskCategory::General);
    }

    #[test]
    fn empty_prompt_has_zero_estimate() {
        let analysis = analyze("", TaskCategory::General);
        assert_eq!(analysis.estimated_tokens, 0);
        assert_eq!(analysis.complexity, Complexity::Low);
    }
}
