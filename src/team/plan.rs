//! Architect-plan parsing.
//!
//! The plan phase asks the architecture-strength provider for a JSON array
//! of subtasks. Models wrap JSON in markdown fences or prose often enough
//! that parsing first extracts the outermost array before deserializing.
//! Anything that cannot be shaped into `(id, description, category)` is a
//! hard [`PlanParseError`]; there is no silent default plan.

use crate::analysis::TaskCategory;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::sync::OnceLock;

/// Specialist lane a subtask is planned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtaskCategory {
    Frontend,
    Backend,
    Database,
    Testing,
}

impl SubtaskCategory {
    /// Specialist role label used in assignment records and prompts.
    pub fn role_label(&self) -> &'static str {
        match self {
            SubtaskCategory::Frontend => "frontend specialist",
            SubtaskCategory::Backend => "backend specialist",
            SubtaskCategory::Database => "database specialist",
            SubtaskCategory::Testing => "testing specialist",
        }
    }

    /// Task category the selector should treat this lane as.
    pub fn task_category(&self) -> TaskCategory {
        match self {
            SubtaskCategory::Frontend => TaskCategory::Component,
            SubtaskCategory::Backend => TaskCategory::ApiDesign,
            SubtaskCategory::Database => TaskCategory::Database,
            SubtaskCategory::Testing => TaskCategory::Code,
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "frontend" | "ui" | "client" => Some(SubtaskCategory::Frontend),
            "backend" | "api" | "server" => Some(SubtaskCategory::Backend),
            "database" | "db" | "data" | "schema" => Some(SubtaskCategory::Database),
            "testing" | "test" | "tests" | "qa" => Some(SubtaskCategory::Testing),
            _ => None,
        }
    }
}

impl fmt::Display for SubtaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SubtaskCategory::Frontend => "frontend",
            SubtaskCategory::Backend => "backend",
            SubtaskCategory::Database => "database",
            SubtaskCategory::Testing => "testing",
        };
        f.write_str(name)
    }
}

/// One parsed subtask from the architect's plan.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedSubtask {
    pub id: String,
    pub description: String,
    pub category: SubtaskCategory,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PlanParseError {
    #[error("no JSON array found in plan reply")]
    NoJsonArray,
    #[error("plan JSON did not deserialize: {0}")]
    InvalidJson(String),
    #[error("plan contained no subtasks")]
    EmptyPlan,
    #[error("subtask {index} has an unknown category '{label}'")]
    UnknownCategory { index: usize, label: String },
    #[error("subtask {index} has an empty description")]
    EmptyDescription { index: usize },
}

#[derive(Deserialize)]
struct RawSubtask {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(alias = "task", alias = "title")]
    description: String,
    category: String,
}

fn fence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)```(?:json)?\s*(.*?)```").expect("fence pattern is valid")
    })
}

/// Pull the JSON array out of a plan reply: prefer a fenced block, fall back
/// to the outermost `[...]` span.
fn extract_json_array(reply: &str) -> Option<&str> {
    if let Some(captures) = fence_pattern().captures(reply) {
        let fenced = captures.get(1).map(|m| m.as_str().trim());
        if let Some(fenced) = fenced {
            if fenced.starts_with('[') {
                return Some(fenced);
            }
        }
    }
    let start = reply.find('[')?;
    let end = reply.rfind(']')?;
    (end > start).then(|| &reply[start..=end])
}

/// Parse an architect reply into subtasks.
pub fn parse_plan(reply: &str) -> Result<Vec<PlannedSubtask>, PlanParseError> {
    let json = extract_json_array(reply).ok_or(PlanParseError::NoJsonArray)?;
    let raw: Vec<RawSubtask> =
        serde_json::from_str(json).map_err(|e| PlanParseError::InvalidJson(e.to_string()))?;

    if raw.is_empty() {
        return Err(PlanParseError::EmptyPlan);
    }

    let mut subtasks = Vec::with_capacity(raw.len());
    for (index, entry) in raw.into_iter().enumerate() {
        let description = entry.description.trim().to_string();
        if description.is_empty() {
            return Err(PlanParseError::EmptyDescription { index });
        }

        let category = SubtaskCategory::from_label(&entry.category).ok_or_else(|| {
            PlanParseError::UnknownCategory {
                index,
                label: entry.category.clone(),
            }
        })?;

        let id = match entry.id {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s,
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => format!("subtask-{}", index + 1),
        };

        subtasks.push(PlannedSubtask {
            id,
            description,
            category,
        });
    }

    Ok(subtasks)
}
