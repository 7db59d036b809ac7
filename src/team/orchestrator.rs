//! Goal decomposition and team-mode execution.
//!
//! Four sequential phases: Plan (architect decomposes the goal), Assign
//! (selector picks a provider per subtask), Execute (all subtasks dispatched
//! concurrently), Integrate (architect merges everything). Plan and
//! Integrate are single points of failure; subtask failures are recorded
//! and carried into integration rather than aborting the build.

use crate::analysis::TaskCategory;
use crate::dispatch::Dispatcher;
use crate::error::RouteError;
use crate::registry::{ProviderId, Strength};
use crate::team::plan::{PlanParseError, PlannedSubtask, parse_plan};
use futures::future::join_all;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{info, warn};

/// One subtask bound to a specialist role and a chosen provider.
#[derive(Debug, Clone)]
pub struct SubtaskAssignment {
    pub subtask: PlannedSubtask,
    pub role: &'static str,
    pub provider: ProviderId,
    pub model: String,
    pub rationale: String,
}

/// Per-subtask execution outcome. Failures are first-class values here,
/// not errors: they flow into the integration prompt as visible markers.
#[derive(Debug, Clone)]
pub enum SubtaskOutcome {
    Completed { text: String, provider: ProviderId },
    Failed { error: String },
}

impl SubtaskOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, SubtaskOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone)]
pub struct SubtaskResult {
    pub subtask_id: String,
    pub outcome: SubtaskOutcome,
}

/// Everything gathered before a fatal integration failure.
#[derive(Debug)]
pub struct TeamPartial {
    pub plan: String,
    pub assignments: Vec<SubtaskAssignment>,
    pub results: Vec<SubtaskResult>,
}

/// Completed team build.
#[derive(Debug)]
pub struct TeamBuild {
    /// Raw plan text returned by the architect.
    pub plan: String,
    pub assignments: Vec<SubtaskAssignment>,
    pub results: Vec<SubtaskResult>,
    /// The merged deliverable from the integration pass.
    pub integrated: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TeamError {
    /// The plan dispatch itself failed (every provider errored).
    #[error("plan phase dispatch failed")]
    PlanDispatch(#[source] RouteError),
    /// The plan reply could not be parsed into subtasks. Nothing was
    /// dispatched beyond the plan call.
    #[error("plan could not be parsed: {0}")]
    PlanMalformed(#[from] PlanParseError),
    /// The final merge failed; completed subtask results are preserved.
    #[error("integration phase failed after {} subtask results", .partial.results.len())]
    IntegrationFailed {
        partial: Box<TeamPartial>,
        #[source]
        source: RouteError,
    },
}

pub struct TeamOrchestrator {
    dispatcher: Arc<Dispatcher>,
}

impl TeamOrchestrator {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Decompose `goal` into subtasks, execute them concurrently against
    /// per-subtask providers, and merge the outputs into one deliverable.
    /// `context` is shared verbatim with every specialist.
    pub async fn build_from_goal(
        &self,
        goal: &str,
        context: &serde_json::Value,
    ) -> Result<TeamBuild, TeamError> {
        // Phase 1: plan.
        let architect = self.architect();
        let plan_reply = self
            .dispatcher
            .generate(&plan_prompt(goal), TaskCategory::Scaffold, architect)
            .await
            .map_err(TeamError::PlanDispatch)?;
        let subtasks = parse_plan(&plan_reply.text)?;
        info!(subtasks = subtasks.len(), "plan parsed");

        // Phase 2: assign.
        let assignments: Vec<SubtaskAssignment> = subtasks
            .into_iter()
            .map(|subtask| {
                let category = subtask.category.task_category();
                let decision =
                    self.dispatcher
                        .selector()
                        .select(&subtask.description, category, None);
                SubtaskAssignment {
                    role: subtask.category.role_label(),
                    provider: decision.provider,
                    model: decision.model,
                    rationale: decision.rationale,
                    subtask,
                }
            })
            .collect();
        for assignment in &assignments {
            info!(
                subtask = %assignment.subtask.id,
                role = assignment.role,
                provider = %assignment.provider,
                "subtask assigned"
            );
        }

        // Phase 3: execute, all subtasks concurrently.
        let calls = assignments.iter().map(|assignment| {
            let dispatcher = self.dispatcher.clone();
            let prompt = subtask_prompt(assignment, context);
            let category = assignment.subtask.category.task_category();
            let provider = assignment.provider;
            let subtask_id = assignment.subtask.id.clone();
            async move {
                let outcome = match dispatcher.generate(&prompt, category, Some(provider)).await {
                    Ok(result) => SubtaskOutcome::Completed {
                        text: result.text,
                        provider: result.provider,
                    },
                    Err(error) => {
                        warn!(subtask = %subtask_id, %error, "subtask failed");
                        SubtaskOutcome::Failed {
                            error: error.to_string(),
                        }
                    }
                };
                SubtaskResult {
                    subtask_id,
                    outcome,
                }
            }
        });
        let results = join_all(calls).await;

        // Phase 4: integrate.
        let integration = integration_prompt(goal, &plan_reply.text, &results);
        match self
            .dispatcher
            .generate(&integration, TaskCategory::Code, architect)
            .await
        {
            Ok(merged) => {
                info!(
                    results = results.len(),
                    failed = results.iter().filter(|r| r.outcome.is_failed()).count(),
                    "team build integrated"
                );
                Ok(TeamBuild {
                    plan: plan_reply.text,
                    assignments,
                    results,
                    integrated: merged.text,
                })
            }
            Err(source) => Err(TeamError::IntegrationFailed {
                partial: Box::new(TeamPartial {
                    plan: plan_reply.text,
                    assignments,
                    results,
                }),
                source,
            }),
        }
    }

    /// Architecture-strength provider used for the plan and integrate
    /// phases; `None` lets the selector's own heuristics decide.
    fn architect(&self) -> Option<ProviderId> {
        let registry = self.dispatcher.registry();
        registry
            .strongest_in(Strength::Architecture)
            .or_else(|| registry.strongest_in(Strength::ComplexReasoning))
            .map(|p| p.provider)
    }
}

fn plan_prompt(goal: &str) -> String {
    format!(
        "You are the lead architect of a software build team. Decompose the \
         following goal into 2-8 concrete subtasks.\n\nGoal:\n{goal}\n\n\
         Reply with ONLY a JSON array, one object per subtask, each with \
         fields \"id\", \"description\", and \"category\" where category is \
         one of: frontend, backend, database, testing."
    )
}

fn subtask_prompt(assignment: &SubtaskAssignment, context: &serde_json::Value) -> String {
    let context_json =
        serde_json::to_string_pretty(context).unwrap_or_else(|_| context.to_string());
    format!(
        "You are a {role} on a build team. Complete the following subtask.\n\n\
         Subtask {id}: {description}\n\nShared project context:\n{context_json}\n\n\
         Produce the complete deliverable for this subtask.",
        role = assignment.role,
        id = assignment.subtask.id,
        description = assignment.subtask.description,
    )
}

fn integration_prompt(goal: &str, plan: &str, results: &[SubtaskResult]) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are the lead architect merging a team's work into one coherent \
         deliverable.\n\nOriginal goal:\n{goal}\n\nPlan:\n{plan}\n"
    );
    for result in results {
        match &result.outcome {
            SubtaskOutcome::Completed { text, provider } => {
                let _ = writeln!(
                    prompt,
                    "--- Subtask {} (completed by {}) ---\n{}\n",
                    result.subtask_id, provider, text
                );
            }
            SubtaskOutcome::Failed { error } => {
                let _ = writeln!(
                    prompt,
                    "--- Subtask {} FAILED ---\nNo output was produced ({}). \
                     Account for the gap in the merged deliverable.\n",
                    result.subtask_id, error
                );
            }
        }
    }
    prompt.push_str("Merge everything above into one cohesive deliverable.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::team::plan::SubtaskCategory;

    fn assignment(id: &str, category: SubtaskCategory) -> SubtaskAssignment {
        SubtaskAssignment {
            subtask: PlannedSubtask {
                id: id.to_string(),
                description: "do the thing".to_string(),
                category,
            },
            role: category.role_label(),
            provider: ProviderId::Anthropic,
            model: "m".to_string(),
            rationale: String::new(),
        }
    }

    #[test]
    fn subtask_prompt_embeds_description_role_and_context() {
        let context = serde_json::json!({"app": "storefront", "stack": "axum"});
        let prompt = subtask_prompt(&assignment("t1", SubtaskCategory::Backend), &context);
        assert!(prompt.contains("backend specialist"));
        assert!(prompt.contains("do the thing"));
        assert!(prompt.contains("storefront"));
    }

    #[test]
    fn integration_prompt_carries_failure_markers() {
        let results = vec![
            SubtaskResult {
                subtask_id: "t1".to_string(),
                outcome: SubtaskOutcome::Completed {
                    text: "navbar html".to_string(),
                    provider: ProviderId::OpenAi,
                },
            },
            SubtaskResult {
                subtask_id: "t2".to_string(),
                outcome: SubtaskOutcome::Failed {
                    error: "all providers failed".to_string(),
                },
            },
        ];
        let prompt = integration_prompt("build it", "the plan", &results);
        assert!(prompt.contains("navbar html"));
        assert!(prompt.contains("Subtask t2 FAILED"));
        assert!(prompt.contains("all providers failed"));
    }

    #[test]
    fn plan_prompt_names_the_allowed_categories() {
        let prompt = plan_prompt("build a shop");
        for category in ["frontend", "backend", "database", "testing"] {
            assert!(prompt.contains(category));
        }
    }
}
