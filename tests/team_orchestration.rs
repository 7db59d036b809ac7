//! Team orchestrator phase behavior: planning, bulkhead-isolated subtask
//! failures, and integration.

mod common;

use common::{MockAdapter, MockBehavior, dispatcher_with};
use std::sync::Arc;
use switchboard::registry::ProviderId;
use switchboard::team::{SubtaskOutcome, TeamError, TeamOrchestrator};

const PLAN_JSON: &str = r#"[
    {"id": "t1", "description": "build the landing navbar", "category": "frontend"},
    {"id": "t2", "description": "wire up the records store", "category": "database"},
    {"id": "t3", "description": "write smoke checks for the flow", "category": "testing"}
]"#;

fn context() -> serde_json::Value {
    serde_json::json!({"app": "storefront", "stack": "axum + sqlite"})
}

/// Architect (anthropic) answers the plan call first, then falls back to a
/// default reply for any later call that reaches it.
fn architect_with_plan() -> Arc<MockAdapter> {
    MockAdapter::scripted(
        ProviderId::Anthropic,
        vec![MockBehavior::Ok(PLAN_JSON.to_string())],
        MockBehavior::Ok("merged deliverable".to_string()),
    )
}

#[tokio::test]
async fn full_build_runs_all_four_phases() {
    let adapters = vec![
        architect_with_plan(),
        MockAdapter::ok(ProviderId::OpenAi, "navbar markup"),
        MockAdapter::ok(ProviderId::Gemini, "gemini output"),
        MockAdapter::ok(ProviderId::Mistral, "mistral output"),
    ];
    let orchestrator = TeamOrchestrator::new(dispatcher_with(&adapters));

    let build = orchestrator
        .build_from_goal("build a storefront", &context())
        .await
        .unwrap();

    assert_eq!(build.assignments.len(), 3);
    assert_eq!(build.results.len(), 3);
    assert!(build.results.iter().all(|r| !r.outcome.is_failed()));
    assert_eq!(build.integrated, "merged deliverable");

    // Lane-to-role mapping survives into the assignments.
    let roles: Vec<&str> = build.assignments.iter().map(|a| a.role).collect();
    assert!(roles.contains(&"frontend specialist"));
    assert!(roles.contains(&"database specialist"));
    assert!(roles.contains(&"testing specialist"));
}

#[tokio::test]
async fn failed_subtask_is_reported_and_integration_still_runs() {
    // Every adapter refuses prompts addressed to the database specialist,
    // so subtask t2 exhausts its entire fallback chain while t1/t3 succeed.
    let adapters = vec![
        architect_with_plan().with_failure_marker("database specialist"),
        MockAdapter::ok(ProviderId::OpenAi, "navbar markup").with_failure_marker("database specialist"),
        MockAdapter::ok(ProviderId::Gemini, "gemini output").with_failure_marker("database specialist"),
        MockAdapter::ok(ProviderId::Mistral, "mistral output").with_failure_marker("database specialist"),
    ];
    let orchestrator = TeamOrchestrator::new(dispatcher_with(&adapters));

    let build = orchestrator
        .build_from_goal("build a storefront", &context())
        .await
        .unwrap();

    assert_eq!(build.results.len(), 3, "failed subtask must not be dropped");

    let failed: Vec<_> = build
        .results
        .iter()
        .filter(|r| r.outcome.is_failed())
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].subtask_id, "t2");

    // The merge still happened, fed by the two successes plus the marker.
    assert_eq!(build.integrated, "merged deliverable");
    let architect_prompts = adapters[0].prompts();
    let integration_prompt = architect_prompts.last().unwrap();
    assert!(integration_prompt.contains("Subtask t2 FAILED"));
    assert!(integration_prompt.contains("navbar markup"));
}

#[tokio::test]
async fn malformed_plan_fails_before_any_subtask_dispatch() {
    let adapters = vec![
        MockAdapter::scripted(
            ProviderId::Anthropic,
            vec![MockBehavior::Ok(
                "Sounds great, I'd start with the frontend!".to_string(),
            )],
            MockBehavior::Ok("unused".to_string()),
        ),
        MockAdapter::ok(ProviderId::OpenAi, "unused"),
        MockAdapter::ok(ProviderId::Gemini, "unused"),
        MockAdapter::ok(ProviderId::Mistral, "unused"),
    ];
    let orchestrator = TeamOrchestrator::new(dispatcher_with(&adapters));

    let err = orchestrator
        .build_from_goal("build a storefront", &context())
        .await
        .unwrap_err();
    assert!(matches!(err, TeamError::PlanMalformed(_)));

    // Exactly one dispatch happened: the plan call itself.
    let total_calls: usize = adapters.iter().map(|a| a.call_count()).sum();
    assert_eq!(total_calls, 1);
}

#[tokio::test]
async fn plan_dispatch_failure_is_fatal() {
    let adapters: Vec<_> = ProviderId::ALL
        .into_iter()
        .map(MockAdapter::failing)
        .collect();
    let orchestrator = TeamOrchestrator::new(dispatcher_with(&adapters));

    let err = orchestrator
        .build_from_goal("build a storefront", &context())
        .await
        .unwrap_err();
    assert!(matches!(err, TeamError::PlanDispatch(_)));
}

#[tokio::test]
async fn integration_failure_preserves_partial_results() {
    // Every adapter refuses the integration prompt; subtasks succeed.
    let marker = "merging a team's work";
    let adapters = vec![
        architect_with_plan().with_failure_marker(marker),
        MockAdapter::ok(ProviderId::OpenAi, "navbar markup").with_failure_marker(marker),
        MockAdapter::ok(ProviderId::Gemini, "gemini output").with_failure_marker(marker),
        MockAdapter::ok(ProviderId::Mistral, "mistral output").with_failure_marker(marker),
    ];
    let orchestrator = TeamOrchestrator::new(dispatcher_with(&adapters));

    let err = orchestrator
        .build_from_goal("build a storefront", &context())
        .await
        .unwrap_err();

    match err {
        TeamError::IntegrationFailed { partial, .. } => {
            assert_eq!(partial.results.len(), 3);
            assert!(partial.results.iter().all(|r| !r.outcome.is_failed()));
            assert!(
                partial
                    .results
                    .iter()
                    .any(|r| matches!(&r.outcome, SubtaskOutcome::Completed { text, .. } if text == "navbar markup"))
            );
        }
        other => panic!("expected IntegrationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn shared_context_reaches_every_subtask_prompt() {
    let adapters = vec![
        architect_with_plan(),
        MockAdapter::ok(ProviderId::OpenAi, "navbar markup"),
        MockAdapter::ok(ProviderId::Gemini, "gemini output"),
        MockAdapter::ok(ProviderId::Mistral, "mistral output"),
    ];
    let orchestrator = TeamOrchestrator::new(dispatcher_with(&adapters));

    orchestrator
        .build_from_goal("build a storefront", &context())
        .await
        .unwrap();

    let subtask_prompts: Vec<String> = adapters
        .iter()
        .flat_map(|a| a.prompts())
        .filter(|p| p.contains("on a build team"))
        .collect();
    assert_eq!(subtask_prompts.len(), 3);
    for prompt in subtask_prompts {
        assert!(prompt.contains("storefront"), "context missing: {prompt}");
    }
}
