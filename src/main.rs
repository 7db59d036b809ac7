use clap::Parser;
use switchboard::cli::{Args, Command, parse_provider_flag};
use switchboard::{RouterConfig, RoutingSystem, SubtaskOutcome, TaskCategory};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "switchboard=info".into()),
        )
        .init();

    let args = Args::parse();

    let config = RouterConfig::load(args.config.as_deref())?;
    let system = RoutingSystem::new(&config)?;

    match args.command {
        Command::Generate {
            prompt,
            category,
            provider,
        } => {
            let category = TaskCategory::from_label(&category);
            let override_provider = parse_provider_flag(&provider)?;
            let result = system.generate(&prompt, category, override_provider).await?;
            println!("{}", result.text);
            info!(
                provider = %result.provider,
                model = %result.model,
                tokens = result.tokens_used,
                cost = result.cost,
                "generation complete"
            );
        }

        Command::Compare {
            prompt,
            category,
            providers,
        } => {
            let category = TaskCategory::from_label(&category);
            let providers = if providers.is_empty() {
                system.providers()
            } else {
                providers
                    .iter()
                    .map(|name| name.parse())
                    .collect::<Result<Vec<_>, _>>()?
            };

            let comparison = system.compare_across(&prompt, category, &providers).await?;
            for run in &comparison.runs {
                println!("=== {} ({:.1}s) ===", run.requested, run.latency.as_secs_f64());
                println!("{}\n", run.result.text);
            }
            for difference in &comparison.differences {
                println!("divergence: {difference}");
            }
            if let Some(consensus) = &comparison.consensus {
                println!("=== consensus ===\n{consensus}");
            }
        }

        Command::Team { goal, context } => {
            let context = match context {
                Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
                None => serde_json::Value::Null,
            };

            let build = system.build_from_goal(&goal, &context).await?;
            for result in &build.results {
                match &result.outcome {
                    SubtaskOutcome::Completed { provider, .. } => {
                        info!(subtask = %result.subtask_id, %provider, "subtask completed");
                    }
                    SubtaskOutcome::Failed { error } => {
                        info!(subtask = %result.subtask_id, %error, "subtask failed");
                    }
                }
            }
            println!("{}", build.integrated);
        }
    }

    let totals = system.usage_totals().await;
    info!(
        requests = totals.requests,
        tokens = totals.tokens,
        cost = totals.cost,
        "usage this run"
    );

    Ok(())
}
