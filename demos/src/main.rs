use reactant_agent::{AgentConfig, ConsoleCallbackHandler, DEFAULT_MAX_STEPS};
use reactant_core::Retrying;
use reactant_demos::{
    demo_agent, env_override, run_demo, DEFAULT_RETRIES, MAX_STEPS_ENV, RETRIES_ENV,
};
use reactant_llm::OpenAiClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let max_steps = env_override(MAX_STEPS_ENV, DEFAULT_MAX_STEPS)?;
    let retries = env_override(RETRIES_ENV, DEFAULT_RETRIES)?;

    let client = OpenAiClient::from_env()?;
    tracing::info!(model = client.model(), max_steps, retries, "starting demo");

    let llm = Retrying::new(client, retries);
    let config = AgentConfig::default().with_max_steps(max_steps);
    let agent = demo_agent(llm, config, ConsoleCallbackHandler::stdout())?;

    run_demo(&agent).await?;
    Ok(())
}
