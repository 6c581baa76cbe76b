use medtrack_config::Config;
use tracing::info;

/// Input parameters for the serve command.
#[derive(Debug, Clone)]
pub struct ServeInput {
    /// Listen address; falls back to `server.bind` from config.
    pub bind: Option<String>,
}

/// Strategy for running the skill as an HTTP endpoint.
#[derive(Debug, Clone, Copy)]
pub struct ServeStrategy;

impl super::CommandStrategy for ServeStrategy {
    type Input = ServeInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let bind = input.bind.unwrap_or_else(|| config.server.bind.clone());

        info!("Starting medtrack skill endpoint");
        let skill = super::build_skill(&config).await?;

        medtrack_skill::serve(skill, &bind).await?;
        Ok(())
    }
}
