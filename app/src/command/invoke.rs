use std::io::Read as _;
use std::path::PathBuf;
use std::time::Duration;

use medtrack_config::Config;
use medtrack_skill::RequestEnvelope;
use tracing::info;

/// Grace period for a report email spawned by the request.
const EMAIL_GRACE: Duration = Duration::from_secs(5);

/// Input parameters for the invoke command.
#[derive(Debug, Clone)]
pub struct InvokeInput {
    /// Envelope file; stdin when `None`.
    pub file: Option<PathBuf>,
}

/// Strategy for answering one request envelope from the command line.
///
/// Useful for exercising an interaction model without the voice platform.
#[derive(Debug, Clone, Copy)]
pub struct InvokeStrategy;

impl super::CommandStrategy for InvokeStrategy {
    type Input = InvokeInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let raw = match &input.file {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };
        let envelope: RequestEnvelope = serde_json::from_str(&raw)?;

        let config = Config::load()?;
        let skill = super::build_skill(&config).await?;

        let response = skill.handle(&envelope).await;
        println!("{}", serde_json::to_string_pretty(&response)?);

        info!("Waiting {}s for background email delivery", EMAIL_GRACE.as_secs());
        tokio::time::sleep(EMAIL_GRACE).await;
        Ok(())
    }
}
