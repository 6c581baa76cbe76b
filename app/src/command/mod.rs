//! Static strategy pattern for CLI commands.
//!
//! Each command is its own strategy type with its own input, dispatched
//! statically from `main`.

use std::sync::Arc;
use std::time::Duration;

use medtrack_config::Config;
use medtrack_providers::{HttpMailer, HttpProfileClient};
use medtrack_skill::{MedTrackSkill, SkillSettings};
use medtrack_store::EventStore;
use tracing::info;

mod info;
mod init;
mod invoke;
mod serve;
mod version;

pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use invoke::{InvokeInput, InvokeStrategy};
pub use serve::{ServeInput, ServeStrategy};
pub use version::VersionStrategy;

/// Contract shared by every command.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Wire the skill to the configured database, profile API and mail service.
async fn build_skill(config: &Config) -> anyhow::Result<MedTrackSkill> {
    let store = EventStore::new(&config.database.url, config.database.max_connections).await?;
    store.ensure_schema().await?;
    info!("Event store ready");

    let profile = HttpProfileClient::new(Duration::from_secs(config.profile.timeout_secs))?;
    let mailer = HttpMailer::new(config.mail.api_url.clone(), config.mail.api_key.clone());

    Ok(MedTrackSkill::new(
        Arc::new(store),
        Arc::new(profile),
        Arc::new(mailer),
        SkillSettings {
            sender: config.mail.sender.clone(),
        },
    ))
}
