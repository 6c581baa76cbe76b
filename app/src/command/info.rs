use medtrack_config::Config;
use medtrack_store::EventStore;
use tracing::info;

/// Strategy for displaying configuration information.
///
/// Secrets are masked; the database connection is tested live.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;

        println!("=== medtrack Configuration ===\n");

        println!("Server:");
        println!("  Bind: {}", config.server.bind);
        println!();

        println!("Database:");
        let db_url = &config.database.url;
        println!("  URL: {}", mask_database_url(db_url));
        println!("  Max Connections: {}", config.database.max_connections);

        info!("Testing database connection");
        match EventStore::new(db_url, 1).await {
            Ok(_) => println!("  Status: Connected"),
            Err(e) => {
                println!("  Status: Connection failed");
                println!("  Error: {e}");
            }
        }
        println!();

        println!("Mail:");
        println!("  API URL: {}", config.mail.api_url);
        println!("  API Key: {}", mask_secret(&config.mail.api_key));
        println!("  Sender: {}", config.mail.sender);
        println!();

        println!("Profile API:");
        println!("  Timeout: {}s", config.profile.timeout_secs);

        Ok(())
    }
}

fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "(not set)".to_string();
    }
    match (secret.get(..4), secret.get(secret.len().saturating_sub(4)..)) {
        (Some(head), Some(tail)) if secret.len() > 8 => format!("{head}...{tail}"),
        _ => "***".to_string(),
    }
}

fn mask_database_url(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };

    let Some((credentials, after_at)) = rest.split_once('@') else {
        return url.to_string();
    };

    let Some((username, _password)) = credentials.split_once(':') else {
        return url.to_string();
    };

    format!("{scheme}://{username}:***@{after_at}")
}
