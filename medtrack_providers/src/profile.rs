use std::time::Duration;

use async_trait::async_trait;
use medtrack_core::{ProfileApi, ProfileClient};
use reqwest::Client;
use reqwest::header::ACCEPT;
use tracing::info;

const PROFILE_EMAIL_PATH: &str = "/v2/accounts/~current/settings/Profile.email";

/// Looks up the caller's email through the voice platform's customer profile API.
#[derive(Clone)]
pub struct HttpProfileClient {
    client: Client,
}

impl HttpProfileClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        info!("Creating HttpProfileClient");
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

pub(crate) fn profile_email_url(endpoint: &str) -> String {
    format!("{}{PROFILE_EMAIL_PATH}", endpoint.trim_end_matches('/'))
}

#[async_trait]
impl ProfileClient for HttpProfileClient {
    async fn email(&self, api: &ProfileApi) -> anyhow::Result<String> {
        let email = self
            .client
            .get(profile_email_url(&api.endpoint))
            .bearer_auth(&api.access_token)
            .header(ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .json::<String>()
            .await?;

        info!("Fetched caller email from profile API");
        Ok(email)
    }
}
