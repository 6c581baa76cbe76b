use async_trait::async_trait;
use medtrack_core::{Mailer, OutgoingEmail};
use reqwest::Client;
use serde::Serialize;
use tracing::info;

/// Sends plain-text mail through a transactional email HTTP API.
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

impl<'a> From<&'a OutgoingEmail> for SendRequest<'a> {
    fn from(email: &'a OutgoingEmail) -> Self {
        Self {
            from: &email.from,
            to: [&email.to],
            subject: &email.subject,
            text: &email.text,
        }
    }
}

impl HttpMailer {
    #[must_use]
    pub fn new(api_url: String, api_key: String) -> Self {
        info!("Creating HttpMailer");
        Self {
            client: Client::new(),
            api_url,
            api_key,
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        self.client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&SendRequest::from(email))
            .send()
            .await?
            .error_for_status()?;

        info!("Sent email \"{}\"", email.subject);
        Ok(())
    }
}
