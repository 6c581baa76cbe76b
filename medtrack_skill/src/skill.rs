use std::sync::Arc;

use medtrack_core::{
    Clock, EventRepo, Mailer, OutgoingEmail, ProfileClient, Report, SystemClock,
};
use tracing::{error, info};

use crate::envelope::{RequestEnvelope, ResponseEnvelope, SkillResponse};
use crate::intent::SkillRequest;

/// Deployment-specific values the handlers need.
#[derive(Debug, Clone)]
pub struct SkillSettings {
    /// Address history reports are sent from.
    pub sender: String,
}

/// The medical tracker skill with its collaborators.
#[derive(Clone)]
pub struct MedTrackSkill {
    pub(crate) repo: Arc<dyn EventRepo>,
    pub(crate) profile: Arc<dyn ProfileClient>,
    mailer: Arc<dyn Mailer>,
    pub(crate) clock: Arc<dyn Clock>,
    settings: SkillSettings,
}

impl MedTrackSkill {
    pub fn new(
        repo: Arc<dyn EventRepo>,
        profile: Arc<dyn ProfileClient>,
        mailer: Arc<dyn Mailer>,
        settings: SkillSettings,
    ) -> Self {
        Self {
            repo,
            profile,
            mailer,
            clock: Arc::new(SystemClock),
            settings,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Answer one request. Always yields a response; handler failures turn
    /// into a spoken apology.
    pub async fn handle(&self, envelope: &RequestEnvelope) -> ResponseEnvelope {
        let request = SkillRequest::from_request(&envelope.request);
        info!("Handling {request:?}");

        let response = match crate::handler::dispatch(self, envelope, request).await {
            Ok(response) => response,
            Err(e) => {
                error!("Error handled: {e}");
                SkillResponse::speak(SkillRequest::error_text())
                    .reprompt(SkillRequest::error_text())
            }
        };

        response.into_envelope()
    }

    /// Send a report in the background. The spoken reply does not wait for
    /// delivery, and delivery failures are only logged.
    pub(crate) fn dispatch_email(&self, to: String, report: Report) {
        let email = OutgoingEmail {
            from: self.settings.sender.clone(),
            to,
            subject: report.subject_line,
            text: report.body,
        };
        let mailer = Arc::clone(&self.mailer);

        tokio::spawn(async move {
            match mailer.send(&email).await {
                Ok(()) => info!("Report \"{}\" sent", email.subject),
                Err(e) => error!("Error occurred when sending email: {e}"),
            }
        });
    }
}
