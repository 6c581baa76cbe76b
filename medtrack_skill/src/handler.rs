use medtrack_core::date::{self, format_canonical};
use medtrack_core::report::{history_report, lookup_answer};
use medtrack_core::{DateQuery, EventFilter, LookupTarget, MedicalEvent, Period, SubjectKey};
use tracing::{error, info, warn};

use crate::envelope::{RequestEnvelope, SkillResponse};
use crate::error::{Error, Result};
use crate::intent::{SkillRequest, slot};
use crate::skill::MedTrackSkill;

const EMAIL_LOOKUP_FAILED: &str = "An error occurred while trying to retrieve your email.";
const SEARCH_FAILED: &str = "An error occurred while searching for the data.";
const STORED: &str = "I am putting that in the database now.";
const STORE_FAILED: &str = "An error occurred while saving that to the database.";

/// Route a request to its handler.
pub async fn dispatch(
    skill: &MedTrackSkill,
    envelope: &RequestEnvelope,
    request: SkillRequest,
) -> Result<SkillResponse> {
    match request {
        SkillRequest::Launch => Ok(SkillResponse::speak(SkillRequest::welcome_text())
            .reprompt(SkillRequest::welcome_text())),
        SkillRequest::RetrieveForDate => retrieve_for_date(skill, envelope).await,
        SkillRequest::RetrieveForPeriod => retrieve_for_period(skill, envelope).await,
        SkillRequest::AddMedicalActivity => add_medical_activity(skill, envelope).await,
        SkillRequest::AddMedicineGiven => add_medicine_given(skill, envelope).await,
        SkillRequest::WhenQuestion => when_question(skill, envelope).await,
        SkillRequest::Help => {
            Ok(SkillResponse::speak(SkillRequest::help_text()).reprompt(SkillRequest::help_text()))
        }
        SkillRequest::CancelOrStop => {
            Ok(SkillResponse::speak(SkillRequest::goodbye_text()).end_session())
        }
        SkillRequest::Fallback => Ok(SkillResponse::speak(SkillRequest::fallback_text())
            .reprompt(SkillRequest::fallback_text())),
        SkillRequest::SessionEnded { reason } => {
            info!("Session ended: {}", reason.as_deref().unwrap_or("unknown"));
            Ok(SkillResponse::empty())
        }
        SkillRequest::Unhandled(name) => {
            Ok(SkillResponse::speak(format!("You just triggered {name}")))
        }
        SkillRequest::Unsupported(kind) => Err(Error::UnsupportedRequest(kind)),
    }
}

fn subject_key(envelope: &RequestEnvelope, subject: &str) -> Result<SubjectKey> {
    let caller = envelope.caller_id().ok_or(Error::MissingCaller)?;
    Ok(SubjectKey::new(caller, subject)?)
}

async fn lookup_email(skill: &MedTrackSkill, envelope: &RequestEnvelope) -> anyhow::Result<String> {
    let api = envelope
        .profile_api()
        .ok_or_else(|| anyhow::anyhow!("request carries no profile API endpoint or token"))?;
    skill.profile.email(&api).await
}

/// Query a date range and email the itemized history.
///
/// The profile lookup runs before any storage access; if it fails nothing
/// else happens.
async fn email_history(
    skill: &MedTrackSkill,
    envelope: &RequestEnvelope,
    key: &SubjectKey,
    query: &DateQuery,
    acknowledgment: String,
) -> SkillResponse {
    let email = match lookup_email(skill, envelope).await {
        Ok(email) => email,
        Err(e) => {
            error!("Error occurred when getting email: {e}");
            return SkillResponse::speak(EMAIL_LOOKUP_FAILED);
        }
    };

    let filter = EventFilter::for_date_query(key, query);
    match skill.repo.query(&filter).await {
        Ok(events) => {
            info!("History query for {key} matched {} events", events.len());
            let report = history_report(key.subject(), query, &events);
            skill.dispatch_email(email, report);
            SkillResponse::speak(acknowledgment)
        }
        Err(e) => {
            error!("Error occurred in history query: {e}");
            SkillResponse::speak(SEARCH_FAILED)
        }
    }
}

async fn retrieve_for_date(
    skill: &MedTrackSkill,
    envelope: &RequestEnvelope,
) -> Result<SkillResponse> {
    let slots = envelope.slots();
    let name = slots.require(slot::NAME)?;
    let key = subject_key(envelope, &name)?;
    let query = date::resolve_point_date(&slots.require(slot::DATE)?)?;

    let acknowledgment = format!(
        "I am searching for {name}'s activity {} now. I will send you an email with the results.",
        query.describe()
    );
    Ok(email_history(skill, envelope, &key, &query, acknowledgment).await)
}

async fn retrieve_for_period(
    skill: &MedTrackSkill,
    envelope: &RequestEnvelope,
) -> Result<SkillResponse> {
    let slots = envelope.slots();
    let name = slots.require(slot::NAME)?;
    let key = subject_key(envelope, &name)?;

    let period = Period::select(
        slots.number(slot::NUMBER_OF_DAYS),
        slots.number(slot::NUMBER_OF_WEEKS),
        slots.number(slot::NUMBER_OF_MONTHS),
    )
    .ok_or(Error::MissingSlot(slot::NUMBER_OF_DAYS))?;
    let query = date::resolve_range(period, skill.clock.now())?;

    let acknowledgment =
        "I am searching for the data now. I will send you an email with the results.".to_string();
    Ok(email_history(skill, envelope, &key, &query, acknowledgment).await)
}

async fn store(skill: &MedTrackSkill, event: &MedicalEvent) -> SkillResponse {
    match skill.repo.put(event).await {
        Ok(()) => {
            info!("Successfully added event to database");
            SkillResponse::speak(STORED)
        }
        Err(e) => {
            error!("Error occurred when adding event to database: {e}");
            SkillResponse::speak(STORE_FAILED)
        }
    }
}

async fn add_medical_activity(
    skill: &MedTrackSkill,
    envelope: &RequestEnvelope,
) -> Result<SkillResponse> {
    let slots = envelope.slots();
    let name = slots.require(slot::NAME)?;
    let key = subject_key(envelope, &name)?;
    let activity = slots.require(slot::EVENT)?;

    let event = MedicalEvent::activity(
        &key,
        format_canonical(skill.clock.now()),
        &activity,
        slots.text(slot::NUMBER_OF_MINUTES),
    );
    Ok(store(skill, &event).await)
}

async fn add_medicine_given(
    skill: &MedTrackSkill,
    envelope: &RequestEnvelope,
) -> Result<SkillResponse> {
    let slots = envelope.slots();
    let name = slots.require(slot::NAME)?;
    let key = subject_key(envelope, &name)?;
    let medicine = slots.require(slot::MEDICINE_NAME)?;

    let dosage = slots.text(slot::AMOUNT_OF_MEDICINE);
    if dosage.is_none() {
        warn!("Recording {medicine} for {key} without a dosage");
    }

    let event =
        MedicalEvent::medicine_given(&key, format_canonical(skill.clock.now()), &medicine, dosage);
    Ok(store(skill, &event).await)
}

async fn when_question(
    skill: &MedTrackSkill,
    envelope: &RequestEnvelope,
) -> Result<SkillResponse> {
    let slots = envelope.slots();
    let name = slots.require(slot::NAME)?;
    let key = subject_key(envelope, &name)?;
    let target = LookupTarget::select(
        slots.text(slot::MEDICAL_ACTIVITY),
        slots.text(slot::MEDICINE_NAME),
    );

    let filter = EventFilter::for_lookup(&key, &target);
    match skill.repo.query(&filter).await {
        Ok(events) => Ok(SkillResponse::speak(lookup_answer(&name, &target, &events))),
        Err(e) => {
            error!("Error occurred in when question query: {e}");
            Ok(SkillResponse::speak(SEARCH_FAILED))
        }
    }
}
