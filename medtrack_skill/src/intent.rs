use crate::envelope::Request;

/// Slot names defined by the interaction model.
pub mod slot {
    pub const NAME: &str = "name";
    pub const DATE: &str = "date";
    pub const NUMBER_OF_DAYS: &str = "number_of_days";
    pub const NUMBER_OF_WEEKS: &str = "number_of_weeks";
    pub const NUMBER_OF_MONTHS: &str = "number_of_months";
    pub const EVENT: &str = "event";
    pub const NUMBER_OF_MINUTES: &str = "number_of_minutes";
    pub const MEDICAL_ACTIVITY: &str = "medical_activity";
    pub const MEDICINE_NAME: &str = "medicine_name";
    pub const AMOUNT_OF_MEDICINE: &str = "amount_of_medicine";
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkillRequest {
    Launch,
    RetrieveForDate,
    RetrieveForPeriod,
    AddMedicalActivity,
    AddMedicineGiven,
    WhenQuestion,
    Help,
    CancelOrStop,
    Fallback,
    SessionEnded { reason: Option<String> },
    /// An intent the skill has no dedicated handler for.
    Unhandled(String),
    /// A request type the skill does not understand at all.
    Unsupported(String),
}

impl SkillRequest {
    #[must_use]
    pub fn from_request(request: &Request) -> Self {
        match request.kind.as_str() {
            "LaunchRequest" => Self::Launch,
            "SessionEndedRequest" => Self::SessionEnded {
                reason: request.reason.clone(),
            },
            "IntentRequest" => match &request.intent {
                Some(intent) => Self::from_intent_name(&intent.name),
                None => Self::Unsupported("IntentRequest without intent".to_string()),
            },
            other => Self::Unsupported(other.to_string()),
        }
    }

    #[must_use]
    pub fn from_intent_name(name: &str) -> Self {
        match name {
            "RetrieveIntentForSpecificDate" => Self::RetrieveForDate,
            "RetrieveIntentForPeriodsOfTime" => Self::RetrieveForPeriod,
            "AddMedicalActivityIntent" => Self::AddMedicalActivity,
            "AddMedicineGivenIntent" => Self::AddMedicineGiven,
            "WhenQuestionIntent" => Self::WhenQuestion,
            "AMAZON.HelpIntent" => Self::Help,
            "AMAZON.CancelIntent" | "AMAZON.StopIntent" => Self::CancelOrStop,
            "AMAZON.FallbackIntent" => Self::Fallback,
            other => Self::Unhandled(other.to_string()),
        }
    }

    #[must_use]
    pub const fn welcome_text() -> &'static str {
        "Welcome to your medical tracker, how may I help you?"
    }

    #[must_use]
    pub const fn help_text() -> &'static str {
        "You can record an activity or a medicine that was given, ask when something \
         last happened, or ask for a history on a date or for the past few days, weeks \
         or months. How can I help?"
    }

    #[must_use]
    pub const fn goodbye_text() -> &'static str {
        "Goodbye!"
    }

    #[must_use]
    pub const fn fallback_text() -> &'static str {
        "Sorry, I don't know about that. Please try again."
    }

    #[must_use]
    pub const fn error_text() -> &'static str {
        "Sorry, I had trouble doing what you asked. Please try again."
    }
}
