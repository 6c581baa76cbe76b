use serde::{Deserialize, Serialize};

use crate::key::SubjectKey;

/// Label prefix that marks an event as a medicine administration.
const MEDICINE_LABEL_PREFIX: &str = "Medicine Given - ";

/// Build the synthesized label stored for a medicine event.
#[must_use]
pub fn medicine_label(medicine: &str) -> String {
    format!("{MEDICINE_LABEL_PREFIX}{medicine}")
}

/// One entry in a subject's medical log.
///
/// Events carry no explicit type. Whether an event is a medicine or a timed
/// activity is inferred from which optional field is filled, see
/// [`MedicalEvent::detail`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalEvent {
    pub subject_key: String,
    pub timestamp: String,
    pub event_label: String,
    pub dosage: Option<String>,
    pub duration_minutes: Option<String>,
}

/// The type-specific part of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventDetail<'a> {
    Dosage(&'a str),
    Duration(&'a str),
}

impl MedicalEvent {
    /// Create a timed activity event, e.g. "physical therapy" for 30 minutes.
    #[must_use]
    pub fn activity(
        key: &SubjectKey,
        timestamp: String,
        activity: &str,
        duration_minutes: Option<String>,
    ) -> Self {
        Self {
            subject_key: key.to_string(),
            timestamp,
            event_label: activity.to_string(),
            dosage: None,
            duration_minutes,
        }
    }

    /// Create a medicine administration event labelled `Medicine Given - {medicine}`.
    #[must_use]
    pub fn medicine_given(
        key: &SubjectKey,
        timestamp: String,
        medicine: &str,
        dosage: Option<String>,
    ) -> Self {
        Self {
            subject_key: key.to_string(),
            timestamp,
            event_label: medicine_label(medicine),
            dosage,
            duration_minutes: None,
        }
    }

    /// Dosage wins over duration; blank values count as absent.
    #[must_use]
    pub fn detail(&self) -> Option<EventDetail<'_>> {
        fn filled(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|s| !s.trim().is_empty())
        }

        filled(&self.dosage)
            .map(EventDetail::Dosage)
            .or_else(|| filled(&self.duration_minutes).map(EventDetail::Duration))
    }
}
