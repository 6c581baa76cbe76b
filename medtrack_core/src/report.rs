//! Rendering of query results into spoken answers and emailed reports.

use std::fmt::Write as _;

use crate::date::{DateQuery, display_timestamp, parse_canonical};
use crate::event::{EventDetail, MedicalEvent};
use crate::filter::LookupTarget;

/// An emailed history report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub subject_line: String,
    pub body: String,
}

/// Itemize the events matched by a date or period query.
///
/// Events are listed in the order given, numbered from 1.
#[must_use]
pub fn history_report(subject: &str, query: &DateQuery, events: &[MedicalEvent]) -> Report {
    let when = query.describe();
    let mut body = format!("You have requested to see {subject}'s medical history {when}:\n\n");

    for (index, event) in events.iter().enumerate() {
        let _ = writeln!(body, "Event {}: {}", index + 1, event.event_label);
        let _ = writeln!(body, "Date: {}", display_timestamp(&event.timestamp));
        match event.detail() {
            Some(EventDetail::Dosage(dosage)) => {
                let _ = write!(body, "Dosage: {dosage}\n\n");
            }
            Some(EventDetail::Duration(minutes)) => {
                let _ = write!(body, "Duration: {minutes} minutes\n\n");
            }
            None => {}
        }
    }

    Report {
        subject_line: format!("Medical History for {subject} {when}"),
        body,
    }
}

/// The newest event by timestamp.
///
/// Equal timestamps keep their input order, so the earliest of them wins.
/// Timestamps that do not parse sort behind every valid one.
#[must_use]
pub fn most_recent(events: &[MedicalEvent]) -> Option<&MedicalEvent> {
    let mut ordered: Vec<&MedicalEvent> = events.iter().collect();
    ordered.sort_by(|a, b| parse_canonical(&b.timestamp).cmp(&parse_canonical(&a.timestamp)));
    ordered.into_iter().next()
}

/// Spoken answer to a "when did ..." question.
#[must_use]
pub fn lookup_answer(subject: &str, target: &LookupTarget, events: &[MedicalEvent]) -> String {
    let Some(event) = most_recent(events) else {
        return match target {
            LookupTarget::Activity(name) | LookupTarget::Medicine(name) => {
                format!("No {name} found for {subject}.")
            }
            LookupTarget::Any => format!("No events found for {subject}."),
        };
    };

    let when = display_timestamp(&event.timestamp);
    match target {
        LookupTarget::Activity(activity) => {
            format!("{subject}'s most recent {activity} was on {when}.")
        }
        LookupTarget::Medicine(medicine) => match event.detail() {
            Some(EventDetail::Dosage(dosage)) => {
                format!("{subject} was most recently given {dosage} of {medicine} on {when}.")
            }
            _ => format!("{subject} was most recently given {medicine} on {when}."),
        },
        LookupTarget::Any => {
            format!(
                "{subject}'s most recent event was {} on {when}.",
                event.event_label
            )
        }
    }
}
