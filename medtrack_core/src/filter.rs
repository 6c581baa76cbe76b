//! Record-selection predicates.
//!
//! Filters are plain values. Storage backends translate them into their own
//! query language; [`EventFilter::matches`] is the reference semantics they
//! must agree with.

use tracing::debug;

use crate::date::DateQuery;
use crate::event::{MedicalEvent, medicine_label};
use crate::key::SubjectKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampPredicate {
    /// `timestamp` starts with the given prefix.
    BeginsWith(String),
    /// `timestamp` sorts lexically after the given bound.
    After(String),
}

impl TimestampPredicate {
    #[must_use]
    pub fn matches(&self, timestamp: &str) -> bool {
        match self {
            Self::BeginsWith(prefix) => timestamp.starts_with(prefix.as_str()),
            Self::After(bound) => timestamp > bound.as_str(),
        }
    }
}

/// What a "when did ..." question is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupTarget {
    Activity(String),
    Medicine(String),
    Any,
}

impl LookupTarget {
    /// Activity wins when both slots are filled.
    #[must_use]
    pub fn select(activity: Option<String>, medicine: Option<String>) -> Self {
        match (activity, medicine) {
            (Some(activity), _) => Self::Activity(activity),
            (None, Some(medicine)) => Self::Medicine(medicine),
            (None, None) => Self::Any,
        }
    }

    /// Substring searched for in event labels, if any.
    #[must_use]
    pub fn label_fragment(&self) -> Option<String> {
        match self {
            Self::Activity(activity) => Some(activity.clone()),
            Self::Medicine(medicine) => Some(medicine_label(medicine)),
            Self::Any => None,
        }
    }
}

/// Full selection predicate for one subject's events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFilter {
    pub subject_key: String,
    pub timestamp: Option<TimestampPredicate>,
    pub label_contains: Option<String>,
}

impl EventFilter {
    #[must_use]
    pub fn for_date_query(key: &SubjectKey, query: &DateQuery) -> Self {
        let timestamp = match query {
            DateQuery::Point { prefix } => TimestampPredicate::BeginsWith(prefix.clone()),
            DateQuery::Range { lower_bound, .. } => TimestampPredicate::After(lower_bound.clone()),
        };

        let filter = Self {
            subject_key: key.to_string(),
            timestamp: Some(timestamp),
            label_contains: None,
        };
        debug!("Built date filter: {filter:?}");
        filter
    }

    #[must_use]
    pub fn for_lookup(key: &SubjectKey, target: &LookupTarget) -> Self {
        let filter = Self {
            subject_key: key.to_string(),
            timestamp: None,
            label_contains: target.label_fragment(),
        };
        debug!("Built lookup filter: {filter:?}");
        filter
    }

    #[must_use]
    pub fn matches(&self, event: &MedicalEvent) -> bool {
        event.subject_key == self.subject_key
            && self
                .timestamp
                .as_ref()
                .is_none_or(|predicate| predicate.matches(&event.timestamp))
            && self
                .label_contains
                .as_deref()
                .is_none_or(|fragment| event.event_label.contains(fragment))
    }
}
