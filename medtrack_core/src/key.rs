//! Partition key derivation.

use std::fmt;

use thiserror::Error;

const SEPARATOR: char = '#';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    #[error("subject name is empty")]
    EmptySubject,

    #[error("subject name {0:?} contains the reserved '#' separator")]
    ReservedSeparator(String),
}

/// Composite key grouping every event of one caller and subject.
///
/// Rendered as `{caller_id}#{subject_name}`. Subject names may not contain
/// `#`, so the last separator always splits the key back into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubjectKey {
    caller_id: String,
    subject: String,
}

impl SubjectKey {
    pub fn new(caller_id: &str, subject: &str) -> Result<Self, KeyError> {
        if subject.is_empty() {
            return Err(KeyError::EmptySubject);
        }
        if subject.contains(SEPARATOR) {
            return Err(KeyError::ReservedSeparator(subject.to_string()));
        }

        Ok(Self {
            caller_id: caller_id.to_string(),
            subject: subject.to_string(),
        })
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

impl fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.caller_id, self.subject)
    }
}
