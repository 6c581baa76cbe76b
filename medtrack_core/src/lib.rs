#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub mod date;
pub mod event;
pub mod filter;
pub mod key;
pub mod report;
mod repository;

pub use date::{DateError, DateQuery, Period, PeriodUnit};
pub use event::{EventDetail, MedicalEvent, medicine_label};
pub use filter::{EventFilter, LookupTarget, TimestampPredicate};
pub use key::{KeyError, SubjectKey};
pub use report::Report;
pub use repository::EventRepo;

/// Credentials the voice platform hands us for calling back into its APIs.
#[derive(Debug, Clone)]
pub struct ProfileApi {
    pub endpoint: String,
    pub access_token: String,
}

#[async_trait]
pub trait ProfileClient: Send + Sync {
    /// Fetch the registered email address of the caller.
    async fn email(&self, api: &ProfileApi) -> anyhow::Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()>;
}

/// Source of "now" for stamping writes and resolving relative periods.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Utc::now().naive_utc()
    }
}
