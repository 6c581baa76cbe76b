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

pub mod envelope;
pub mod error;
mod handler;
pub mod intent;
mod server;
mod skill;

pub use envelope::{RequestEnvelope, ResponseEnvelope, SkillResponse};
pub use error::{Error, Result};
pub use intent::SkillRequest;
pub use server::{router, serve};
pub use skill::{MedTrackSkill, SkillSettings};
