//! Wire types for the voice platform's request and response JSON.
//!
//! Only the fields the skill reads are modelled; everything else in the
//! envelope is ignored on deserialization.

use std::collections::HashMap;

use medtrack_core::ProfileApi;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: String,
    pub session: Option<Session>,
    pub context: Option<Context>,
    pub request: Request,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Context {
    #[serde(rename = "System")]
    pub system: SystemContext,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemContext {
    pub api_endpoint: Option<String>,
    pub api_access_token: Option<String>,
    pub user: Option<User>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(rename = "type")]
    pub kind: String,
    pub request_id: Option<String>,
    pub intent: Option<Intent>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub name: String,
    pub value: Option<String>,
}

impl RequestEnvelope {
    /// Caller identity: the session user, falling back to the context user.
    #[must_use]
    pub fn caller_id(&self) -> Option<&str> {
        self.session
            .as_ref()
            .map(|s| s.user.user_id.as_str())
            .or_else(|| {
                self.context
                    .as_ref()
                    .and_then(|c| c.system.user.as_ref())
                    .map(|u| u.user_id.as_str())
            })
    }

    /// Endpoint and token for calling the platform's profile API.
    #[must_use]
    pub fn profile_api(&self) -> Option<ProfileApi> {
        let system = &self.context.as_ref()?.system;
        Some(ProfileApi {
            endpoint: system.api_endpoint.clone()?,
            access_token: system.api_access_token.clone()?,
        })
    }

    #[must_use]
    pub fn slots(&self) -> SlotValues<'_> {
        SlotValues {
            slots: self.request.intent.as_ref().map(|i| &i.slots),
        }
    }
}

/// Read access to an intent's slot values.
///
/// A slot counts as absent when it is missing, blank, or holds the
/// platform's `?` placeholder for an unrecognized value.
#[derive(Debug, Clone, Copy)]
pub struct SlotValues<'a> {
    slots: Option<&'a HashMap<String, Slot>>,
}

impl SlotValues<'_> {
    #[must_use]
    pub fn text(&self, name: &str) -> Option<String> {
        self.slots?
            .get(name)?
            .value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty() && *v != "?")
            .map(str::to_string)
    }

    /// Non-negative whole number; anything unparseable counts as absent.
    #[must_use]
    pub fn number(&self, name: &str) -> Option<u32> {
        self.text(name)?.parse().ok()
    }

    pub fn require(&self, name: &'static str) -> Result<String> {
        self.text(name).ok_or(Error::MissingSlot(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub version: String,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl OutputSpeech {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: "PlainText".to_string(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

impl ResponseEnvelope {
    #[must_use]
    pub fn speech(&self) -> Option<&str> {
        self.response.output_speech.as_ref().map(|s| s.text.as_str())
    }

    #[must_use]
    pub fn reprompt(&self) -> Option<&str> {
        self.response
            .reprompt
            .as_ref()
            .map(|r| r.output_speech.text.as_str())
    }
}

/// Builder for the skill's reply, in the shape handlers think about it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillResponse {
    speech: Option<String>,
    reprompt: Option<String>,
    end_session: Option<bool>,
}

impl SkillResponse {
    #[must_use]
    pub fn speak(text: impl Into<String>) -> Self {
        Self {
            speech: Some(text.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Keep the session open and ask again with `text`.
    #[must_use]
    pub fn reprompt(mut self, text: impl Into<String>) -> Self {
        self.reprompt = Some(text.into());
        self.end_session = Some(false);
        self
    }

    #[must_use]
    pub fn end_session(mut self) -> Self {
        self.end_session = Some(true);
        self
    }

    #[must_use]
    pub fn into_envelope(self) -> ResponseEnvelope {
        ResponseEnvelope {
            version: "1.0".to_string(),
            response: ResponseBody {
                output_speech: self.speech.map(OutputSpeech::plain),
                reprompt: self.reprompt.map(|text| Reprompt {
                    output_speech: OutputSpeech::plain(text),
                }),
                should_end_session: self.end_session,
            },
        }
    }
}
