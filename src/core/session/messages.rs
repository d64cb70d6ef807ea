//! Wire types for the CallSim backend API.
//!
//! Payload shapes follow the backend contract:
//!
//! - `GET  /api/health` -> [`HealthReport`]
//! - `POST /api/session/start` -> [`StartSessionResponse`]
//! - `POST /api/chat` -> [`ChatReply`]
//! - `POST /api/session/{id}/end` -> [`SessionSummary`]
//! - `GET  /api/tts/voices` -> [`VoicesResponse`]
//!
//! Non-2xx responses carry an [`ErrorResponse`] body with a human-readable
//! message where the server has one.

use serde::{Deserialize, Serialize};

/// Arbitrary key/value description of the simulated caller, sent verbatim
/// with a session start. Empty by default.
pub type CallerInfo = serde_json::Map<String, serde_json::Value>;

// =============================================================================
// Languages
// =============================================================================

/// Synthesis/recognition language tags accepted by the backend.
///
/// The server coerces anything outside this set to English, so the client
/// mirrors the allow-list and never sends a tag the server would rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lang {
    /// English (default)
    #[default]
    #[serde(rename = "en")]
    En,
    /// Spanish
    #[serde(rename = "es")]
    Es,
    /// French
    #[serde(rename = "fr")]
    Fr,
    /// German
    #[serde(rename = "de")]
    De,
    /// Italian
    #[serde(rename = "it")]
    It,
    /// Portuguese
    #[serde(rename = "pt")]
    Pt,
    /// Japanese
    #[serde(rename = "ja")]
    Ja,
    /// Korean
    #[serde(rename = "ko")]
    Ko,
    /// Chinese (Simplified)
    #[serde(rename = "zh-CN")]
    ZhCn,
}

impl Lang {
    /// Convert to the API parameter value.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
            Self::It => "it",
            Self::Pt => "pt",
            Self::Ja => "ja",
            Self::Ko => "ko",
            Self::ZhCn => "zh-CN",
        }
    }

    /// Parse from string, with fallback to the default (English), matching
    /// the server-side coercion.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "en" => Self::En,
            "es" => Self::Es,
            "fr" => Self::Fr,
            "de" => Self::De,
            "it" => Self::It,
            "pt" => Self::Pt,
            "ja" => Self::Ja,
            "ko" => Self::Ko,
            "zh-cn" | "zh_cn" | "zh" => Self::ZhCn,
            _ => Self::default(),
        }
    }

    /// All tags the backend accepts.
    pub fn all() -> &'static [Lang] {
        &[
            Self::En,
            Self::Es,
            Self::Fr,
            Self::De,
            Self::It,
            Self::Pt,
            Self::Ja,
            Self::Ko,
            Self::ZhCn,
        ]
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Health
// =============================================================================

/// Liveness report from `GET /api/health`.
///
/// The probe never raises: when the backend cannot be reached or answers
/// outside 2xx, the failure is folded into the report itself and `status`
/// reads `"unreachable"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    /// Server-reported status (`"healthy"`) or `"unreachable"`.
    pub status: String,

    /// Server time when the probe was answered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Backend version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Failure detail when the probe did not get a healthy answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    /// Report for a probe that failed to reach a healthy backend.
    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self {
            status: "unreachable".to_string(),
            timestamp: None,
            version: None,
            error: Some(reason.into()),
        }
    }

    /// Whether the probe got a healthy answer.
    pub fn is_healthy(&self) -> bool {
        self.error.is_none() && self.status != "unreachable"
    }
}

// =============================================================================
// Session start / chat / end
// =============================================================================

/// Response to `POST /api/session/start`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionResponse {
    /// Opaque server-issued session identifier.
    pub session_id: String,

    /// Opaque access token, sent back as `X-Session-Token` on every
    /// subsequent chat/end call.
    pub token: String,

    /// The agent's initial greeting line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub greeting: Option<String>,
}

/// Response to `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    /// The simulated agent's reply text.
    pub reply: String,

    /// Echo of the session the reply belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// One line of the server-side call transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// `"Agent"` or `"Caller"`.
    pub speaker: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// Response to `POST /api/session/{id}/end`, also used as the local no-op
/// result when ending a call that never started.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// `"ended"` from the server, `"not_started"` for the local no-op.
    pub status: String,

    /// Full transcript of the call as recorded by the server.
    #[serde(default)]
    pub transcript: Vec<TranscriptEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SessionSummary {
    /// Summary for ending a call that has no active session. No network
    /// call is made to produce this.
    pub fn not_started() -> Self {
        Self {
            status: "not_started".to_string(),
            transcript: Vec::new(),
            message: None,
        }
    }
}

// =============================================================================
// Voices
// =============================================================================

/// One entry of the synthesis voice catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    pub id: String,
    pub name: String,
    pub lang: String,
}

/// Response to `GET /api/tts/voices`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VoicesResponse {
    #[serde(default)]
    pub voices: Vec<Voice>,
}

// =============================================================================
// Errors
// =============================================================================

/// Error body the backend attaches to non-2xx responses.
///
/// Two shapes occur in the wild: `{"error": "...", "message": "..."}` and
/// the terser `{"error": "..."}`. The human-readable `message` wins when
/// both are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Best human-readable message for this error, falling back to a generic
    /// status line when the body carries neither field.
    pub fn into_message(self, status: u16) -> String {
        self.message
            .or(self.error)
            .unwrap_or_else(|| format!("HTTP {status}"))
    }
}
