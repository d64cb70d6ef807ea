//! Error types for speech output.

use thiserror::Error;

use crate::core::session::SessionError;

/// Errors raised by speech synthesis and playback.
#[derive(Debug, Error)]
pub enum SpeechError {
    /// Server-side synthesis failed (transport or non-2xx).
    #[error("synthesis request failed: {0}")]
    Synthesis(#[from] SessionError),

    /// The clip could not be decoded or played on the local device.
    #[error("playback failed: {0}")]
    Playback(String),

    /// The platform has no speech-synthesis capability. Raised before any
    /// platform call is attempted.
    #[error("speech synthesis unavailable: {0}")]
    Unavailable(String),

    /// Both the server path and the platform fallback failed.
    #[error("speech failed on both paths: server: {primary}; platform: {fallback}")]
    BothPathsFailed { primary: String, fallback: String },
}
