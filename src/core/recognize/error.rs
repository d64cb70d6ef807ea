//! Error types for speech capture engines.

use thiserror::Error;

/// Errors an engine can raise when asked to start a capture run.
///
/// These never propagate out of [`crate::core::recognize::Recognizer`]:
/// `start()` catches them, logs, and returns `false`, because the owning UI
/// must keep running regardless.
#[derive(Debug, Error)]
pub enum RecognizeError {
    /// The platform has no capture capability.
    #[error("speech capture unavailable: {0}")]
    Unavailable(String),

    /// A capture run is already active at the engine level.
    #[error("capture already active")]
    AlreadyCapturing,

    /// The engine failed to begin capturing.
    #[error("capture failed to start: {0}")]
    StartFailed(String),
}
