//! The capture-engine seam.

use tokio::sync::mpsc;

use super::error::RecognizeError;
use crate::core::session::Lang;

/// Raw events an engine emits during one capture run.
///
/// The [`crate::core::recognize::Recognizer`] translates these into the
/// public [`crate::core::recognize::RecognitionEvent`] stream and manages
/// the listening state around them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The engine's current view of the utterance, as ordered segments.
    Result {
        /// Transcript segments, earliest first.
        segments: Vec<String>,
        /// Whether this is the run's final result.
        is_final: bool,
    },

    /// Terminal engine error for this run.
    Error(String),

    /// The engine finished the run on its own.
    End,
}

/// A speech-capture backend.
///
/// Engines are push-based: `start` hands them a sender and they emit
/// [`EngineEvent`]s until the run ends. Implementations must tolerate the
/// receiver going away mid-run (sends may fail silently).
pub trait RecognitionEngine: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Whether the capture capability exists on this platform. Probed once
    /// when the engine is wrapped in a recognizer, not per call - detection
    /// may be expensive or environment-dependent.
    fn is_available(&self) -> bool;

    /// Begin a capture run in `lang`, emitting events to `events`.
    ///
    /// Returns an error when the capability is absent or a run is already
    /// active at the engine level.
    fn start(
        &self,
        lang: Lang,
        events: mpsc::UnboundedSender<EngineEvent>,
    ) -> Result<(), RecognizeError>;

    /// Stop the current run, if one is active. Engines emit
    /// [`EngineEvent::End`] (or close the channel) in response.
    fn stop(&self);
}
