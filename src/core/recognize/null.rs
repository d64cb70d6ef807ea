//! Engine for platforms with no capture capability.

use tokio::sync::mpsc;

use super::engine::{EngineEvent, RecognitionEngine};
use super::error::RecognizeError;
use crate::core::session::Lang;

/// Always-unavailable engine: the default on headless builds.
#[derive(Debug, Default)]
pub struct NullEngine;

impl NullEngine {
    pub fn new() -> Self {
        Self
    }
}

impl RecognitionEngine for NullEngine {
    fn name(&self) -> &str {
        "null"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn start(
        &self,
        _lang: Lang,
        _events: mpsc::UnboundedSender<EngineEvent>,
    ) -> Result<(), RecognizeError> {
        Err(RecognizeError::Unavailable(
            "no capture capability on this platform".to_string(),
        ))
    }

    fn stop(&self) {}
}
