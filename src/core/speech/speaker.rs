//! The two-step speech strategy: server first, platform fallback.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::error::SpeechError;
use super::local::LocalSynth;
use super::playback::AudioOutput;
use super::remote::RemoteSynth;
use crate::core::session::{ApiClient, Lang};

/// One way of turning text into audible speech.
#[async_trait]
pub trait SpeechSynth: Send + Sync {
    /// Short name for logs and outcomes.
    fn name(&self) -> &str;

    /// Whether this synth can be expected to work at all. Probed once when
    /// the synth is constructed, not per call.
    fn is_available(&self) -> bool;

    /// Speak `text` in `lang`, resolving when the audio has finished.
    async fn speak(&self, text: &str, lang: Lang) -> Result<(), SpeechError>;
}

/// Which path ended up speaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpokenVia {
    /// The server-rendered clip played.
    Server,
    /// The platform synthesizer spoke after the server path failed.
    Platform,
}

/// Primary/fallback speech strategy.
///
/// `speak` tries the primary path and, on *any* primary failure, retries
/// the same text and language on the fallback, resolving or rejecting on
/// the fallback's outcome. The two paths are plain [`SpeechSynth`] values,
/// so each is testable on its own.
pub struct Speaker {
    primary: Box<dyn SpeechSynth>,
    fallback: Box<dyn SpeechSynth>,
}

impl Speaker {
    pub fn new(primary: Box<dyn SpeechSynth>, fallback: Box<dyn SpeechSynth>) -> Self {
        Self { primary, fallback }
    }

    /// The standard arrangement: server-rendered clips through `output`,
    /// falling back to the platform synthesizer.
    pub fn for_client(client: ApiClient, output: Arc<dyn AudioOutput>) -> Self {
        Self::new(
            Box::new(RemoteSynth::new(client, output)),
            Box::new(LocalSynth::new()),
        )
    }

    /// Speak `text`, reporting which path did the talking.
    pub async fn speak(&self, text: &str, lang: Lang) -> Result<SpokenVia, SpeechError> {
        let primary_err = match self.primary.speak(text, lang).await {
            Ok(()) => return Ok(SpokenVia::Server),
            Err(e) => e,
        };

        warn!(
            primary = self.primary.name(),
            fallback = self.fallback.name(),
            error = %primary_err,
            "primary speech path failed; engaging fallback"
        );

        match self.fallback.speak(text, lang).await {
            Ok(()) => {
                info!(fallback = self.fallback.name(), "fallback spoke");
                Ok(SpokenVia::Platform)
            }
            Err(fallback_err) => Err(SpeechError::BothPathsFailed {
                primary: primary_err.to_string(),
                fallback: fallback_err.to_string(),
            }),
        }
    }
}
