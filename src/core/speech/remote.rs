//! Server-rendered speech: fetch a clip from the backend and play it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::error::SpeechError;
use super::playback::{AudioOutput, PlaybackHandle};
use super::speaker::SpeechSynth;
use crate::core::session::{ApiClient, Lang};

/// The primary speech path: `POST /api/tts` plus local playback.
pub struct RemoteSynth {
    client: ApiClient,
    output: Arc<dyn AudioOutput>,
}

impl RemoteSynth {
    pub fn new(client: ApiClient, output: Arc<dyn AudioOutput>) -> Self {
        Self { client, output }
    }
}

#[async_trait]
impl SpeechSynth for RemoteSynth {
    fn name(&self) -> &str {
        "server"
    }

    fn is_available(&self) -> bool {
        // Availability is only known per-request; the fallback decision is
        // made on the outcome of speak, not on a probe.
        true
    }

    async fn speak(&self, text: &str, lang: Lang) -> Result<(), SpeechError> {
        let clip = self.client.synthesize(text, lang).await?;
        debug!(bytes = clip.len(), %lang, "playing server-rendered clip");

        // Ownership of the clip moves into the transient playback handle;
        // the handle is released on both exit paths below.
        let handle = PlaybackHandle::new(clip);
        let outcome = self.output.play(handle.clip().clone()).await;
        handle.release();
        outcome
    }
}
