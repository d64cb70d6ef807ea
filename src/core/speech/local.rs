//! Platform speech synthesis, the fallback path.
//!
//! Uses the OS speech facility through the `tts` crate when the
//! `platform-tts` feature is enabled. Capability is probed once at
//! construction; without the feature, or when the probe fails, the synth
//! reports itself unavailable and `speak` rejects before any platform call.

use async_trait::async_trait;
use tracing::debug;
#[cfg(feature = "platform-tts")]
use tracing::warn;

use super::error::SpeechError;
use super::speaker::SpeechSynth;
use crate::core::session::Lang;

/// Upper bound on how long one utterance may keep the platform busy.
#[cfg(feature = "platform-tts")]
const MAX_UTTERANCE_SECS: u64 = 60;

/// Platform speech synthesizer.
pub struct LocalSynth {
    available: bool,
}

impl LocalSynth {
    /// Probe the platform capability once and remember the answer.
    pub fn new() -> Self {
        let available = Self::probe();
        if !available {
            debug!("platform speech synthesis not available");
        }
        Self { available }
    }

    #[cfg(feature = "platform-tts")]
    fn probe() -> bool {
        match tts::Tts::default() {
            Ok(_) => true,
            Err(e) => {
                warn!("platform synthesizer probe failed: {e}");
                false
            }
        }
    }

    #[cfg(not(feature = "platform-tts"))]
    fn probe() -> bool {
        false
    }
}

impl Default for LocalSynth {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechSynth for LocalSynth {
    fn name(&self) -> &str {
        "platform"
    }

    fn is_available(&self) -> bool {
        self.available
    }

    #[cfg(feature = "platform-tts")]
    async fn speak(&self, text: &str, lang: Lang) -> Result<(), SpeechError> {
        if !self.available {
            return Err(SpeechError::Unavailable(
                "no platform speech synthesizer".to_string(),
            ));
        }

        let text = text.to_string();
        // The platform handle is not Send on every backend, so one utterance
        // lives entirely on a blocking thread.
        tokio::task::spawn_blocking(move || {
            let mut synth = tts::Tts::default()
                .map_err(|e| SpeechError::Unavailable(format!("synthesizer init failed: {e}")))?;

            // Neutral delivery: normal rate and pitch.
            let rate = synth.normal_rate();
            let _ = synth.set_rate(rate);
            let pitch = synth.normal_pitch();
            let _ = synth.set_pitch(pitch);

            // Prefer a voice matching the requested language when the
            // platform exposes a catalog.
            if let Ok(voices) = synth.voices()
                && let Some(voice) = voices
                    .iter()
                    .find(|v| v.language().as_str().starts_with(lang.as_str()))
            {
                let _ = synth.set_voice(voice);
            }

            synth
                .speak(text, true)
                .map_err(|e| SpeechError::Playback(format!("platform synthesizer: {e}")))?;

            // Resolve when the utterance finishes.
            let deadline = std::time::Instant::now() + std::time::Duration::from_secs(MAX_UTTERANCE_SECS);
            while synth.is_speaking().unwrap_or(false) {
                if std::time::Instant::now() >= deadline {
                    warn!("platform utterance exceeded {MAX_UTTERANCE_SECS}s; giving up waiting");
                    break;
                }
                std::thread::sleep(std::time::Duration::from_millis(50));
            }
            Ok(())
        })
        .await
        .map_err(|e| SpeechError::Playback(format!("synthesis task failed: {e}")))?
    }

    #[cfg(not(feature = "platform-tts"))]
    async fn speak(&self, _text: &str, _lang: Lang) -> Result<(), SpeechError> {
        Err(SpeechError::Unavailable(
            "built without platform speech support (enable the platform-tts feature)".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "platform-tts"))]
    #[tokio::test]
    async fn test_unavailable_synth_rejects_before_platform_call() {
        let synth = LocalSynth::new();
        assert!(!synth.is_available());

        let started = std::time::Instant::now();
        let result = synth.speak("hello", Lang::En).await;
        assert!(matches!(result, Err(SpeechError::Unavailable(_))));
        // Rejection is immediate; nothing was dispatched anywhere
        assert!(started.elapsed() < std::time::Duration::from_millis(100));
    }

    #[test]
    fn test_probe_runs_once_at_construction() {
        let synth = LocalSynth::new();
        // The cached answer is what is_available reports; repeated calls do
        // not re-probe.
        let first = synth.is_available();
        assert_eq!(synth.is_available(), first);
    }
}
