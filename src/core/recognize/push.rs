//! Host-fed capture engine.
//!
//! `PushEngine` has no microphone: the host pushes transcript segments into
//! it and they flow through the normal recognition pipeline. The console
//! front-end uses it to route typed input through the same code path spoken
//! input would take, and tests use it to script interim/final sequences.

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::trace;

use super::engine::{EngineEvent, RecognitionEngine};
use super::error::RecognizeError;
use crate::core::session::Lang;

/// Engine whose "speech" is whatever the host pushes in.
///
/// Single-utterance semantics: a pushed final transcript also ends the run,
/// the way a platform recognizer signals end after its final result.
#[derive(Debug, Default)]
pub struct PushEngine {
    run: Mutex<Option<mpsc::UnboundedSender<EngineEvent>>>,
    last_lang: Mutex<Option<Lang>>,
}

impl PushEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Language of the most recent run, when one was started.
    pub fn last_lang(&self) -> Option<Lang> {
        *self.last_lang.lock()
    }

    /// Whether a run is currently accepting pushes.
    pub fn is_running(&self) -> bool {
        self.run.lock().is_some()
    }

    /// Push an interim view of the utterance. Returns `false` when no run
    /// is active.
    pub fn push_interim<S: AsRef<str>>(&self, segments: &[S]) -> bool {
        let segments = segments.iter().map(|s| s.as_ref().to_string()).collect();
        self.emit(EngineEvent::Result {
            segments,
            is_final: false,
        })
    }

    /// Push the run's final transcript and end the run.
    pub fn push_final(&self, text: &str) -> bool {
        let sent = self.emit(EngineEvent::Result {
            segments: vec![text.to_string()],
            is_final: true,
        });
        if sent {
            self.finish();
        }
        sent
    }

    /// Fail the run with an engine error code.
    pub fn fail(&self, code: &str) -> bool {
        let Some(run) = self.run.lock().take() else {
            return false;
        };
        run.send(EngineEvent::Error(code.to_string())).is_ok()
    }

    /// End the run without a final transcript.
    pub fn finish(&self) {
        if let Some(run) = self.run.lock().take() {
            let _ = run.send(EngineEvent::End);
        }
    }

    fn emit(&self, event: EngineEvent) -> bool {
        let guard = self.run.lock();
        match guard.as_ref() {
            Some(run) => {
                trace!(?event, "push engine emitting");
                run.send(event).is_ok()
            }
            None => false,
        }
    }
}

impl RecognitionEngine for PushEngine {
    fn name(&self) -> &str {
        "push"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn start(
        &self,
        lang: Lang,
        events: mpsc::UnboundedSender<EngineEvent>,
    ) -> Result<(), RecognizeError> {
        let mut run = self.run.lock();
        if run.is_some() {
            return Err(RecognizeError::AlreadyCapturing);
        }
        *run = Some(events);
        *self.last_lang.lock() = Some(lang);
        Ok(())
    }

    fn stop(&self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_without_run_is_rejected() {
        let engine = PushEngine::new();
        assert!(!engine.push_interim(&["he"]));
        assert!(!engine.push_final("hello"));
        assert!(!engine.fail("no-speech"));
    }

    #[tokio::test]
    async fn test_final_push_ends_the_run() {
        let engine = PushEngine::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        engine.start(Lang::En, tx).unwrap();

        assert!(engine.push_final("hello"));
        assert!(!engine.is_running());

        assert_eq!(
            rx.recv().await,
            Some(EngineEvent::Result {
                segments: vec!["hello".to_string()],
                is_final: true,
            })
        );
        assert_eq!(rx.recv().await, Some(EngineEvent::End));
    }

    #[tokio::test]
    async fn test_second_start_while_running_errors() {
        let engine = PushEngine::new();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        engine.start(Lang::En, tx1).unwrap();
        assert!(matches!(
            engine.start(Lang::En, tx2),
            Err(RecognizeError::AlreadyCapturing)
        ));
    }

    #[test]
    fn test_start_records_language() {
        let engine = PushEngine::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        engine.start(Lang::De, tx).unwrap();
        assert_eq!(engine.last_lang(), Some(Lang::De));
    }
}
