//! The recognition adapter: state machine and event translation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::engine::{EngineEvent, RecognitionEngine};
use super::events::RecognitionEvent;
use crate::core::session::Lang;

/// Capability-checked wrapper around a capture engine.
///
/// States: Idle -> Listening (after a successful `start`) -> Idle (after
/// `stop`, a terminal engine error, or the engine ending the run on its
/// own). The run is over for the consumer when [`RecognitionEvent::Ended`]
/// arrives on the stream.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use callsim_client::{PushEngine, RecognitionEvent, Recognizer};
///
/// # async fn example() {
/// let engine = Arc::new(PushEngine::new());
/// let (recognizer, mut events) = Recognizer::new(engine.clone());
///
/// if recognizer.start() {
///     engine.push_final("my package is late");
///     while let Some(event) = events.recv().await {
///         match event {
///             RecognitionEvent::Final(text) => println!("heard: {text}"),
///             RecognitionEvent::Ended => break,
///             _ => {}
///         }
///     }
/// }
/// # }
/// ```
pub struct Recognizer {
    engine: Arc<dyn RecognitionEngine>,
    /// Capability answer, probed once at construction.
    supported: bool,
    listening: Arc<AtomicBool>,
    lang: Mutex<Lang>,
    events: mpsc::UnboundedSender<RecognitionEvent>,
}

impl Recognizer {
    /// Wrap `engine`, probing its capability once, and return the adapter
    /// together with its event stream.
    pub fn new(engine: Arc<dyn RecognitionEngine>) -> (Self, mpsc::UnboundedReceiver<RecognitionEvent>) {
        let supported = engine.is_available();
        debug!(engine = engine.name(), supported, "recognizer created");
        let (events, receiver) = mpsc::unbounded_channel();
        (
            Self {
                engine,
                supported,
                listening: Arc::new(AtomicBool::new(false)),
                lang: Mutex::new(Lang::default()),
                events,
            },
            receiver,
        )
    }

    /// Whether the capture capability was detected at construction.
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Whether a capture run is currently active.
    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// Set the capture language for subsequent `start` calls. Has no effect
    /// on a run already in progress.
    pub fn set_language(&self, lang: Lang) {
        *self.lang.lock() = lang;
    }

    /// Begin a capture run.
    ///
    /// Returns `false` - immediately, with no event emitted - when the
    /// capability is unavailable or a run is already active. When the
    /// engine itself fails to start, the error is logged and `false` is
    /// returned rather than propagated.
    pub fn start(&self) -> bool {
        if !self.supported {
            return false;
        }
        if self.listening.load(Ordering::SeqCst) {
            // Already listening: explicit no-op.
            return false;
        }

        let lang = *self.lang.lock();
        let (tx, rx) = mpsc::unbounded_channel();
        match self.engine.start(lang, tx) {
            Ok(()) => {
                self.listening.store(true, Ordering::SeqCst);
                tokio::spawn(pump(rx, self.events.clone(), self.listening.clone()));
                debug!(engine = self.engine.name(), %lang, "capture started");
                true
            }
            Err(e) => {
                warn!(engine = self.engine.name(), "capture failed to start: {e}");
                false
            }
        }
    }

    /// Stop the current run. Silent no-op while Idle: no engine call, no
    /// event.
    pub fn stop(&self) {
        if self.listening.load(Ordering::SeqCst) {
            self.engine.stop();
        }
    }
}

/// Translate one run's engine events into the public stream.
///
/// Interim/final transcripts concatenate the engine's segments
/// earliest-first with no separator. A terminal error emits exactly one
/// `Error` followed by `Ended`; a sender dropped without `End` counts as a
/// natural end.
async fn pump(
    mut rx: mpsc::UnboundedReceiver<EngineEvent>,
    events: mpsc::UnboundedSender<RecognitionEvent>,
    listening: Arc<AtomicBool>,
) {
    while let Some(event) = rx.recv().await {
        match event {
            EngineEvent::Result { segments, is_final } => {
                let transcript = segments.concat();
                let event = if is_final {
                    RecognitionEvent::Final(transcript)
                } else {
                    RecognitionEvent::Interim(transcript)
                };
                let _ = events.send(event);
            }
            EngineEvent::Error(code) => {
                listening.store(false, Ordering::SeqCst);
                let _ = events.send(RecognitionEvent::Error(code));
                let _ = events.send(RecognitionEvent::Ended);
                return;
            }
            EngineEvent::End => {
                listening.store(false, Ordering::SeqCst);
                let _ = events.send(RecognitionEvent::Ended);
                return;
            }
        }
    }
    listening.store(false, Ordering::SeqCst);
    let _ = events.send(RecognitionEvent::Ended);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recognize::{NullEngine, PushEngine};
    use tokio::time::{Duration, timeout};

    async fn next(
        rx: &mut mpsc::UnboundedReceiver<RecognitionEvent>,
    ) -> Option<RecognitionEvent> {
        timeout(Duration::from_secs(1), rx.recv()).await.ok().flatten()
    }

    #[tokio::test]
    async fn test_unsupported_start_returns_false_without_events() {
        let (recognizer, mut rx) = Recognizer::new(Arc::new(NullEngine::new()));
        assert!(!recognizer.is_supported());
        assert!(!recognizer.start());
        assert!(!recognizer.is_listening());

        // No event may arrive
        let got = timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(got.is_err(), "no event expected, got {got:?}");
    }

    #[tokio::test]
    async fn test_stop_while_idle_is_silent() {
        let engine = Arc::new(PushEngine::new());
        let (recognizer, mut rx) = Recognizer::new(engine.clone());

        recognizer.stop();
        assert!(!engine.is_running());
        let got = timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(got.is_err(), "no event expected, got {got:?}");
    }

    #[tokio::test]
    async fn test_interim_segments_concatenate_in_order() {
        let engine = Arc::new(PushEngine::new());
        let (recognizer, mut rx) = Recognizer::new(engine.clone());
        assert!(recognizer.start());

        engine.push_interim(&["my package ", "is ", "late"]);
        assert_eq!(
            next(&mut rx).await,
            Some(RecognitionEvent::Interim("my package is late".to_string()))
        );
    }

    #[tokio::test]
    async fn test_final_then_ended() {
        let engine = Arc::new(PushEngine::new());
        let (recognizer, mut rx) = Recognizer::new(engine.clone());
        assert!(recognizer.start());

        engine.push_interim(&["my "]);
        engine.push_final("my package is late");

        assert_eq!(
            next(&mut rx).await,
            Some(RecognitionEvent::Interim("my ".to_string()))
        );
        assert_eq!(
            next(&mut rx).await,
            Some(RecognitionEvent::Final("my package is late".to_string()))
        );
        assert_eq!(next(&mut rx).await, Some(RecognitionEvent::Ended));
    }

    #[tokio::test]
    async fn test_error_emits_once_then_ends() {
        let engine = Arc::new(PushEngine::new());
        let (recognizer, mut rx) = Recognizer::new(engine.clone());
        assert!(recognizer.start());

        engine.fail("no-speech");
        assert_eq!(
            next(&mut rx).await,
            Some(RecognitionEvent::Error("no-speech".to_string()))
        );
        assert_eq!(next(&mut rx).await, Some(RecognitionEvent::Ended));

        // Back to Idle; nothing further arrives
        let got = timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(got.is_err(), "stream must stay quiet after the run, got {got:?}");
    }

    #[tokio::test]
    async fn test_start_while_listening_is_a_noop() {
        let engine = Arc::new(PushEngine::new());
        let (recognizer, mut rx) = Recognizer::new(engine.clone());
        assert!(recognizer.start());
        assert!(!recognizer.start());

        // The active run is undisturbed
        engine.push_final("still here");
        assert_eq!(
            next(&mut rx).await,
            Some(RecognitionEvent::Final("still here".to_string()))
        );
    }

    #[tokio::test]
    async fn test_set_language_applies_to_next_start() {
        let engine = Arc::new(PushEngine::new());
        let (recognizer, mut rx) = Recognizer::new(engine.clone());

        recognizer.set_language(Lang::Es);
        assert!(recognizer.start());
        assert_eq!(engine.last_lang(), Some(Lang::Es));

        engine.push_final("hola");
        assert_eq!(
            next(&mut rx).await,
            Some(RecognitionEvent::Final("hola".to_string()))
        );
        assert_eq!(next(&mut rx).await, Some(RecognitionEvent::Ended));

        // Changing the language mid-idle affects the next run only
        recognizer.set_language(Lang::Ja);
        assert!(recognizer.start());
        assert_eq!(engine.last_lang(), Some(Lang::Ja));
    }

    #[tokio::test]
    async fn test_stop_ends_the_run() {
        let engine = Arc::new(PushEngine::new());
        let (recognizer, mut rx) = Recognizer::new(engine.clone());
        assert!(recognizer.start());
        assert!(recognizer.is_listening());

        recognizer.stop();
        assert_eq!(next(&mut rx).await, Some(RecognitionEvent::Ended));
        assert!(!recognizer.is_listening());
    }
}
