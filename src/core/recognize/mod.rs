//! Speech input: capability-checked capture behind a typed event stream.
//!
//! [`Recognizer`] wraps a [`RecognitionEngine`] implementation and delivers
//! everything a capture run produces - interim transcripts, the final
//! transcript, errors, and end-of-capture - as [`RecognitionEvent`] values
//! on a single channel. Capability is probed once when the recognizer is
//! built; an unsupported engine makes `start()` a safe no-op rather than an
//! error path.

mod engine;
mod error;
mod events;
mod null;
mod push;
mod recognizer;

pub use engine::{EngineEvent, RecognitionEngine};
pub use error::RecognizeError;
pub use events::RecognitionEvent;
pub use null::NullEngine;
pub use push::PushEngine;
pub use recognizer::Recognizer;
