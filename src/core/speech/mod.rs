//! Speech output: text to audible speech.
//!
//! The preferred path is server-rendered audio ([`RemoteSynth`] fetches a
//! clip over HTTP and plays it through an [`AudioOutput`]); when that fails
//! for any reason, [`Speaker`] transparently retries the same text on the
//! platform synthesizer ([`LocalSynth`]). The two paths are separate
//! [`SpeechSynth`] implementations so each is testable on its own.

mod error;
mod local;
mod playback;
mod remote;
mod speaker;

pub use error::SpeechError;
pub use local::LocalSynth;
pub use playback::{AudioClip, AudioOutput, NullOutput, PlaybackHandle, RodioOutput};
pub use remote::RemoteSynth;
pub use speaker::{Speaker, SpeechSynth, SpokenVia};
