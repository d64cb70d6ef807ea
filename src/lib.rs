pub mod config;
pub mod core;

// Re-export commonly used items for convenience
pub use config::ClientConfig;
pub use core::recognize::{
    EngineEvent, NullEngine, PushEngine, RecognitionEngine, RecognitionEvent, Recognizer,
};
pub use core::session::{
    ApiClient, Call, CallerInfo, ChatReply, HealthReport, Lang, SessionError, SessionHandle,
    SessionResult, SessionSummary, StartSessionResponse, Voice,
};
pub use core::speech::{
    AudioClip, AudioOutput, LocalSynth, NullOutput, PlaybackHandle, RemoteSynth, RodioOutput,
    Speaker, SpeechError, SpeechSynth, SpokenVia,
};
