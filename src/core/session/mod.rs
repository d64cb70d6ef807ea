//! Session lifecycle against the CallSim backend.
//!
//! [`ApiClient`] is the stateless HTTP surface: liveness probe, session
//! start/end, chat exchange, speech synthesis, and the voices catalog.
//! Session identity is an explicit [`SessionHandle`] value returned by a
//! successful start and threaded by the caller into every subsequent call;
//! ending a session consumes the handle. [`Call`] layers the per-call
//! lifecycle (open, send, end) on top for front-ends that want one object
//! per training call.

mod call;
mod client;
mod error;
mod messages;

pub use call::Call;
pub use client::{ApiClient, SessionHandle};
pub use error::{SessionError, SessionResult};
pub use messages::{
    CallerInfo, ChatReply, ErrorResponse, HealthReport, Lang, SessionSummary,
    StartSessionResponse, TranscriptEntry, Voice, VoicesResponse,
};
