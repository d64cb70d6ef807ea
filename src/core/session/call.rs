//! Per-call lifecycle: open, send, end.
//!
//! `Call` is the object a front-end holds for the duration of one training
//! call. It owns the current [`SessionHandle`] (if any) and enforces the
//! lifecycle locally: sends on a call that is not open fail without touching
//! the network, and ending an unopened call is a no-op.

use tracing::debug;

use super::client::{ApiClient, SessionHandle};
use super::error::{SessionError, SessionResult};
use super::messages::{CallerInfo, ChatReply, SessionSummary, StartSessionResponse};

/// One training call from open to end.
///
/// Invariant: every `send` between a successful `open` and `end` carries
/// exactly the session id and token returned by that open.
#[derive(Debug)]
pub struct Call {
    client: ApiClient,
    handle: Option<SessionHandle>,
    greeting: Option<String>,
}

impl Call {
    /// A call that has not been opened yet.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            handle: None,
            greeting: None,
        }
    }

    /// Whether a session is currently active.
    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// The active session id, when open.
    pub fn session_id(&self) -> Option<&str> {
        self.handle.as_ref().map(SessionHandle::session_id)
    }

    /// The agent's greeting from the open, when there was one.
    pub fn greeting(&self) -> Option<&str> {
        self.greeting.as_deref()
    }

    /// Start a session for this call.
    ///
    /// Fails with [`SessionError::SessionActive`] when a session is already
    /// open. On a transport or server failure nothing changes locally, so
    /// the caller may retry.
    pub async fn open(&mut self, caller_info: CallerInfo) -> SessionResult<StartSessionResponse> {
        if self.handle.is_some() {
            return Err(SessionError::SessionActive);
        }
        let opened = self.client.start_session(caller_info).await?;
        self.handle = Some(opened.handle());
        self.greeting = opened.greeting.clone();
        Ok(opened)
    }

    /// Send one chat message on the active session.
    ///
    /// Fails locally with [`SessionError::NoActiveSession`] when the call is
    /// not open; no network call is made in that case.
    pub async fn send(&self, text: &str) -> SessionResult<ChatReply> {
        let handle = self.handle.as_ref().ok_or(SessionError::NoActiveSession)?;
        self.client.send_message(handle, text).await
    }

    /// End the call.
    ///
    /// With no active session this is a local no-op returning a
    /// `not_started` summary, with zero network calls. Otherwise the handle
    /// is taken out of the call *before* the end request is awaited: end is
    /// fire-and-forget, and a transport failure mid-call still leaves the
    /// call locally ended.
    pub async fn end(&mut self) -> SessionResult<SessionSummary> {
        let Some(handle) = self.handle.take() else {
            debug!("end on a call with no active session; nothing to do");
            return Ok(SessionSummary::not_started());
        };
        self.greeting = None;
        self.client.end_session(handle).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn offline_call() -> Call {
        // Points at a valid-looking address; these tests never touch it.
        Call::new(ApiClient::new(&ClientConfig::new("http://127.0.0.1:9")).unwrap())
    }

    #[tokio::test]
    async fn test_send_without_open_fails_locally() {
        let call = offline_call();
        let result = call.send("hello").await;
        assert!(matches!(result, Err(SessionError::NoActiveSession)));
    }

    #[tokio::test]
    async fn test_end_without_open_is_noop() {
        let mut call = offline_call();
        let summary = call.end().await.unwrap();
        assert_eq!(summary, SessionSummary::not_started());
        // Still endable again, still a no-op
        let summary = call.end().await.unwrap();
        assert_eq!(summary.status, "not_started");
    }

    #[test]
    fn test_new_call_is_idle() {
        let call = offline_call();
        assert!(!call.is_active());
        assert!(call.session_id().is_none());
        assert!(call.greeting().is_none());
    }
}
