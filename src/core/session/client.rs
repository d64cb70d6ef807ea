//! HTTP client for the CallSim backend.
//!
//! `ApiClient` is stateless: session identity lives in the [`SessionHandle`]
//! values it returns, never in the client itself, so one client can serve
//! any number of sequential or concurrent sessions. Calls are ordered only
//! by the caller's own sequencing; nothing here queues or serializes them.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde_json::json;
use tracing::{debug, info, warn};
use url::Url;

use super::error::{SessionError, SessionResult};
use super::messages::{
    CallerInfo, ChatReply, ErrorResponse, HealthReport, Lang, SessionSummary,
    StartSessionResponse, Voice, VoicesResponse,
};
use crate::config::ClientConfig;
use crate::core::speech::AudioClip;

/// API key header recognized by the backend.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Session token header recognized by the backend.
pub const SESSION_TOKEN_HEADER: &str = "X-Session-Token";

/// User-Agent header value for API requests.
const USER_AGENT: &str = concat!("CallSim-Client/", env!("CARGO_PKG_VERSION"));

/// Fallback MIME type when the synthesis response omits Content-Type.
const DEFAULT_AUDIO_MIME: &str = "audio/mpeg";

// =============================================================================
// Session Handle
// =============================================================================

/// Identity of one active session: the server-issued id and access token.
///
/// Returned by a successful [`ApiClient::start_session`] and required by
/// every subsequent chat call. [`ApiClient::end_session`] consumes the
/// handle, so a send after end is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    session_id: String,
    token: String,
}

impl SessionHandle {
    pub fn new(session_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            token: token.into(),
        }
    }

    /// Opaque server-issued session identifier.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Opaque access token for this session.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl StartSessionResponse {
    /// The session identity carried by this response.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle::new(&self.session_id, &self.token)
    }
}

// =============================================================================
// API Client
// =============================================================================

/// HTTP surface of the CallSim backend.
///
/// # Example
///
/// ```rust,no_run
/// use callsim_client::{ApiClient, ClientConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ApiClient::new(&ClientConfig::new("http://127.0.0.1:5000"))?;
///
/// let opened = client.start_session(Default::default()).await?;
/// let handle = opened.handle();
///
/// let reply = client.send_message(&handle, "My package is late").await?;
/// println!("agent: {}", reply.reply);
///
/// let summary = client.end_session(handle).await?;
/// println!("call {} with {} lines", summary.status, summary.transcript.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    /// Base URL without a trailing slash.
    base_url: String,
    api_key: Option<String>,
}

impl ApiClient {
    /// Create a client for the backend described by `config`.
    pub fn new(config: &ClientConfig) -> SessionResult<Self> {
        let parsed = Url::parse(&config.base_url)
            .map_err(|e| SessionError::ConfigurationError(format!("invalid base URL: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SessionError::ConfigurationError(format!(
                "unsupported base URL scheme '{}'",
                parsed.scheme()
            )));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(90))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                SessionError::ConfigurationError(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// The backend address this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attach credential headers: the API key whenever configured, the
    /// session token whenever a session is in play.
    fn with_auth(&self, mut request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        if let Some(ref key) = self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        if let Some(token) = token {
            request = request.header(SESSION_TOKEN_HEADER, token);
        }
        request
    }

    /// Map a non-2xx response to an [`SessionError::ApiError`] carrying the
    /// server's message when the body has one.
    async fn check(response: Response) -> SessionResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let status = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .unwrap_or_default()
            .into_message(status);
        Err(SessionError::ApiError { status, message })
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Probe `GET /api/health`.
    ///
    /// Never raises: transport failures and non-2xx answers come back as an
    /// unreachable report, so callers can treat this as a non-fatal probe.
    pub async fn health_check(&self) -> HealthReport {
        let request = self.with_auth(self.http.get(self.endpoint("/api/health")), None);
        match request.send().await {
            Ok(response) if response.status().is_success() => {
                response.json::<HealthReport>().await.unwrap_or_else(|e| {
                    warn!("health check returned an unparseable body: {e}");
                    HealthReport::unreachable(format!("unparseable health response: {e}"))
                })
            }
            Ok(response) => HealthReport::unreachable(format!("HTTP {}", response.status().as_u16())),
            Err(e) => {
                warn!("health check failed: {e}");
                HealthReport::unreachable(e.to_string())
            }
        }
    }

    // =========================================================================
    // Session lifecycle
    // =========================================================================

    /// `POST /api/session/start` with the caller description.
    ///
    /// On success the response carries the new session's identity (see
    /// [`StartSessionResponse::handle`]) and the agent's greeting. On any
    /// failure nothing is created client-side, so the caller may retry.
    pub async fn start_session(
        &self,
        caller_info: CallerInfo,
    ) -> SessionResult<StartSessionResponse> {
        let request = self
            .with_auth(self.http.post(self.endpoint("/api/session/start")), None)
            .json(&json!({ "caller_info": caller_info }));
        let response = Self::check(request.send().await?).await?;
        let opened = response.json::<StartSessionResponse>().await?;
        info!(session_id = %opened.session_id, "session started");
        Ok(opened)
    }

    /// `POST /api/chat` for one chat turn within `session`.
    pub async fn send_message(
        &self,
        session: &SessionHandle,
        text: &str,
    ) -> SessionResult<ChatReply> {
        debug!(
            session_id = %session.session_id(),
            chars = text.len(),
            "sending chat message"
        );
        let request = self
            .with_auth(
                self.http.post(self.endpoint("/api/chat")),
                Some(session.token()),
            )
            .json(&json!({
                "message": text,
                "session_id": session.session_id(),
            }));
        let response = Self::check(request.send().await?).await?;
        Ok(response.json::<ChatReply>().await?)
    }

    /// `POST /api/session/{id}/end`, consuming the handle.
    ///
    /// End is fire-and-forget: the handle is gone whether or not the server
    /// confirms, because a half-delivered end leaves the server-side session
    /// unusable anyway.
    pub async fn end_session(&self, session: SessionHandle) -> SessionResult<SessionSummary> {
        let url = self.endpoint(&format!("/api/session/{}/end", session.session_id()));
        let request = self.with_auth(self.http.post(url), Some(session.token()));
        let response = Self::check(request.send().await?).await?;
        let summary = response.json::<SessionSummary>().await?;
        info!(
            session_id = %session.session_id(),
            lines = summary.transcript.len(),
            "session ended"
        );
        Ok(summary)
    }

    // =========================================================================
    // Speech synthesis
    // =========================================================================

    /// `POST /api/tts`: render `text` in `lang` to an audio clip.
    ///
    /// Ownership of the clip transfers to the playback step, which is
    /// responsible for releasing the transient playback handle it wraps the
    /// clip in.
    pub async fn synthesize(&self, text: &str, lang: Lang) -> SessionResult<AudioClip> {
        let request = self
            .with_auth(self.http.post(self.endpoint("/api/tts")), None)
            .json(&json!({ "text": text, "lang": lang.as_str() }));
        let response = Self::check(request.send().await?).await?;
        let mime = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_AUDIO_MIME)
            .to_string();
        let data = response.bytes().await?;
        debug!(bytes = data.len(), %mime, "synthesis clip received");
        Ok(AudioClip::new(data, mime))
    }

    /// `GET /api/tts/voices`: the synthesis voice catalog.
    ///
    /// Voice selection is a cosmetic enhancement, so any failure degrades to
    /// an empty list rather than raising.
    pub async fn voices(&self) -> Vec<Voice> {
        let request = self.with_auth(self.http.get(self.endpoint("/api/tts/voices")), None);
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("voice catalog fetch failed: {e}");
                return Vec::new();
            }
        };
        match Self::check(response).await {
            Ok(response) => match response.json::<VoicesResponse>().await {
                Ok(catalog) => catalog.voices,
                Err(e) => {
                    warn!("voice catalog body unparseable: {e}");
                    Vec::new()
                }
            },
            Err(e) => {
                warn!("voice catalog fetch rejected: {e}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_rejects_bad_base_url() {
        let result = ApiClient::new(&ClientConfig::new("not a url"));
        assert!(matches!(result, Err(SessionError::ConfigurationError(_))));

        let result = ApiClient::new(&ClientConfig::new("ftp://example.com"));
        assert!(matches!(result, Err(SessionError::ConfigurationError(_))));
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = ApiClient::new(&ClientConfig::new("http://localhost:5000/")).unwrap();
        assert_eq!(
            client.endpoint("/api/health"),
            "http://localhost:5000/api/health"
        );
    }

    #[test]
    fn test_handle_from_start_response() {
        let response = StartSessionResponse {
            session_id: "abc123".to_string(),
            token: "tok1".to_string(),
            greeting: None,
        };
        let handle = response.handle();
        assert_eq!(handle.session_id(), "abc123");
        assert_eq!(handle.token(), "tok1");
    }
}
