//! Speech output tests: strategy fallback and playback-handle hygiene.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use serial_test::serial;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use callsim_client::{
    ApiClient, AudioClip, AudioOutput, ClientConfig, Lang, NullOutput, PlaybackHandle,
    RemoteSynth, Speaker, SpeechError, SpeechSynth, SpokenVia,
};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&ClientConfig::new(server.uri())).expect("client builds")
}

async fn mount_tts_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/tts"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/mpeg")
                .set_body_bytes(vec![0u8; 64]),
        )
        .mount(server)
        .await;
}

async fn mount_tts_failing(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/tts"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Failed to generate speech"
        })))
        .mount(server)
        .await;
}

/// Output that always fails, for exercising the failure exit path.
struct BrokenOutput;

#[async_trait]
impl AudioOutput for BrokenOutput {
    async fn play(&self, _clip: AudioClip) -> Result<(), SpeechError> {
        Err(SpeechError::Playback("device gone".to_string()))
    }
}

/// Synth stub for the fallback slot.
struct StubSynth {
    fail: bool,
}

#[async_trait]
impl SpeechSynth for StubSynth {
    fn name(&self) -> &str {
        "stub"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn speak(&self, _text: &str, _lang: Lang) -> Result<(), SpeechError> {
        if self.fail {
            Err(SpeechError::Unavailable("no synthesizer".to_string()))
        } else {
            Ok(())
        }
    }
}

// =============================================================================
// Playback handle hygiene
// =============================================================================

#[tokio::test]
#[serial(playback_handles)]
async fn test_speak_releases_handle_on_success() {
    let server = MockServer::start().await;
    mount_tts_ok(&server).await;

    let baseline = PlaybackHandle::active_count();
    let synth = RemoteSynth::new(client_for(&server), Arc::new(NullOutput::new()));
    synth.speak("Hello there", Lang::En).await.unwrap();
    assert_eq!(PlaybackHandle::active_count(), baseline);
}

#[tokio::test]
#[serial(playback_handles)]
async fn test_speak_releases_handle_on_playback_failure() {
    let server = MockServer::start().await;
    mount_tts_ok(&server).await;

    let baseline = PlaybackHandle::active_count();
    let synth = RemoteSynth::new(client_for(&server), Arc::new(BrokenOutput));
    let err = synth.speak("Hello there", Lang::En).await.unwrap_err();
    assert!(matches!(err, SpeechError::Playback(_)));
    assert_eq!(PlaybackHandle::active_count(), baseline);
}

#[tokio::test]
#[serial(playback_handles)]
async fn test_speak_creates_no_handle_when_synthesis_fails() {
    let server = MockServer::start().await;
    mount_tts_failing(&server).await;

    let baseline = PlaybackHandle::active_count();
    let synth = RemoteSynth::new(client_for(&server), Arc::new(NullOutput::new()));
    let err = synth.speak("Hello there", Lang::En).await.unwrap_err();
    assert!(matches!(err, SpeechError::Synthesis(_)));
    assert_eq!(PlaybackHandle::active_count(), baseline);
}

// =============================================================================
// Fallback strategy over the wire
// =============================================================================

#[tokio::test]
async fn test_server_path_speaks_when_healthy() {
    let server = MockServer::start().await;
    mount_tts_ok(&server).await;

    let speaker = Speaker::new(
        Box::new(RemoteSynth::new(client_for(&server), Arc::new(NullOutput::new()))),
        Box::new(StubSynth { fail: true }),
    );
    let via = speaker.speak("Hello there", Lang::En).await.unwrap();
    assert_eq!(via, SpokenVia::Server);
}

#[tokio::test]
async fn test_fallback_engages_when_server_synthesis_fails() {
    let server = MockServer::start().await;
    mount_tts_failing(&server).await;

    let speaker = Speaker::new(
        Box::new(RemoteSynth::new(client_for(&server), Arc::new(NullOutput::new()))),
        Box::new(StubSynth { fail: false }),
    );
    let via = speaker.speak("Hello there", Lang::En).await.unwrap();
    assert_eq!(via, SpokenVia::Platform);
}

#[tokio::test]
async fn test_fallback_engages_when_playback_fails() {
    let server = MockServer::start().await;
    mount_tts_ok(&server).await;

    let speaker = Speaker::new(
        Box::new(RemoteSynth::new(client_for(&server), Arc::new(BrokenOutput))),
        Box::new(StubSynth { fail: false }),
    );
    let via = speaker.speak("Hello there", Lang::En).await.unwrap();
    assert_eq!(via, SpokenVia::Platform);
}

#[tokio::test]
async fn test_both_paths_failing_surfaces_both_causes() {
    let server = MockServer::start().await;
    mount_tts_failing(&server).await;

    let speaker = Speaker::new(
        Box::new(RemoteSynth::new(client_for(&server), Arc::new(NullOutput::new()))),
        Box::new(StubSynth { fail: true }),
    );
    let err = speaker.speak("Hello there", Lang::En).await.unwrap_err();
    match err {
        SpeechError::BothPathsFailed { primary, fallback } => {
            assert!(primary.contains("Failed to generate speech"));
            assert!(fallback.contains("no synthesizer"));
        }
        other => panic!("expected BothPathsFailed, got: {other:?}"),
    }
}
