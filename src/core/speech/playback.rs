//! Audio clips, playback handles, and the audio-device seam.
//!
//! A [`PlaybackHandle`] is the transient reference to an in-memory clip
//! while it is being played. Handles are counted process-wide so tests can
//! assert that playback releases them on both the success and the failure
//! exit path.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use super::error::SpeechError;

/// Process-wide count of live playback handles.
static ACTIVE_HANDLES: AtomicUsize = AtomicUsize::new(0);

// =============================================================================
// Audio Clip
// =============================================================================

/// An audio payload as returned by the synthesis endpoint.
///
/// The bytes are reference-counted, so cloning a clip is cheap and does not
/// duplicate the audio data.
#[derive(Debug, Clone)]
pub struct AudioClip {
    data: Bytes,
    mime: String,
}

impl AudioClip {
    pub fn new(data: impl Into<Bytes>, mime: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime: mime.into(),
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// MIME type reported by the server, e.g. `audio/mpeg`.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// =============================================================================
// Playback Handle
// =============================================================================

/// Transient handle over one in-flight playback.
///
/// Creating a handle registers it in the process-wide count; releasing it
/// (explicitly or by drop) deregisters it. Ownership transfers from the
/// synthesis step to the playback step, which must release the handle on
/// both the success and the failure exit path.
#[derive(Debug)]
pub struct PlaybackHandle {
    clip: AudioClip,
}

impl PlaybackHandle {
    pub fn new(clip: AudioClip) -> Self {
        ACTIVE_HANDLES.fetch_add(1, Ordering::SeqCst);
        Self { clip }
    }

    /// The clip this handle refers to.
    pub fn clip(&self) -> &AudioClip {
        &self.clip
    }

    /// Release the handle. Dropping has the same effect; this form makes
    /// the release point explicit at the call site.
    pub fn release(self) {
        drop(self);
    }

    /// Number of handles currently alive in this process. Returns to its
    /// baseline once every playback has released its handle.
    pub fn active_count() -> usize {
        ACTIVE_HANDLES.load(Ordering::SeqCst)
    }
}

impl Drop for PlaybackHandle {
    fn drop(&mut self) {
        ACTIVE_HANDLES.fetch_sub(1, Ordering::SeqCst);
        debug!(bytes = self.clip.len(), "playback handle released");
    }
}

// =============================================================================
// Audio Output
// =============================================================================

/// Seam over the audio device.
#[async_trait]
pub trait AudioOutput: Send + Sync {
    /// Play the clip to completion. Resolves when playback ends.
    async fn play(&self, clip: AudioClip) -> Result<(), SpeechError>;
}

/// Plays clips on the default audio device via rodio.
///
/// Decoding and device I/O are blocking, so the work runs on the blocking
/// thread pool rather than the async runtime.
#[derive(Debug, Default)]
pub struct RodioOutput;

impl RodioOutput {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioOutput for RodioOutput {
    async fn play(&self, clip: AudioClip) -> Result<(), SpeechError> {
        if clip.is_empty() {
            return Err(SpeechError::Playback("empty audio clip".to_string()));
        }
        let bytes = clip.data().to_vec();
        tokio::task::spawn_blocking(move || {
            let (_stream, handle) = rodio::OutputStream::try_default()
                .map_err(|e| SpeechError::Playback(format!("no audio device: {e}")))?;
            let sink = rodio::Sink::try_new(&handle)
                .map_err(|e| SpeechError::Playback(format!("failed to open sink: {e}")))?;
            let source = rodio::Decoder::new(Cursor::new(bytes))
                .map_err(|e| SpeechError::Playback(format!("undecodable clip: {e}")))?;
            sink.append(source);
            sink.sleep_until_end();
            Ok(())
        })
        .await
        .map_err(|e| SpeechError::Playback(format!("playback task failed: {e}")))?
    }
}

/// Discards clips immediately. Used on headless hosts and in tests.
#[derive(Debug, Default)]
pub struct NullOutput;

impl NullOutput {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioOutput for NullOutput {
    async fn play(&self, clip: AudioClip) -> Result<(), SpeechError> {
        debug!(bytes = clip.len(), "discarding clip (null output)");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_clip_accessors() {
        let clip = AudioClip::new(vec![1u8, 2, 3], "audio/mpeg");
        assert_eq!(clip.data(), &[1, 2, 3]);
        assert_eq!(clip.mime(), "audio/mpeg");
        assert_eq!(clip.len(), 3);
        assert!(!clip.is_empty());
    }

    #[test]
    #[serial(playback_handles)]
    fn test_handle_count_returns_to_baseline() {
        let baseline = PlaybackHandle::active_count();
        let handle = PlaybackHandle::new(AudioClip::new(vec![0u8; 8], "audio/mpeg"));
        assert_eq!(PlaybackHandle::active_count(), baseline + 1);
        handle.release();
        assert_eq!(PlaybackHandle::active_count(), baseline);
    }

    #[test]
    #[serial(playback_handles)]
    fn test_handle_released_on_drop() {
        let baseline = PlaybackHandle::active_count();
        {
            let _handle = PlaybackHandle::new(AudioClip::new(vec![0u8; 8], "audio/mpeg"));
            assert_eq!(PlaybackHandle::active_count(), baseline + 1);
        }
        assert_eq!(PlaybackHandle::active_count(), baseline);
    }

    #[tokio::test]
    async fn test_null_output_resolves() {
        let output = NullOutput::new();
        let result = output.play(AudioClip::new(vec![0u8; 4], "audio/mpeg")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_rodio_output_rejects_empty_clip() {
        let output = RodioOutput::new();
        let result = output.play(AudioClip::new(Vec::new(), "audio/mpeg")).await;
        assert!(matches!(result, Err(SpeechError::Playback(_))));
    }
}
