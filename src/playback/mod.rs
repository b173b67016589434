//! Playback of synthesized speech.
//!
//! Playback is always a best-effort side-action: a failed play never
//! blocks or reverts a translation result, it just logs. Each trigger
//! opens its own output stream, so overlapping playback is permitted and
//! nothing is deduplicated or queued.

use crate::error::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[cfg(feature = "playback")]
use crate::defaults;
#[cfg(feature = "playback")]
use crate::error::VoxlateError;

/// Trait for audio output devices.
///
/// This trait allows swapping implementations (real speaker vs mock).
#[async_trait]
pub trait AudioOutput: Send + Sync {
    /// Fetch, decode, and play audio from a reference URI.
    ///
    /// Returns once playback has finished.
    ///
    /// # Errors
    /// `Playback` if the reference cannot be fetched, decoded, or played.
    async fn play(&self, reference: &str) -> Result<()>;
}

/// Speaker output backed by rodio.
///
/// Fetches the referenced audio over HTTP, then decodes and plays it on
/// the default output device in a blocking worker.
#[cfg(feature = "playback")]
#[derive(Debug, Clone)]
pub struct SpeakerOutput {
    client: reqwest::Client,
}

#[cfg(feature = "playback")]
impl SpeakerOutput {
    /// Create a speaker output with its own HTTP client.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(defaults::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| VoxlateError::Playback {
                message: format!("failed to create fetch client: {e}"),
            })?;
        Ok(Self { client })
    }
}

#[cfg(feature = "playback")]
#[async_trait]
impl AudioOutput for SpeakerOutput {
    async fn play(&self, reference: &str) -> Result<()> {
        tracing::debug!(reference, "fetching audio for playback");

        let response = self
            .client
            .get(reference)
            .send()
            .await
            .map_err(|e| VoxlateError::Playback {
                message: format!("failed to fetch audio: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(VoxlateError::Playback {
                message: format!("audio fetch returned {}", response.status()),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| VoxlateError::Playback {
                message: format!("failed to read audio body: {e}"),
            })?
            .to_vec();

        // rodio is blocking; run decode + play off the async runtime.
        tokio::task::spawn_blocking(move || -> Result<()> {
            let stream = rodio::OutputStreamBuilder::open_default_stream().map_err(|e| {
                VoxlateError::Playback {
                    message: format!("failed to open output stream: {e}"),
                }
            })?;

            let decoder = rodio::Decoder::new(std::io::Cursor::new(bytes)).map_err(|e| {
                VoxlateError::Playback {
                    message: format!("failed to decode audio: {e}"),
                }
            })?;

            let sink = rodio::Sink::connect_new(stream.mixer());
            sink.append(decoder);
            sink.sleep_until_end();
            Ok(())
        })
        .await
        .map_err(|e| VoxlateError::Playback {
            message: format!("playback task failed: {e}"),
        })?
    }
}

/// Mock audio output for testing
#[derive(Debug, Clone)]
pub struct MockAudioOutput {
    played: Arc<Mutex<Vec<String>>>,
    should_fail: bool,
}

impl MockAudioOutput {
    /// Create a mock that records every played reference.
    pub fn new() -> Self {
        Self {
            played: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
        }
    }

    /// Configure the mock to fail every play
    pub fn with_play_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// References played so far, in order (shared across clones).
    pub fn played(&self) -> Vec<String> {
        self.played.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Default for MockAudioOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioOutput for MockAudioOutput {
    async fn play(&self, reference: &str) -> Result<()> {
        if let Ok(mut played) = self.played.lock() {
            played.push(reference.to_string());
        }
        if self.should_fail {
            return Err(crate::error::VoxlateError::Playback {
                message: "mock playback failure".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_played_references() {
        let output = MockAudioOutput::new();
        output.play("http://localhost:8000/audio/a.wav").await.unwrap();
        output.play("http://localhost:8000/audio/b.wav").await.unwrap();

        assert_eq!(
            output.played(),
            vec![
                "http://localhost:8000/audio/a.wav".to_string(),
                "http://localhost:8000/audio/b.wav".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_mock_failure_still_records() {
        let output = MockAudioOutput::new().with_play_failure();
        let result = output.play("http://localhost:8000/audio/a.wav").await;

        assert!(result.is_err());
        assert_eq!(output.played().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_clones_share_play_log() {
        let output = MockAudioOutput::new();
        let clone = output.clone();
        clone.play("ref").await.unwrap();
        assert_eq!(output.played().len(), 1);
    }

    #[test]
    fn test_audio_output_is_object_safe() {
        fn assert_dyn(_: &dyn AudioOutput) {}
        let mock = MockAudioOutput::new();
        assert_dyn(&mock);
    }
}
