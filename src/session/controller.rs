//! The speech translation session controller.
//!
//! Owns the session state machine and sequences capture → upload → result
//! application, the edit-and-retranslate path, the language swap, and the
//! speak/playback side-actions. No component other than this controller
//! mutates session fields.

use crate::audio::device::CaptureDevice;
use crate::error::{Result, VoxlateError};
use crate::playback::AudioOutput;
use crate::service::client::SpeechService;
use crate::session::{RecordingState, SessionSnapshot};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Orchestrates one user's transcript/translation session.
///
/// Session-mutating operations take `&mut self`, so the two primary flows
/// can never be in flight at once — `Processing` is the state machine's
/// lock and the borrow rules enforce it. `speak` side-flows clone the
/// shared service/output handles into a spawned task and are exempt.
pub struct SessionController {
    capture: Box<dyn CaptureDevice>,
    service: Arc<dyn SpeechService>,
    output: Arc<dyn AudioOutput>,
    source_language: String,
    target_language: String,
    transcript: String,
    translation: String,
    recording_state: RecordingState,
}

impl SessionController {
    /// Create a controller over the given capture, service, and output units.
    pub fn new(
        capture: Box<dyn CaptureDevice>,
        service: Arc<dyn SpeechService>,
        output: Arc<dyn AudioOutput>,
        source_language: &str,
        target_language: &str,
    ) -> Self {
        Self {
            capture,
            service,
            output,
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            transcript: String::new(),
            translation: String::new(),
            recording_state: RecordingState::Idle,
        }
    }

    /// Current recording state.
    pub fn recording_state(&self) -> RecordingState {
        self.recording_state
    }

    /// Current transcript text.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Current translation text. May be stale relative to the transcript
    /// until the next explicit retranslate.
    pub fn translation(&self) -> &str {
        &self.translation
    }

    /// Current source language code.
    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    /// Current target language code.
    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Read-only snapshot for the presentation layer.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            source_language: self.source_language.clone(),
            target_language: self.target_language.clone(),
            transcript: self.transcript.clone(),
            translation: self.translation.clone(),
            recording_state: self.recording_state,
        }
    }

    /// Open the microphone and begin a new take.
    ///
    /// No-op while already recording, and while a submission is in flight
    /// (the record control is disabled during processing). Entering the
    /// recording state discards the previous transcript and translation.
    ///
    /// # Errors
    /// `DeviceUnavailable` if the microphone cannot be acquired; the
    /// session stays idle.
    pub fn start_recording(&mut self) -> Result<()> {
        match self.recording_state {
            RecordingState::Recording | RecordingState::Processing => return Ok(()),
            RecordingState::Idle => {}
        }

        self.capture.open()?;
        self.capture.start()?;

        // A fresh take discards prior results.
        self.transcript.clear();
        self.translation.clear();
        self.recording_state = RecordingState::Recording;
        Ok(())
    }

    /// Seal the take and submit it for transcription + translation.
    ///
    /// No-op when not recording. A take with zero bytes is absorbed
    /// silently — the session returns to idle without contacting the
    /// service. On success the transcript and translation are overwritten
    /// and, if the response carries an audio reference, playback is
    /// triggered best-effort. On failure both texts keep the cleared
    /// values they got when recording started.
    pub async fn stop_recording(&mut self) -> Result<()> {
        if self.recording_state != RecordingState::Recording {
            return Ok(());
        }

        let take = match self.capture.stop() {
            Ok(take) => take,
            Err(VoxlateError::EmptyCapture) => {
                self.recording_state = RecordingState::Idle;
                return Ok(());
            }
            Err(e) => {
                self.recording_state = RecordingState::Idle;
                return Err(e);
            }
        };

        self.recording_state = RecordingState::Processing;
        let service = Arc::clone(&self.service);
        let result = service
            .translate_audio(take, &self.source_language, &self.target_language)
            .await;
        self.recording_state = RecordingState::Idle;

        let remote = result?;
        if let Some(transcript) = remote.transcript {
            self.transcript = transcript;
        }
        if let Some(translation) = remote.translation {
            self.translation = translation;
        }
        if let Some(reference) = remote.audio_reference {
            self.autoplay(reference);
        }
        Ok(())
    }

    /// Re-translate the currently displayed (possibly hand-edited)
    /// transcript.
    ///
    /// No-op unless idle with a non-blank transcript — blank text is never
    /// sent. On success only the translation is overwritten; on failure it
    /// is left untouched.
    pub async fn retranslate(&mut self) -> Result<()> {
        if self.recording_state != RecordingState::Idle {
            return Ok(());
        }
        if self.transcript.trim().is_empty() {
            return Ok(());
        }

        self.recording_state = RecordingState::Processing;
        let service = Arc::clone(&self.service);
        let result = service
            .translate_text(
                &self.transcript,
                &self.source_language,
                &self.target_language,
            )
            .await;
        self.recording_state = RecordingState::Idle;

        let remote = result?;
        if let Some(translation) = remote.translation {
            self.translation = translation;
        }
        Ok(())
    }

    /// Exchange the language pair and the transcript/translation pair as
    /// one operation, so the translation becomes the new source without a
    /// round trip.
    ///
    /// Refused while a submission is in flight.
    pub fn swap_languages(&mut self) {
        if self.recording_state == RecordingState::Processing {
            return;
        }
        std::mem::swap(&mut self.source_language, &mut self.target_language);
        std::mem::swap(&mut self.transcript, &mut self.translation);
    }

    /// Apply a direct user edit to the transcript.
    ///
    /// Accepted only while idle. Does not retranslate — the translation is
    /// stale until an explicit [`Self::retranslate`].
    pub fn set_transcript(&mut self, text: &str) {
        if self.recording_state != RecordingState::Idle {
            return;
        }
        self.transcript = text.to_string();
    }

    /// Speak arbitrary text in the given language.
    ///
    /// A fire-and-forget side-flow: independent of the state machine and
    /// allowed to overlap a primary flow or other speaks. Returns `None`
    /// for blank text (local no-op, nothing sent); otherwise the spawned
    /// task's handle, whose result reports a synthesis failure exactly
    /// once. Playback failures are logged only.
    pub fn speak(&self, text: &str, lang: &str) -> Option<JoinHandle<Result<()>>> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let service = Arc::clone(&self.service);
        let output = Arc::clone(&self.output);
        let text = text.to_string();
        let lang = lang.to_string();

        Some(tokio::spawn(async move {
            let remote = match service.speak_text(&text, &lang).await {
                Ok(remote) => remote,
                Err(e) => {
                    warn!("speech synthesis failed: {}", e);
                    return Err(e);
                }
            };
            if let Some(reference) = remote.audio_reference {
                if let Err(e) = output.play(&reference).await {
                    warn!("playback failed: {}", e);
                }
            }
            Ok(())
        }))
    }

    /// Best-effort autoplay of a translate-audio result.
    fn autoplay(&self, reference: String) {
        let output = Arc::clone(&self.output);
        tokio::spawn(async move {
            if let Err(e) = output.play(&reference).await {
                warn!("autoplay failed: {}", e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::device::MockCaptureDevice;
    use crate::playback::MockAudioOutput;
    use crate::service::client::{MockSpeechService, RecordedCall};
    use std::time::Duration;

    fn controller_with(
        capture: MockCaptureDevice,
        service: MockSpeechService,
        output: MockAudioOutput,
    ) -> SessionController {
        SessionController::new(
            Box::new(capture),
            Arc::new(service),
            Arc::new(output),
            "en",
            "fr",
        )
    }

    #[tokio::test]
    async fn test_initial_state_is_idle() {
        let controller = controller_with(
            MockCaptureDevice::new(),
            MockSpeechService::new(),
            MockAudioOutput::new(),
        );
        assert_eq!(controller.recording_state(), RecordingState::Idle);
        assert_eq!(controller.transcript(), "");
        assert_eq!(controller.translation(), "");
    }

    #[tokio::test]
    async fn test_swap_languages_is_an_involution() {
        let mut controller = controller_with(
            MockCaptureDevice::new(),
            MockSpeechService::new(),
            MockAudioOutput::new(),
        );
        controller.set_transcript("hello");

        let before = controller.snapshot();
        controller.swap_languages();

        assert_eq!(controller.source_language(), "fr");
        assert_eq!(controller.target_language(), "en");
        assert_eq!(controller.transcript(), "");
        assert_eq!(controller.translation(), "hello");

        controller.swap_languages();
        assert_eq!(controller.snapshot(), before);
    }

    #[tokio::test]
    async fn test_start_recording_is_idempotent() {
        let mut controller = controller_with(
            MockCaptureDevice::new(),
            MockSpeechService::new(),
            MockAudioOutput::new(),
        );

        controller.start_recording().unwrap();
        let snapshot = controller.snapshot();

        controller.start_recording().unwrap();
        assert_eq!(controller.snapshot(), snapshot);
        assert_eq!(controller.recording_state(), RecordingState::Recording);
    }

    #[tokio::test]
    async fn test_start_recording_clears_previous_results() {
        let mut controller = controller_with(
            MockCaptureDevice::new(),
            MockSpeechService::new(),
            MockAudioOutput::new(),
        );
        controller.set_transcript("leftover");
        controller.swap_languages(); // translation = "leftover"
        controller.swap_languages();

        controller.start_recording().unwrap();
        assert_eq!(controller.transcript(), "");
        assert_eq!(controller.translation(), "");
    }

    #[tokio::test]
    async fn test_start_recording_device_unavailable_stays_idle() {
        let mut controller = controller_with(
            MockCaptureDevice::new().with_open_failure(),
            MockSpeechService::new(),
            MockAudioOutput::new(),
        );

        let result = controller.start_recording();
        assert!(matches!(
            result,
            Err(VoxlateError::DeviceUnavailable { .. })
        ));
        assert_eq!(controller.recording_state(), RecordingState::Idle);
    }

    #[tokio::test]
    async fn test_stop_recording_while_idle_is_noop() {
        let service = MockSpeechService::new();
        let mut controller = controller_with(
            MockCaptureDevice::new(),
            service.clone(),
            MockAudioOutput::new(),
        );

        controller.stop_recording().await.unwrap();
        assert_eq!(controller.recording_state(), RecordingState::Idle);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_capture_never_reaches_the_service() {
        let service = MockSpeechService::new();
        let mut controller = controller_with(
            MockCaptureDevice::new().with_chunks(vec![]),
            service.clone(),
            MockAudioOutput::new(),
        );

        controller.start_recording().unwrap();
        controller.stop_recording().await.unwrap();

        assert_eq!(controller.recording_state(), RecordingState::Idle);
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_scenario_a_take_chunks_reach_service_intact() {
        let service = MockSpeechService::new();
        let capture =
            MockCaptureDevice::new().with_chunks(vec![vec![1, 2], vec![3, 4], vec![5]]);
        let mut controller =
            controller_with(capture, service.clone(), MockAudioOutput::new());

        controller.start_recording().unwrap();
        controller.stop_recording().await.unwrap();

        let calls = service.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            RecordedCall::TranslateAudio {
                bytes,
                chunk_count,
                src,
                tgt,
            } => {
                assert_eq!(*chunk_count, 3);
                assert_eq!(bytes, &vec![1, 2, 3, 4, 5]);
                assert_eq!(src, "en");
                assert_eq!(tgt, "fr");
            }
            other => panic!("Expected TranslateAudio, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_scenario_b_success_applies_texts_without_playback() {
        let service = MockSpeechService::new().with_transcription("hello", "bonjour");
        let output = MockAudioOutput::new();
        let mut controller =
            controller_with(MockCaptureDevice::new(), service, output.clone());

        controller.start_recording().unwrap();
        controller.stop_recording().await.unwrap();

        assert_eq!(controller.transcript(), "hello");
        assert_eq!(controller.translation(), "bonjour");
        assert_eq!(controller.recording_state(), RecordingState::Idle);

        // No audio reference in the response → no playback triggered
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(output.played().is_empty());
    }

    #[tokio::test]
    async fn test_audio_reference_triggers_autoplay() {
        let service = MockSpeechService::new()
            .with_transcription("hello", "bonjour")
            .with_audio_reference("http://localhost:8000/audio/out.wav");
        let output = MockAudioOutput::new();
        let mut controller =
            controller_with(MockCaptureDevice::new(), service, output.clone());

        controller.start_recording().unwrap();
        controller.stop_recording().await.unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(
            output.played(),
            vec!["http://localhost:8000/audio/out.wav".to_string()]
        );
    }

    #[tokio::test]
    async fn test_autoplay_failure_does_not_revert_results() {
        let service = MockSpeechService::new()
            .with_transcription("hello", "bonjour")
            .with_audio_reference("http://localhost:8000/audio/out.wav");
        let output = MockAudioOutput::new().with_play_failure();
        let mut controller =
            controller_with(MockCaptureDevice::new(), service, output.clone());

        controller.start_recording().unwrap();
        controller.stop_recording().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(controller.transcript(), "hello");
        assert_eq!(controller.translation(), "bonjour");
        assert_eq!(controller.recording_state(), RecordingState::Idle);
    }

    #[tokio::test]
    async fn test_scenario_c_retranslate_edited_transcript() {
        let service = MockSpeechService::new().with_translation("bonsoir");
        let mut controller = controller_with(
            MockCaptureDevice::new(),
            service.clone(),
            MockAudioOutput::new(),
        );

        controller.set_transcript("good evening");
        controller.retranslate().await.unwrap();

        assert_eq!(controller.transcript(), "good evening");
        assert_eq!(controller.translation(), "bonsoir");
        assert_eq!(controller.recording_state(), RecordingState::Idle);

        let calls = service.calls();
        assert_eq!(
            calls,
            vec![RecordedCall::TranslateText {
                text: "good evening".to_string(),
                src: "en".to_string(),
                tgt: "fr".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_scenario_d_service_failure_reported_once() {
        let service = MockSpeechService::new().with_unreachable_failure();
        let mut controller = controller_with(
            MockCaptureDevice::new(),
            service.clone(),
            MockAudioOutput::new(),
        );

        controller.start_recording().unwrap();
        let result = controller.stop_recording().await;

        assert!(matches!(
            result,
            Err(VoxlateError::ServiceUnreachable { .. })
        ));
        assert_eq!(controller.recording_state(), RecordingState::Idle);
        // Texts keep the cleared values from recording start
        assert_eq!(controller.transcript(), "");
        assert_eq!(controller.translation(), "");
        // The submission happened exactly once — no retries
        assert_eq!(service.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_retranslate_blank_transcript_is_local_noop() {
        let service = MockSpeechService::new();
        let mut controller = controller_with(
            MockCaptureDevice::new(),
            service.clone(),
            MockAudioOutput::new(),
        );

        controller.set_transcript("   \t\n");
        controller.retranslate().await.unwrap();

        assert!(service.calls().is_empty());
        assert_eq!(controller.translation(), "");
    }

    #[tokio::test]
    async fn test_retranslate_failure_leaves_translation_unchanged() {
        let service = MockSpeechService::new().with_unreachable_failure();
        let mut controller = controller_with(
            MockCaptureDevice::new(),
            service,
            MockAudioOutput::new(),
        );

        // Seed a translation without touching the service: edit + swap
        controller.set_transcript("bonjour");
        controller.swap_languages();
        assert_eq!(controller.translation(), "bonjour");

        controller.set_transcript("hello");
        let result = controller.retranslate().await;

        assert!(result.is_err());
        assert_eq!(controller.transcript(), "hello");
        assert_eq!(controller.translation(), "bonjour");
        assert_eq!(controller.recording_state(), RecordingState::Idle);
    }

    #[tokio::test]
    async fn test_set_transcript_ignored_while_recording() {
        let mut controller = controller_with(
            MockCaptureDevice::new(),
            MockSpeechService::new(),
            MockAudioOutput::new(),
        );

        controller.start_recording().unwrap();
        controller.set_transcript("should not apply");
        assert_eq!(controller.transcript(), "");
    }

    #[tokio::test]
    async fn test_speak_blank_text_is_local_noop() {
        let service = MockSpeechService::new();
        let controller = controller_with(
            MockCaptureDevice::new(),
            service.clone(),
            MockAudioOutput::new(),
        );

        assert!(controller.speak("  ", "fr").is_none());
        assert!(service.calls().is_empty());
    }

    #[tokio::test]
    async fn test_speak_synthesizes_and_plays() {
        let service =
            MockSpeechService::new().with_speech_url("http://localhost:8000/audio/tts.wav");
        let output = MockAudioOutput::new();
        let controller =
            controller_with(MockCaptureDevice::new(), service.clone(), output.clone());

        let handle = controller.speak("bonjour", "fr").expect("side-flow spawned");
        handle.await.unwrap().unwrap();

        assert_eq!(
            service.calls(),
            vec![RecordedCall::SpeakText {
                text: "bonjour".to_string(),
                lang: "fr".to_string(),
            }]
        );
        assert_eq!(
            output.played(),
            vec!["http://localhost:8000/audio/tts.wav".to_string()]
        );
    }

    #[tokio::test]
    async fn test_speak_failure_reported_through_handle() {
        let service = MockSpeechService::new().with_status_failure(500);
        let output = MockAudioOutput::new();
        let controller =
            controller_with(MockCaptureDevice::new(), service, output.clone());

        let handle = controller.speak("hello", "en").expect("side-flow spawned");
        let result = handle.await.unwrap();

        assert!(matches!(result, Err(VoxlateError::ServiceError { .. })));
        assert!(output.played().is_empty());
    }

    #[tokio::test]
    async fn test_speak_never_changes_recording_state() {
        let service =
            MockSpeechService::new().with_speech_url("http://localhost:8000/audio/tts.wav");
        let controller = controller_with(
            MockCaptureDevice::new(),
            service,
            MockAudioOutput::new(),
        );

        let handle = controller.speak("hello", "en").unwrap();
        handle.await.unwrap().unwrap();
        assert_eq!(controller.recording_state(), RecordingState::Idle);
    }

    #[tokio::test]
    async fn test_empty_service_transcript_applies_verbatim() {
        // The service answers with empty strings when it hears nothing
        let service = MockSpeechService::new().with_transcription("", "");
        let mut controller =
            controller_with(MockCaptureDevice::new(), service, MockAudioOutput::new());

        controller.set_transcript("stale");
        controller.start_recording().unwrap();
        controller.stop_recording().await.unwrap();

        assert_eq!(controller.transcript(), "");
        assert_eq!(controller.translation(), "");
        assert_eq!(controller.recording_state(), RecordingState::Idle);
    }
}
