//! Typed client for the remote speech service.
//!
//! Three stateless operations plus a health probe, each idempotent at the
//! transport level. Nothing here retries automatically — a failure goes
//! straight back to the caller, and the next attempt is a new user action.

use crate::audio::take::AudioTake;
use crate::defaults;
use crate::error::{Result, VoxlateError};
use crate::service::types::{
    ErrorBody, RemoteResult, ServiceStatus, SpeakTextResponse, TextTranslationRequest,
    TranslateAudioResponse, TranslateTextResponse,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Trait for the remote speech service operations.
///
/// This trait allows swapping implementations (HTTP client vs mock).
/// All operations are safe to invoke concurrently; the controller
/// serializes the primary flows itself.
#[async_trait]
pub trait SpeechService: Send + Sync {
    /// Upload a sealed take for transcription + translation.
    async fn translate_audio(&self, take: AudioTake, src: &str, tgt: &str)
    -> Result<RemoteResult>;

    /// Translate text. Callers must not pass empty/whitespace text —
    /// the controller treats that as a local no-op and never gets here.
    async fn translate_text(&self, text: &str, src: &str, tgt: &str) -> Result<RemoteResult>;

    /// Synthesize speech for text in the given language.
    async fn speak_text(&self, text: &str, lang: &str) -> Result<RemoteResult>;

    /// Probe the service's health endpoint.
    async fn health(&self) -> Result<ServiceStatus>;
}

/// HTTP implementation of [`SpeechService`].
#[derive(Debug, Clone)]
pub struct HttpSpeechService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSpeechService {
    /// Create a client against a service base URL with the default timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, defaults::REQUEST_TIMEOUT)
    }

    /// Create a client with an explicit request timeout.
    ///
    /// The timeout is what keeps a hung remote call from stranding the
    /// session in its processing state — a timed-out request surfaces as
    /// `ServiceUnreachable` and the controller falls back to idle.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VoxlateError::Other(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into a `ServiceError`, extracting the
    /// service's `detail` field when the body carries one.
    async fn error_from_response(response: reqwest::Response) -> VoxlateError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.detail)
            .unwrap_or(body);
        VoxlateError::ServiceError { status, message }
    }
}

#[async_trait]
impl SpeechService for HttpSpeechService {
    async fn translate_audio(
        &self,
        take: AudioTake,
        src: &str,
        tgt: &str,
    ) -> Result<RemoteResult> {
        let file_name = take.file_name();
        let mime = take.format().mime_type();
        let size = take.size_bytes();

        tracing::debug!(bytes = size, src, tgt, "uploading take for translation");

        let part = reqwest::multipart::Part::bytes(take.into_bytes())
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| VoxlateError::Other(format!("Invalid MIME type: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("src_lang", src.to_string())
            .text("tgt_lang", tgt.to_string());

        let response = self
            .client
            .post(self.url(defaults::TRANSLATE_AUDIO_PATH))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let parsed: TranslateAudioResponse = response.json().await?;
        Ok(parsed.into())
    }

    async fn translate_text(&self, text: &str, src: &str, tgt: &str) -> Result<RemoteResult> {
        tracing::debug!(src, tgt, "translating text");

        let response = self
            .client
            .post(self.url(defaults::TRANSLATE_TEXT_PATH))
            .json(&TextTranslationRequest {
                text,
                src_lang: src,
                tgt_lang: tgt,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let parsed: TranslateTextResponse = response.json().await?;
        Ok(parsed.into())
    }

    async fn speak_text(&self, text: &str, lang: &str) -> Result<RemoteResult> {
        tracing::debug!(lang, "requesting speech synthesis");

        let response = self
            .client
            .post(self.url(defaults::SPEAK_TEXT_PATH))
            .form(&[("text", text), ("language", lang)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let parsed: SpeakTextResponse = response.json().await?;
        Ok(parsed.into())
    }

    async fn health(&self) -> Result<ServiceStatus> {
        let response = self.client.get(self.url("/")).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(response.json().await?)
    }
}

/// A call recorded by [`MockSpeechService`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    TranslateAudio {
        bytes: Vec<u8>,
        chunk_count: usize,
        src: String,
        tgt: String,
    },
    TranslateText {
        text: String,
        src: String,
        tgt: String,
    },
    SpeakText {
        text: String,
        lang: String,
    },
    Health,
}

/// How a configured mock failure presents itself.
#[derive(Debug, Clone, Copy, PartialEq)]
enum MockFailure {
    Unreachable,
    Status(u16),
}

/// Mock speech service for testing
///
/// Records every call (shared across clones) and returns configured
/// responses or failures.
#[derive(Debug, Clone)]
pub struct MockSpeechService {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    audio_response: RemoteResult,
    text_response: RemoteResult,
    speak_response: RemoteResult,
    failure: Option<MockFailure>,
}

impl MockSpeechService {
    /// Create a mock with empty successful responses.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            audio_response: RemoteResult {
                transcript: Some(String::new()),
                translation: Some(String::new()),
                audio_reference: None,
            },
            text_response: RemoteResult::default(),
            speak_response: RemoteResult::default(),
            failure: None,
        }
    }

    /// Configure the transcript/translation returned by `translate_audio`.
    pub fn with_transcription(mut self, transcript: &str, translation: &str) -> Self {
        self.audio_response.transcript = Some(transcript.to_string());
        self.audio_response.translation = Some(translation.to_string());
        self
    }

    /// Configure an audio reference on the `translate_audio` response.
    pub fn with_audio_reference(mut self, url: &str) -> Self {
        self.audio_response.audio_reference = Some(url.to_string());
        self
    }

    /// Configure the translation returned by `translate_text`.
    pub fn with_translation(mut self, translation: &str) -> Self {
        self.text_response.translation = Some(translation.to_string());
        self
    }

    /// Configure the audio URL returned by `speak_text`.
    pub fn with_speech_url(mut self, url: &str) -> Self {
        self.speak_response.audio_reference = Some(url.to_string());
        self
    }

    /// Make every operation fail as unreachable.
    pub fn with_unreachable_failure(mut self) -> Self {
        self.failure = Some(MockFailure::Unreachable);
        self
    }

    /// Make every operation fail with an HTTP status.
    pub fn with_status_failure(mut self, status: u16) -> Self {
        self.failure = Some(MockFailure::Status(status));
        self
    }

    /// Calls recorded so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: RecordedCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn check_failure(&self) -> Result<()> {
        match self.failure {
            Some(MockFailure::Unreachable) => Err(VoxlateError::ServiceUnreachable {
                message: "mock service unreachable".to_string(),
            }),
            Some(MockFailure::Status(status)) => Err(VoxlateError::ServiceError {
                status,
                message: "mock service error".to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl Default for MockSpeechService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechService for MockSpeechService {
    async fn translate_audio(
        &self,
        take: AudioTake,
        src: &str,
        tgt: &str,
    ) -> Result<RemoteResult> {
        let chunk_count = take.chunk_count();
        self.record(RecordedCall::TranslateAudio {
            bytes: take.into_bytes(),
            chunk_count,
            src: src.to_string(),
            tgt: tgt.to_string(),
        });
        self.check_failure()?;
        Ok(self.audio_response.clone())
    }

    async fn translate_text(&self, text: &str, src: &str, tgt: &str) -> Result<RemoteResult> {
        self.record(RecordedCall::TranslateText {
            text: text.to_string(),
            src: src.to_string(),
            tgt: tgt.to_string(),
        });
        self.check_failure()?;
        Ok(self.text_response.clone())
    }

    async fn speak_text(&self, text: &str, lang: &str) -> Result<RemoteResult> {
        self.record(RecordedCall::SpeakText {
            text: text.to_string(),
            lang: lang.to_string(),
        });
        self.check_failure()?;
        Ok(self.speak_response.clone())
    }

    async fn health(&self) -> Result<ServiceStatus> {
        self.record(RecordedCall::Health);
        self.check_failure()?;
        Ok(ServiceStatus {
            status: "System Online".to_string(),
            offline_mode: true,
        })
    }
}
