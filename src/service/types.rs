//! Wire types for the remote speech service.

use serde::{Deserialize, Serialize};

/// Response envelope shared by all service operations.
///
/// Partial fields are valid: a text-translate call fills only
/// `translation`, a speak call only `audio_reference`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RemoteResult {
    /// Transcript of uploaded audio in the source language.
    pub transcript: Option<String>,
    /// Translation into the target language.
    pub translation: Option<String>,
    /// URI of synthesized speech, playable by the playback unit.
    pub audio_reference: Option<String>,
}

/// Body of `POST /translate-text`.
#[derive(Debug, Serialize)]
pub struct TextTranslationRequest<'a> {
    pub text: &'a str,
    pub src_lang: &'a str,
    pub tgt_lang: &'a str,
}

/// Response of `POST /translate` (audio upload).
///
/// The service sends empty strings when speech recognition hears nothing,
/// and `audio_url` is null unless synthesis was requested alongside.
#[derive(Debug, Deserialize)]
pub struct TranslateAudioResponse {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub audio_url: Option<String>,
}

impl From<TranslateAudioResponse> for RemoteResult {
    fn from(resp: TranslateAudioResponse) -> Self {
        Self {
            transcript: Some(resp.transcript),
            translation: Some(resp.translation),
            audio_reference: resp.audio_url,
        }
    }
}

/// Response of `POST /translate-text`.
#[derive(Debug, Deserialize)]
pub struct TranslateTextResponse {
    pub translation: String,
}

impl From<TranslateTextResponse> for RemoteResult {
    fn from(resp: TranslateTextResponse) -> Self {
        Self {
            translation: Some(resp.translation),
            ..Self::default()
        }
    }
}

/// Response of `POST /speak-text`.
#[derive(Debug, Deserialize)]
pub struct SpeakTextResponse {
    pub audio_url: String,
}

impl From<SpeakTextResponse> for RemoteResult {
    fn from(resp: SpeakTextResponse) -> Self {
        Self {
            audio_reference: Some(resp.audio_url),
            ..Self::default()
        }
    }
}

/// Response of `GET /` — the service's health probe.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServiceStatus {
    pub status: String,
    #[serde(default)]
    pub offline_mode: bool,
}

/// Error body the service attaches to non-success responses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
