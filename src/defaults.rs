//! Default configuration constants for voxlate.
//!
//! Shared constants used across configuration types to keep the capture,
//! service, and session layers in agreement.

use std::time::Duration;

/// Default audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition and keeps uploads small
/// without hurting transcription quality.
pub const SAMPLE_RATE: u32 = 16000;

/// Default base URL of the remote speech service.
pub const SERVICE_URL: &str = "http://localhost:8000";

/// Path of the audio-translate endpoint (multipart upload).
pub const TRANSLATE_AUDIO_PATH: &str = "/translate";

/// Path of the text-translate endpoint (JSON body).
pub const TRANSLATE_TEXT_PATH: &str = "/translate-text";

/// Path of the speech-synthesis endpoint (form body).
pub const SPEAK_TEXT_PATH: &str = "/speak-text";

/// Request timeout applied to every remote call.
///
/// Bounds how long a session can sit in the processing state: a hung
/// service call times out, surfaces as unreachable, and the session
/// returns to idle instead of hanging forever.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default source language code.
pub const SOURCE_LANGUAGE: &str = "en";

/// Default target language code.
pub const TARGET_LANGUAGE: &str = "fr";
