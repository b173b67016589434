//! voxlate - Speech translation client
//!
//! Record a take from the microphone, get it transcribed and translated by
//! a remote speech service, edit and re-translate, swap languages, and
//! speak results aloud.

// Enforce error handling discipline
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(all(feature = "cpal-audio", feature = "playback", feature = "cli"))]
pub mod app;
pub mod audio;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod languages;
pub mod playback;
pub mod service;
pub mod session;

// Core traits (capture → translate → play)
pub use audio::device::CaptureDevice;
pub use playback::AudioOutput;
pub use service::client::SpeechService;

// Session state machine
pub use session::controller::SessionController;
pub use session::{RecordingState, SessionSnapshot};

// Data types
pub use audio::take::{AudioTake, TakeFormat};
pub use service::types::{RemoteResult, ServiceStatus};

// Error handling
pub use error::{Result, VoxlateError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.3.1+abc1234"` when git hash is available, `"0.3.1"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }

    #[test]
    fn version_string_contains_plus_when_git_hash_present() {
        let ver = version_string();
        if option_env!("GIT_HASH").is_some_and(|h| !h.is_empty()) {
            assert!(
                ver.contains('+'),
                "With GIT_HASH set, version should contain '+', got: {}",
                ver
            );
        } else {
            assert_eq!(ver, env!("CARGO_PKG_VERSION"));
        }
    }
}
