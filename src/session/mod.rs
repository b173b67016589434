//! Session state and the controller that owns it.

pub mod controller;

/// Recording lifecycle of a session.
///
/// `Processing` doubles as the exclusivity lock for the two primary flows
/// (audio-translate and text-translate): only one submission is ever in
/// flight per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    /// No capture open, no submission in flight.
    Idle,
    /// A capture session is open and buffering.
    Recording,
    /// Exactly one submission is in flight.
    Processing,
}

/// Read-only view of the session for the presentation layer.
///
/// Writes go exclusively through the controller's named operations.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub source_language: String,
    pub target_language: String,
    pub transcript: String,
    pub translation: String,
    pub recording_state: RecordingState,
}
