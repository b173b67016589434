//! Microphone capture and take management.

#[cfg(feature = "cpal-audio")]
pub mod capture;
pub mod device;
pub mod take;
pub mod wav;
