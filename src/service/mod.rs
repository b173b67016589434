//! Remote speech service client: transcribe+translate, translate, speak.

pub mod client;
pub mod types;
