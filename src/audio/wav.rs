//! WAV byte encoding for sealed takes.

use crate::error::{Result, VoxlateError};
use std::io::Cursor;

/// Encode 16-bit mono PCM samples as WAV file bytes.
///
/// The capture unit buffers raw PCM and seals each chunk through this
/// before upload, so the service receives a self-describing container.
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| VoxlateError::AudioCapture {
                message: format!("Failed to create WAV writer: {}", e),
            })?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| VoxlateError::AudioCapture {
                    message: format!("Failed to write WAV sample: {}", e),
                })?;
        }
        writer.finalize().map_err(|e| VoxlateError::AudioCapture {
            message: format!("Failed to finalize WAV data: {}", e),
        })?;
    }

    Ok(cursor.into_inner())
}
