//! Audio takes: the sealed output of one start/stop recording cycle.
//!
//! A recording buffers byte chunks into a [`TakeBuffer`]; stopping seals it
//! into an immutable [`AudioTake`] that is consumed exactly once by the
//! service client. The two-type split keeps a sealed take from ever being
//! appended to again.

use crate::error::{Result, VoxlateError};

/// Container formats a capture device can seal a take as, in preference
/// order: an opus-coded container first, plain WAV as the generic fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakeFormat {
    /// OGG container with opus codec
    OggOpus,
    /// WAV (uncompressed PCM)
    Wav,
}

/// Preference order used during capture-format negotiation.
const PREFERRED_FORMATS: &[TakeFormat] = &[TakeFormat::OggOpus, TakeFormat::Wav];

impl TakeFormat {
    /// MIME type sent with the multipart upload.
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::OggOpus => "audio/ogg; codecs=opus",
            Self::Wav => "audio/wav",
        }
    }

    /// File extension used for the upload part name.
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::OggOpus => "ogg",
            Self::Wav => "wav",
        }
    }

    /// Pick the best format from what a device supports.
    ///
    /// Evaluated once when capture starts; this is capability negotiation,
    /// not a retry loop. Returns `None` if the device supports nothing from
    /// the preference list.
    pub fn negotiate(supported: &[TakeFormat]) -> Option<TakeFormat> {
        PREFERRED_FORMATS
            .iter()
            .copied()
            .find(|f| supported.contains(f))
    }
}

/// Accumulates byte chunks during one recording interval.
#[derive(Debug)]
pub struct TakeBuffer {
    format: TakeFormat,
    chunks: Vec<Vec<u8>>,
}

impl TakeBuffer {
    /// Start a new buffer for the negotiated format.
    pub fn new(format: TakeFormat) -> Self {
        Self {
            format,
            chunks: Vec::new(),
        }
    }

    /// Append a data chunk. Empty chunks are dropped — some backends fire
    /// data callbacks before any samples arrive.
    pub fn push_chunk(&mut self, chunk: Vec<u8>) {
        if !chunk.is_empty() {
            self.chunks.push(chunk);
        }
    }

    /// Total bytes buffered so far.
    pub fn size_bytes(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// Seal the buffer into an immutable take.
    ///
    /// # Errors
    /// Returns `EmptyCapture` if no bytes were buffered (stop fired before
    /// the first data callback). Callers treat this as a silent no-op.
    pub fn seal(self) -> Result<AudioTake> {
        if self.chunks.is_empty() {
            return Err(VoxlateError::EmptyCapture);
        }
        Ok(AudioTake {
            format: self.format,
            chunks: self.chunks,
        })
    }
}

/// One sealed, finite audio recording.
///
/// Immutable after sealing; ownership moves into the service client on
/// upload and the capture unit keeps no reference.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioTake {
    format: TakeFormat,
    chunks: Vec<Vec<u8>>,
}

impl AudioTake {
    /// The container format negotiated at capture start.
    pub const fn format(&self) -> TakeFormat {
        self.format
    }

    /// Number of chunks captured.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total payload size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    /// Upload filename with the format's extension.
    pub fn file_name(&self) -> String {
        format!("recording.{}", self.format.extension())
    }

    /// Consume the take, concatenating its chunks in capture order.
    pub fn into_bytes(self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.size_bytes());
        for chunk in self.chunks {
            bytes.extend_from_slice(&chunk);
        }
        bytes
    }
}
