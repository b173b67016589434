use crate::audio::take::{AudioTake, TakeBuffer, TakeFormat};
use crate::error::{Result, VoxlateError};

/// Trait for microphone capture devices.
///
/// This trait allows swapping implementations (real audio device vs mock).
/// Lifecycle: `open()` acquires the input device, `start()` begins
/// buffering chunks into a fresh take, `stop()` seals and returns it.
pub trait CaptureDevice: Send {
    /// Acquire the audio input device.
    ///
    /// # Errors
    /// `DeviceUnavailable` if permission is denied or no device exists.
    fn open(&mut self) -> Result<()>;

    /// Begin buffering a new take. No-op if already started.
    ///
    /// Negotiates the capture format once from the device's supported
    /// formats (see [`TakeFormat::negotiate`]).
    fn start(&mut self) -> Result<()>;

    /// Seal the current take and return it, releasing the input stream.
    ///
    /// # Errors
    /// `EmptyCapture` if zero bytes were buffered.
    fn stop(&mut self) -> Result<AudioTake>;
}

/// Mock capture device for testing
#[derive(Debug, Clone)]
pub struct MockCaptureDevice {
    is_open: bool,
    is_started: bool,
    chunks: Vec<Vec<u8>>,
    supported_formats: Vec<TakeFormat>,
    negotiated: Option<TakeFormat>,
    should_fail_open: bool,
    error_message: String,
}

impl MockCaptureDevice {
    /// Create a new mock that captures a single non-empty chunk.
    pub fn new() -> Self {
        Self {
            is_open: false,
            is_started: false,
            chunks: vec![vec![0u8; 160]],
            supported_formats: vec![TakeFormat::Wav],
            negotiated: None,
            should_fail_open: false,
            error_message: "mock capture error".to_string(),
        }
    }

    /// Configure the chunks delivered during the next take.
    pub fn with_chunks(mut self, chunks: Vec<Vec<u8>>) -> Self {
        self.chunks = chunks;
        self
    }

    /// Configure the formats the mock device advertises.
    pub fn with_supported_formats(mut self, formats: Vec<TakeFormat>) -> Self {
        self.supported_formats = formats;
        self
    }

    /// Configure the mock to fail on open
    pub fn with_open_failure(mut self) -> Self {
        self.should_fail_open = true;
        self
    }

    /// Configure the error message for failures
    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    /// Check if the device has been opened
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Check if a take is in progress
    pub fn is_started(&self) -> bool {
        self.is_started
    }

    /// The format picked by the last negotiation, if any.
    pub fn negotiated_format(&self) -> Option<TakeFormat> {
        self.negotiated
    }
}

impl Default for MockCaptureDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureDevice for MockCaptureDevice {
    fn open(&mut self) -> Result<()> {
        if self.should_fail_open {
            return Err(VoxlateError::DeviceUnavailable {
                message: self.error_message.clone(),
            });
        }
        self.is_open = true;
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        if !self.is_open {
            return Err(VoxlateError::AudioCapture {
                message: "start called before open".to_string(),
            });
        }
        if self.is_started {
            return Ok(());
        }
        let format = TakeFormat::negotiate(&self.supported_formats).ok_or_else(|| {
            VoxlateError::AudioCapture {
                message: "no supported capture format".to_string(),
            }
        })?;
        self.negotiated = Some(format);
        self.is_started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<AudioTake> {
        if !self.is_started {
            return Err(VoxlateError::AudioCapture {
                message: "stop called before start".to_string(),
            });
        }
        self.is_started = false;
        self.is_open = false;

        let format = self.negotiated.unwrap_or(TakeFormat::Wav);
        let mut buffer = TakeBuffer::new(format);
        for chunk in self.chunks.clone() {
            buffer.push_chunk(chunk);
        }
        buffer.seal()
    }
}
