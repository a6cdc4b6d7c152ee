//! Container writer: placeholder header, streamed payload, header backfill.

use platform::File;

use crate::error::StreamError;
use crate::io::write_all;
use crate::wav::{FormatError, WavHeader};

/// Largest payload whose container size (`36 + len`) still fits in `u32`.
const MAX_PAYLOAD: u32 = u32::MAX - 36;

/// A WAV file being recorded.
///
/// The file starts with 44 zero bytes; [`finalize`](Self::finalize)
/// overwrites them once the payload length is known.
pub struct WavWriter<F: File> {
    file: F,
    payload_len: u32,
}

impl<F: File> WavWriter<F> {
    /// Reserve the header by writing a zero-filled placeholder.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Io`] / [`StreamError::WriteZero`] if the
    /// placeholder cannot be written.
    pub async fn create(mut file: F) -> Result<Self, StreamError<F::Error>> {
        write_all(&mut file, &[0u8; WavHeader::SIZE]).await?;
        Ok(Self {
            file,
            payload_len: 0,
        })
    }

    /// Append PCM bytes to the payload.
    ///
    /// # Errors
    ///
    /// - [`FormatError::PayloadTooLarge`] if the payload would exceed the
    ///   32-bit size fields. Nothing is written in that case.
    /// - [`StreamError::Io`] / [`StreamError::WriteZero`] on write failure.
    ///   The payload length then counts only the bytes before this call.
    pub async fn append(&mut self, bytes: &[u8]) -> Result<(), StreamError<F::Error>> {
        let len = u32::try_from(bytes.len()).map_err(|_| FormatError::PayloadTooLarge)?;
        let total = self
            .payload_len
            .checked_add(len)
            .filter(|t| *t <= MAX_PAYLOAD)
            .ok_or(FormatError::PayloadTooLarge)?;
        write_all(&mut self.file, bytes).await?;
        self.payload_len = total;
        Ok(())
    }

    /// Payload bytes appended so far.
    pub fn payload_len(&self) -> u32 {
        self.payload_len
    }

    /// Seek to the start and write the real header.
    ///
    /// `sample_rate` is the rate active at finalization. The file is closed
    /// when this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Io`] on seek or write failure.
    pub async fn finalize(mut self, sample_rate: u32) -> Result<WavHeader, StreamError<F::Error>> {
        let header = WavHeader::pcm16_stereo(sample_rate, self.payload_len)
            .ok_or(FormatError::PayloadTooLarge)?;
        self.file.seek(0).await.map_err(StreamError::Io)?;
        write_all(&mut self.file, &header.encode()).await?;
        debug!(
            "wav: finalized {} payload bytes at {} Hz",
            self.payload_len,
            sample_rate
        );
        Ok(header)
    }
}
