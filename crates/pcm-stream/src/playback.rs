//! Playback engine: payload → transport in fixed-size chunks.
//!
//! Best effort. A read that fails or returns nothing, a write that fails,
//! and a write that exceeds its timeout all end the stream early without
//! an error; the [`PlaybackReport`] says how far it got and why it stopped.

use alloc::vec::Vec;

use embassy_time::{with_timeout, Duration};
use platform::{AudioTransport, File};

use crate::error::{ResourceExhausted, StreamError};
use crate::reader::WavPayload;

/// Playback tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackOptions {
    /// Bytes per transport write.
    pub chunk_bytes: usize,
    /// Upper bound on a single transport write.
    pub write_timeout: Duration,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            chunk_bytes: 1024,
            write_timeout: Duration::from_millis(1000),
        }
    }
}

/// Why the playback loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackStop {
    /// Every payload byte was written.
    Completed,
    /// The file ended before the payload length was reached.
    EndOfFile,
    /// A file read failed.
    ReadFailed,
    /// A transport write failed.
    WriteFailed,
    /// A transport write did not finish within the timeout.
    WriteTimedOut,
}

impl PlaybackStop {
    /// Short label for logging.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::EndOfFile => "end of file",
            Self::ReadFailed => "read failed",
            Self::WriteFailed => "write failed",
            Self::WriteTimedOut => "write timed out",
        }
    }
}

/// Outcome of [`stream_payload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaybackReport {
    /// Payload bytes accepted by the transport.
    pub bytes_written: u64,
    /// Transport writes issued.
    pub writes: u32,
    /// Reason the loop ended.
    pub stop: PlaybackStop,
}

/// Stream the remaining payload to `transport`.
///
/// The chunk buffer is heap-allocated and released on return.
///
/// # Errors
///
/// Returns [`StreamError::ResourceExhaustion`] if the chunk buffer cannot be
/// allocated. Stream interruptions are reported in [`PlaybackReport::stop`].
pub async fn stream_payload<F, T>(
    payload: &mut WavPayload<F>,
    transport: &mut T,
    options: PlaybackOptions,
) -> Result<PlaybackReport, StreamError<F::Error>>
where
    F: File,
    T: AudioTransport,
{
    let mut buf = alloc_zeroed(options.chunk_bytes)?;
    let mut report = PlaybackReport {
        bytes_written: 0,
        writes: 0,
        stop: PlaybackStop::Completed,
    };

    while payload.remaining() > 0 {
        let n = match payload.read_chunk(&mut buf).await {
            Ok(0) => {
                report.stop = PlaybackStop::EndOfFile;
                break;
            }
            Ok(n) => n,
            Err(_) => {
                report.stop = PlaybackStop::ReadFailed;
                break;
            }
        };
        let Some(chunk) = buf.get(..n) else {
            report.stop = PlaybackStop::ReadFailed;
            break;
        };
        match with_timeout(options.write_timeout, transport.write(chunk)).await {
            Ok(Ok(written)) => {
                report.bytes_written = report.bytes_written.saturating_add(written as u64);
                report.writes = report.writes.saturating_add(1);
            }
            Ok(Err(_)) => {
                report.stop = PlaybackStop::WriteFailed;
                break;
            }
            Err(_) => {
                report.stop = PlaybackStop::WriteTimedOut;
                break;
            }
        }
    }

    if report.stop == PlaybackStop::Completed {
        debug!("playback: {} bytes in {} writes", report.bytes_written, report.writes);
    } else {
        warn!(
            "playback: stopped early ({}) after {} of {} bytes",
            report.stop.as_str(),
            report.bytes_written,
            payload.len()
        );
    }
    Ok(report)
}

/// Allocate a zeroed buffer, reporting allocation failure instead of aborting.
pub(crate) fn alloc_zeroed(len: usize) -> Result<Vec<u8>, ResourceExhausted> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len).map_err(|_| ResourceExhausted)?;
    buf.resize(len, 0);
    Ok(buf)
}
