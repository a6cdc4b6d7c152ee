//! Capture engine: transport → container writer for a fixed wall-clock span.
//!
//! Deadline loop. Each pass issues one bounded read; data goes straight to
//! the writer, while a timeout, an empty read or a read error costs a short
//! yield and another try. The loop never outlives the deadline by more than
//! one read timeout. A failed file write ends the loop early; the caller
//! still finalizes the header over what was written.

use embassy_time::{with_timeout, Duration, Instant, Timer};
use platform::{AudioTransport, File};

use crate::cursor::StreamCursor;
use crate::error::StreamError;
use crate::playback::alloc_zeroed;
use crate::writer::WavWriter;

/// Capture tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Total capture span.
    pub duration: Duration,
    /// Bytes per transport read.
    pub chunk_bytes: usize,
    /// Upper bound on a single transport read.
    pub read_timeout: Duration,
    /// Pause after a read that produced nothing.
    pub retry_delay: Duration,
}

impl CaptureOptions {
    /// Defaults for a capture of `duration_ms`.
    pub fn for_millis(duration_ms: u32) -> Self {
        Self {
            duration: Duration::from_millis(u64::from(duration_ms)),
            chunk_bytes: 1024,
            read_timeout: Duration::from_millis(100),
            retry_delay: Duration::from_millis(1),
        }
    }
}

/// Why the capture loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptureStop {
    /// The deadline elapsed.
    Deadline,
    /// Appending to the file failed.
    WriteFailed,
}

/// Outcome of [`capture_into`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureReport {
    /// Payload bytes appended to the file.
    pub bytes_captured: u64,
    /// Reads that returned data.
    pub reads: u32,
    /// Reads that timed out, failed or returned nothing.
    pub misses: u32,
    /// Reason the loop ended.
    pub stop: CaptureStop,
}

/// Record from `transport` into `writer` until `options.duration` elapses.
///
/// `expected_bytes` is the nominal payload length for the span and is
/// used for logging only.
///
/// # Errors
///
/// Returns [`StreamError::ResourceExhaustion`] if the read buffer cannot be
/// allocated. A write failure ends the loop and is reported in
/// [`CaptureReport::stop`].
pub async fn capture_into<F, T>(
    transport: &mut T,
    writer: &mut WavWriter<F>,
    options: CaptureOptions,
    expected_bytes: u64,
) -> Result<CaptureReport, StreamError<F::Error>>
where
    F: File,
    T: AudioTransport,
{
    let mut buf = alloc_zeroed(options.chunk_bytes)?;
    let mut cursor = StreamCursor::new(expected_bytes);
    let mut report = CaptureReport {
        bytes_captured: 0,
        reads: 0,
        misses: 0,
        stop: CaptureStop::Deadline,
    };
    let deadline = Instant::now().checked_add(options.duration).unwrap_or(Instant::MAX);

    loop {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        let budget = options.read_timeout.min(deadline.saturating_duration_since(now));
        let n = match with_timeout(budget, transport.read(&mut buf)).await {
            Ok(Ok(n)) => n,
            Ok(Err(_)) | Err(_) => 0,
        };
        let chunk = buf.get(..n).unwrap_or(&[]);
        if chunk.is_empty() {
            report.misses = report.misses.saturating_add(1);
            Timer::after(options.retry_delay).await;
            continue;
        }
        if writer.append(chunk).await.is_err() {
            warn!("capture: file write failed after {} bytes", cursor.done());
            report.stop = CaptureStop::WriteFailed;
            break;
        }
        cursor.advance(chunk.len());
        report.reads = report.reads.saturating_add(1);
    }

    report.bytes_captured = cursor.done();
    debug!(
        "capture: {} of ~{} bytes, {} reads, {} misses",
        cursor.done(),
        cursor.target(),
        report.reads,
        report.misses
    );
    Ok(report)
}
