//! Sine tone synthesis for self-test and audible feedback.
//!
//! Output is interleaved 16-bit LE stereo with identical channels. The
//! tone is always synthesized at its own nominal rate, independent of the
//! transport's current clock.

use alloc::vec::Vec;

use crate::error::ResourceExhausted;

/// Nominal synthesis rate.
pub const TONE_SAMPLE_RATE_HZ: u32 = 16_000;

/// Peak sample magnitude.
pub const TONE_AMPLITUDE: i16 = 15_000;

/// Bytes per stereo 16-bit frame.
const FRAME_BYTES: u64 = 4;

/// Tone parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneSpec {
    /// Sine frequency
    pub freq_hz: u32,
    /// Length of the tone
    pub duration_ms: u32,
    /// Synthesis rate
    pub sample_rate: u32,
    /// Peak magnitude
    pub amplitude: i16,
}

impl ToneSpec {
    /// A tone at the nominal rate and amplitude.
    pub fn new(freq_hz: u32, duration_ms: u32) -> Self {
        Self {
            freq_hz,
            duration_ms,
            sample_rate: TONE_SAMPLE_RATE_HZ,
            amplitude: TONE_AMPLITUDE,
        }
    }

    /// Frames in the tone: `sample_rate * duration_ms / 1000`.
    pub fn frame_count(&self) -> u64 {
        // u32 * u32 always fits in u64.
        u64::from(self.sample_rate).saturating_mul(u64::from(self.duration_ms)) / 1000
    }
}

/// Synthesize `spec` into a newly allocated byte buffer.
///
/// Frame `i` holds `sin(2π·f·i/rate) · amplitude`, truncated toward zero,
/// on both channels.
///
/// # Errors
///
/// Returns [`ResourceExhausted`] if the buffer size overflows `usize` or
/// the allocation fails.
pub fn synthesize(spec: &ToneSpec) -> Result<Vec<u8>, ResourceExhausted> {
    let frames = spec.frame_count();
    let len = frames
        .checked_mul(FRAME_BYTES)
        .and_then(|n| usize::try_from(n).ok())
        .ok_or(ResourceExhausted)?;

    let mut out = Vec::new();
    out.try_reserve_exact(len).map_err(|_| ResourceExhausted)?;

    let step =
        2.0 * core::f64::consts::PI * f64::from(spec.freq_hz) / f64::from(spec.sample_rate.max(1));
    let amplitude = f64::from(spec.amplitude);
    for i in 0..frames {
        #[allow(clippy::cast_precision_loss)]
        let phase = step * i as f64;
        #[allow(clippy::cast_possible_truncation)]
        let sample = (libm::sin(phase) * amplitude) as i16;
        let bytes = sample.to_le_bytes();
        out.extend_from_slice(&bytes);
        out.extend_from_slice(&bytes);
    }
    Ok(out)
}
