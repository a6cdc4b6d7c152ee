//! Runtime tunables for [`crate::AudioSubsystem`].

use embassy_time::Duration;
use pcm_stream::{CaptureOptions, PlaybackOptions, ToneSpec, TONE_AMPLITUDE, TONE_SAMPLE_RATE_HZ};
use platform::{MicGain, MicInput, SampleRateHz, VolumePercent};

/// Subsystem configuration. [`Default`] matches the dev-kit firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubsystemConfig {
    /// Rate the transport comes up at.
    pub default_rate: SampleRateHz,
    /// Volume applied during initialization.
    pub initial_volume: VolumePercent,
    /// Microphone path selected during initialization.
    pub mic_input: MicInput,
    /// PGA gain applied at the start of every recording.
    pub mic_gain: MicGain,
    /// Clock/power settle interval after transport bring-up and after unmute.
    pub settle: Duration,
    /// Bound on each transport write.
    pub write_timeout: Duration,
    /// Bound on each transport read.
    pub read_timeout: Duration,
    /// Capture back-off after a read that produced nothing.
    pub retry_delay: Duration,
    /// Bytes per transport write/read while streaming.
    pub chunk_bytes: usize,
    /// Highest declared file rate `play_file` will switch to.
    pub max_playback_rate_hz: u32,
    /// Tone synthesis rate.
    pub tone_sample_rate: u32,
    /// Tone peak magnitude.
    pub tone_amplitude: i16,
}

impl Default for SubsystemConfig {
    fn default() -> Self {
        Self {
            default_rate: SampleRateHz::KHZ_16,
            initial_volume: VolumePercent::new(65),
            mic_input: MicInput::Analog,
            mic_gain: MicGain::Db18,
            settle: Duration::from_millis(100),
            write_timeout: Duration::from_millis(1000),
            read_timeout: Duration::from_millis(100),
            retry_delay: Duration::from_millis(1),
            chunk_bytes: 1024,
            max_playback_rate_hz: 48_000,
            tone_sample_rate: TONE_SAMPLE_RATE_HZ,
            tone_amplitude: TONE_AMPLITUDE,
        }
    }
}

impl SubsystemConfig {
    pub(crate) fn playback_options(&self) -> PlaybackOptions {
        PlaybackOptions {
            chunk_bytes: self.chunk_bytes,
            write_timeout: self.write_timeout,
        }
    }

    pub(crate) fn capture_options(&self, duration_ms: u32) -> CaptureOptions {
        CaptureOptions {
            chunk_bytes: self.chunk_bytes,
            read_timeout: self.read_timeout,
            retry_delay: self.retry_delay,
            ..CaptureOptions::for_millis(duration_ms)
        }
    }

    pub(crate) fn tone(&self, freq_hz: u32, duration_ms: u32) -> ToneSpec {
        ToneSpec {
            sample_rate: self.tone_sample_rate,
            amplitude: self.tone_amplitude,
            ..ToneSpec::new(freq_hz, duration_ms)
        }
    }

    /// Rate `play_file` switches to for a file declaring `declared` Hz, or
    /// `None` if playback should stay at the active rate.
    ///
    /// Only rates the transport can run are switched to: 8 000 Hz up to
    /// `max_playback_rate_hz`. Declared rates of 1..8 000 Hz play at the
    /// active rate.
    pub fn playback_rate(&self, declared: u32) -> Option<SampleRateHz> {
        if declared == 0 || declared > self.max_playback_rate_hz {
            return None;
        }
        SampleRateHz::new(declared).ok()
    }
}
