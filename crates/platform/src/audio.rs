//! Audio codec abstraction
//!
//! The codec is the analog front end sitting behind the I²S transport. It
//! derives its internal clocks from MCLK, so any change of sample rate must
//! be followed by a full [`AudioCodec::init`] with the new clock config.

use crate::audio_types::{MicGain, MicInput, SampleRateHz, VolumePercent};

/// Audio codec trait
pub trait AudioCodec {
    /// Error type
    type Error: core::fmt::Debug;

    /// Initialize (or fully re-initialize) the codec clock tree and serial port.
    ///
    /// A re-init resets volume and mute to the chip defaults; callers that
    /// track codec state must re-apply it afterwards.
    fn init(
        &mut self,
        config: CodecClockConfig,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Set DAC output volume
    fn set_volume(
        &mut self,
        volume: VolumePercent,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Mute or unmute the DAC output
    fn set_mute(&mut self, muted: bool)
        -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Select the microphone input path and power up the ADC
    fn configure_microphone(
        &mut self,
        input: MicInput,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Set the microphone PGA gain
    fn set_mic_gain(
        &mut self,
        gain: MicGain,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;
}

/// Serial port word length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resolution {
    /// 16-bit samples
    Bits16,
    /// 24-bit samples
    Bits24,
    /// 32-bit samples
    Bits32,
}

impl Resolution {
    /// Word length in bits.
    pub fn bits(self) -> u8 {
        match self {
            Self::Bits16 => 16,
            Self::Bits24 => 24,
            Self::Bits32 => 32,
        }
    }
}

/// Codec clock configuration, derived from the active sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CodecClockConfig {
    /// Sample rate (LRCK)
    pub sample_rate: SampleRateHz,
    /// MCLK / fs ratio
    pub mclk_multiple: u16,
    /// Take MCLK from the MCLK pin rather than deriving it from SCLK
    pub mclk_from_pin: bool,
    /// DAC (playback) serial port resolution
    pub dac_resolution: Resolution,
    /// ADC (record) serial port resolution
    pub adc_resolution: Resolution,
}

impl CodecClockConfig {
    /// Fixed oversampling multiple: MCLK = 256 × fs.
    pub const MCLK_MULTIPLE: u16 = 256;

    /// Clock config for `sample_rate`: MCLK pin at 256 × fs, 16-bit both ways.
    pub fn for_rate(sample_rate: SampleRateHz) -> Self {
        Self {
            sample_rate,
            mclk_multiple: Self::MCLK_MULTIPLE,
            mclk_from_pin: true,
            dac_resolution: Resolution::Bits16,
            adc_resolution: Resolution::Bits16,
        }
    }

    /// MCLK frequency in Hz, or `None` on overflow.
    pub fn mclk_hz(&self) -> Option<u32> {
        self.sample_rate
            .get()
            .checked_mul(u32::from(self.mclk_multiple))
    }
}
