//! Audio peripheral configuration for the ES8311 board.
//!
//! Defines the I²S standard-mode configuration, the pin map of the
//! ESP32-P4 module dev kit, and the I²C address of the codec.
//!
//! # Clock Chain
//!
//! The ES8311 takes MCLK on its MCLK pin and divides it internally:
//!
//! ```text
//! I²S controller (master)
//!   → MCLK (GPIO13) = 256 × fs
//!   → BCLK (GPIO12) = 16 bit × 2 ch × fs = MCLK / 8
//!   → WS   (GPIO10) = fs
//! ```
//!
//! For 16 kHz: MCLK = 256 × 16 000 = 4.096 MHz
//! For 48 kHz: MCLK = 256 × 48 000 = 12.288 MHz
//!
//! # I2C Bus Assignments
//!
//! | Bus  | Peripheral    | Address | Pins (SDA/SCL) |
//! |------|---------------|---------|----------------|
//! | I2C0 | ES8311 codec  | 0x18    | GPIO7 / GPIO8  |

use crate::audio_types::{CodecBus, I2cAddr, SampleRateHz};
use crate::transport::TransportClock;

/// I²S clock and format configuration for the duplex codec link.
///
/// Fixed at 16-bit, 2 channels (stereo), MCLK = 256 × fs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2sAudioConfig {
    /// Frame rate
    pub sample_rate: SampleRateHz,
    /// Bit depth per sample
    pub bit_depth: u8,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u8,
    /// MCLK multiplier: MCLK = `mclk_multiple` × fs
    pub mclk_multiple: u16,
    /// Pin map
    pub pins: I2sPins,
}

impl I2sAudioConfig {
    /// Standard-mode 16-bit stereo at `sample_rate` on the dev-kit pins.
    pub fn es8311(sample_rate: SampleRateHz) -> Self {
        Self {
            sample_rate,
            bit_depth: 16,
            channels: 2,
            mclk_multiple: 256,
            pins: I2sPins::ESP32_P4_DEVKIT,
        }
    }

    /// Transport clock matching this configuration.
    pub fn clock(&self) -> TransportClock {
        TransportClock {
            sample_rate: self.sample_rate,
            mclk_multiple: self.mclk_multiple,
        }
    }

    /// Bytes per interleaved frame (`channels * bit_depth / 8`).
    pub fn frame_bytes(&self) -> u16 {
        u16::from(self.channels).saturating_mul(u16::from(self.bit_depth) / 8)
    }

    /// Calculate the master clock (MCLK) frequency in Hz.
    pub fn mclk_hz(&self) -> u32 {
        self.sample_rate
            .get()
            .saturating_mul(u32::from(self.mclk_multiple))
    }

    /// Calculate the bit clock (BCLK) frequency in Hz.
    ///
    /// BCLK = `bit_depth` × `channels` × fs.
    pub fn bclk_hz(&self) -> u32 {
        u32::from(self.bit_depth)
            .saturating_mul(u32::from(self.channels))
            .saturating_mul(self.sample_rate.get())
    }
}

/// I²S GPIO assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2sPins {
    /// Master clock out
    pub mclk: u8,
    /// Bit clock
    pub bclk: u8,
    /// Word select (LRCK)
    pub ws: u8,
    /// Serial data out (to codec DSDIN)
    pub dout: u8,
    /// Serial data in (from codec ASDOUT)
    pub din: u8,
}

impl I2sPins {
    /// ESP32-P4 Function EV board wiring.
    pub const ESP32_P4_DEVKIT: Self = Self {
        mclk: 13,
        bclk: 12,
        ws: 10,
        dout: 9,
        din: 11,
    };
}

/// Control-bus and amplifier GPIO assignment.
pub struct BoardPins;

impl BoardPins {
    /// I2C0 SDA
    pub const I2C_SDA: u8 = 7;
    /// I2C0 SCL
    pub const I2C_SCL: u8 = 8;
    /// Speaker power-amplifier enable
    pub const PA_ENABLE: u8 = 53;
}

/// I2C addresses of the audio peripherals.
///
/// All addresses are 7-bit (the embedded-hal standard convention).
pub struct I2cAddresses;

impl I2cAddresses {
    /// ES8311 codec address with CE/AD0 tied low.
    ///
    /// Wire address: 0x30 (write) / 0x31 (read).
    pub const ES8311_CODEC: I2cAddr<CodecBus> = I2cAddr::new(0x18);

    /// I2C bus clock for codec control.
    pub const CODEC_BUS_HZ: u32 = 100_000;
}
