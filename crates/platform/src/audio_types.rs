//! Audio domain newtypes for compile-time safety.
//!
//! These zero-cost abstractions prevent common errors:
//! - `VolumePercent`: clamps 0–100, prevents register overflow
//! - `DacVolumeRegister`: ES8311-specific, derived from VolumePercent only
//! - `SampleRateHz`: validates 8000–96000 Hz range
//! - `MicGain`: only the eight PGA steps the ES8311 supports
//! - `I2cAddr<Bus>`: phantom type binds address to correct bus

use core::marker::PhantomData;

// ── Error type ───────────────────────────────────────────────────────────────

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The value that was out of range.
    pub value: u32,
    /// The inclusive minimum allowed value.
    pub min: u32,
    /// The inclusive maximum allowed value.
    pub max: u32,
}

impl core::fmt::Display for OutOfRangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} is outside {}..={}", self.value, self.min, self.max)
    }
}

// ── VolumePercent ────────────────────────────────────────────────────────────

/// Volume as a percentage, clamped to 0–100.
///
/// Wraps a `u8` with the invariant `0 <= value <= 100`.
/// Construct with [`VolumePercent::new`] (clamping) or
/// [`VolumePercent::try_new`] (fallible, strict).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct VolumePercent(u8);

impl VolumePercent {
    /// Create a `VolumePercent`, clamping values above 100 to 100.
    #[must_use]
    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    /// Create a `VolumePercent`, returning an error if `value > 100`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `value > 100`.
    pub fn try_new(value: u8) -> Result<Self, OutOfRangeError> {
        if value > 100 {
            Err(OutOfRangeError {
                value: u32::from(value),
                min: 0,
                max: 100,
            })
        } else {
            Ok(Self(value))
        }
    }

    /// Return the inner volume value (0–100).
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

// ── DacVolumeRegister ────────────────────────────────────────────────────────

/// ES8311 DAC volume register (0x32) value.
///
/// The ES8311 scale is 0.5 dB per step:
/// - Register 0x00 → −95.5 dB (silence)
/// - Register 0xBF → 0 dB
/// - Register 0xFF → +32 dB
///
/// This type can only be constructed from a [`VolumePercent`], ensuring
/// the conversion formula is applied consistently.
///
/// Formula: `0` for 0 %, otherwise `volume * 256 / 100 - 1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct DacVolumeRegister(u8);

impl DacVolumeRegister {
    /// Convert a `VolumePercent` to an ES8311 DAC volume register value.
    ///
    /// - 0%   → register 0x00
    /// - 100% → register 0xFF
    #[must_use]
    pub fn from_volume(vol: VolumePercent) -> Self {
        if vol.get() == 0 {
            return Self(0);
        }
        // Max 100 * 256 / 100 - 1 = 255, fits in u8.
        let reg = (u16::from(vol.get()).saturating_mul(256) / 100).saturating_sub(1);
        Self(u8::try_from(reg).unwrap_or(u8::MAX))
    }

    /// Return the raw register value.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

// ── SampleRateHz ─────────────────────────────────────────────────────────────

/// Sample rate in Hz, validated to the range supported by the ES8311.
///
/// Valid range: 8000–96000 Hz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct SampleRateHz(u32);

impl SampleRateHz {
    /// Minimum supported sample rate: 8000 Hz (telephony).
    pub const MIN_HZ: u32 = 8_000;

    /// Maximum supported sample rate: 96000 Hz (ES8311 max).
    pub const MAX_HZ: u32 = 96_000;

    /// 8 kHz
    pub const KHZ_8: Self = Self(8_000);
    /// 16 kHz, the board default
    pub const KHZ_16: Self = Self(16_000);
    /// 22.05 kHz
    pub const KHZ_22_05: Self = Self(22_050);
    /// 44.1 kHz
    pub const KHZ_44_1: Self = Self(44_100);
    /// 48 kHz
    pub const KHZ_48: Self = Self(48_000);

    /// Create a `SampleRateHz`, returning an error if out of 8000–96000 Hz.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `hz < 8000` or `hz > 96000`.
    pub fn new(hz: u32) -> Result<Self, OutOfRangeError> {
        if !(Self::MIN_HZ..=Self::MAX_HZ).contains(&hz) {
            Err(OutOfRangeError {
                value: hz,
                min: Self::MIN_HZ,
                max: Self::MAX_HZ,
            })
        } else {
            Ok(Self(hz))
        }
    }

    /// Return the sample rate in Hz.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Bytes per second for 16-bit stereo at this rate (`rate * 4`).
    #[must_use]
    pub fn stereo16_byte_rate(self) -> u32 {
        // Max 96_000 * 4, no overflow.
        self.0.saturating_mul(4)
    }
}

// ── Microphone ───────────────────────────────────────────────────────────────

/// Microphone input path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MicInput {
    /// Analog microphone on MIC1P/MIC1N through the PGA
    Analog,
    /// PDM digital microphone
    Digital,
}

/// Microphone PGA gain, 0–42 dB in 6 dB steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MicGain {
    /// 0 dB
    Db0,
    /// 6 dB
    Db6,
    /// 12 dB
    Db12,
    /// 18 dB
    Db18,
    /// 24 dB
    Db24,
    /// 30 dB
    Db30,
    /// 36 dB
    Db36,
    /// 42 dB
    Db42,
}

impl MicGain {
    /// Map a gain in dB to a PGA step. Only exact 6 dB multiples are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `db` is not one of 0, 6, … 42.
    pub fn from_db(db: u8) -> Result<Self, OutOfRangeError> {
        Ok(match db {
            0 => Self::Db0,
            6 => Self::Db6,
            12 => Self::Db12,
            18 => Self::Db18,
            24 => Self::Db24,
            30 => Self::Db30,
            36 => Self::Db36,
            42 => Self::Db42,
            _ => {
                return Err(OutOfRangeError {
                    value: u32::from(db),
                    min: 0,
                    max: 42,
                })
            }
        })
    }

    /// Gain in dB.
    pub fn db(self) -> u8 {
        match self {
            Self::Db0 => 0,
            Self::Db6 => 6,
            Self::Db12 => 12,
            Self::Db18 => 18,
            Self::Db24 => 24,
            Self::Db30 => 30,
            Self::Db36 => 36,
            Self::Db42 => 42,
        }
    }

    /// ES8311 register 0x16 code (0–7).
    pub fn register_code(self) -> u8 {
        self.db() / 6
    }
}

// ── I2C bus phantom types ────────────────────────────────────────────────────

/// Phantom type for the codec control bus (I2C0: ES8311 at 0x18).
#[derive(Debug, Clone, Copy)]
pub struct CodecBus;

// ── I2cAddr ──────────────────────────────────────────────────────────────────

/// I2C 7-bit address bound to a specific bus via phantom type.
///
/// ## Reserved I2C addresses (I2C specification):
/// - 0x00–0x07: reserved (general call, CBUS, etc.)
/// - 0x78–0x7F: reserved (10-bit address prefix, device ID, etc.)
///
/// ## Usage:
/// ```rust
/// use platform::audio_types::{CodecBus, I2cAddr};
///
/// let codec_addr: I2cAddr<CodecBus> = I2cAddr::new(0x18);
/// assert_eq!(codec_addr.get(), 0x18);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I2cAddr<Bus> {
    addr: u8,
    _bus: PhantomData<Bus>,
}

impl<Bus> I2cAddr<Bus> {
    /// Create an I2C address without checking reserved ranges.
    ///
    /// Prefer [`try_new`][Self::try_new] in generic code. Use this only when
    /// the address is a known hardware-fixed constant.
    #[must_use]
    pub const fn new(addr: u8) -> Self {
        Self {
            addr,
            _bus: PhantomData,
        }
    }

    /// Create an I2C address, rejecting I2C-reserved ranges.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `addr <= 0x07` or `addr >= 0x78`.
    pub fn try_new(addr: u8) -> Result<Self, OutOfRangeError> {
        if addr <= 0x07 || addr >= 0x78 {
            Err(OutOfRangeError {
                value: u32::from(addr),
                min: 0x08,
                max: 0x77,
            })
        } else {
            Ok(Self::new(addr))
        }
    }

    /// Return the 7-bit I2C address.
    #[must_use]
    pub fn get(self) -> u8 {
        self.addr
    }
}
