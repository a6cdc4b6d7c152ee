//! ES8311 clock-tree coefficients for MCLK-pin operation.
//!
//! The codec takes MCLK from the I²S port at a fixed 256 × fs and divides
//! it down internally to the ADC/DAC oversampling clocks, LRCK and BCLK.
//!
//! # Clock Tree
//!
//!   MCLK pin (256 x fs) -> PRE_DIV (/1) -> PRE_MULT (x1) = DIG_MCLK
//!                                           |
//!                        ADC_DIV (/1) ------+------ DAC_DIV (/1)
//!                        ADC_OSR (16 x 16)          DAC_OSR (16 x 16)
//!                                           |
//!                        LRCK_DIV (/256) -> LRCK = fs
//!                        BCLK_DIV (/4)   -> BCLK = 64 x fs (2 ch x 32 slot bits)
//!
//! # One coefficient row for every rate
//!
//! Each divider is a ratio against MCLK, and MCLK is always 256 × fs. The
//! codec's own coefficient table uses the same row for 8 kHz / 2.048 MHz,
//! 16 kHz / 4.096 MHz, 44.1 kHz / 11.2896 MHz and 48 kHz / 12.288 MHz, so a
//! rate switch changes the MCLK the transport emits and nothing else.
//!
//! References:
//! - ES8311 datasheet, clock manager registers 0x01–0x08
//! - ES8311 user guide, "MCLK/LRCK ratio" coefficient table

use platform::{CodecClockConfig, SampleRateHz};

/// MCLK/fs ratio the codec is driven at.
pub const MCLK_FS_RATIO: u32 = 256;

/// BCLK/fs ratio: two 32-bit slots per frame.
pub const BCLK_FS_RATIO: u32 = 64;

/// Highest MCLK the ES8311 accepts on its MCLK pin (Hz).
pub const MCLK_MAX_HZ: u32 = 49_152_000;

/// Divider settings for one MCLK/fs ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockCoefficients {
    /// MCLK pre-divider, 1–8
    pub pre_div: u8,
    /// MCLK pre-multiplier, 1/2/4/8
    pub pre_mult: u8,
    /// ADC clock divider, 1–16
    pub adc_div: u8,
    /// DAC clock divider, 1–16
    pub dac_div: u8,
    /// Single (0) or double (1) speed
    pub fs_mode: u8,
    /// ADC oversampling code
    pub adc_osr: u8,
    /// DAC oversampling code
    pub dac_osr: u8,
    /// LRCK divider, 1–4096
    pub lrck_div: u16,
    /// BCLK divider, 1–32
    pub bclk_div: u8,
}

impl ClockCoefficients {
    /// Coefficients for MCLK = 256 × fs.
    pub const RATIO_256: Self = Self {
        pre_div: 1,
        pre_mult: 1,
        adc_div: 1,
        dac_div: 1,
        fs_mode: 0,
        adc_osr: 0x10,
        dac_osr: 0x10,
        lrck_div: 256,
        bclk_div: 4,
    };

    /// Coefficients for `config`, or `None` if its MCLK ratio is not supported
    /// or MCLK would exceed [`MCLK_MAX_HZ`].
    pub fn for_config(config: &CodecClockConfig) -> Option<Self> {
        if u32::from(config.mclk_multiple) != MCLK_FS_RATIO {
            return None;
        }
        let mclk = config.mclk_hz()?;
        if mclk > MCLK_MAX_HZ {
            return None;
        }
        Some(Self::RATIO_256)
    }

    /// Register writes for 0x02–0x08, in address order.
    ///
    /// Returns `None` if a field is outside its register's range.
    // Shifts are by constants on fields range-checked above.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn registers(&self) -> Option<[(u8, u8); 7]> {
        let mult_code: u8 = match self.pre_mult {
            1 => 0,
            2 => 1,
            4 => 2,
            8 => 3,
            _ => return None,
        };
        let pre_div = self.pre_div.checked_sub(1).filter(|d| *d < 8)?;
        let adc_div = self.adc_div.checked_sub(1).filter(|d| *d < 16)?;
        let dac_div = self.dac_div.checked_sub(1).filter(|d| *d < 16)?;
        let bclk_div = self.bclk_div.checked_sub(1).filter(|d| *d < 32)?;
        let lrck = self.lrck_div.checked_sub(1).filter(|d| *d < 4096)?;
        let [lrck_l, lrck_h] = lrck.to_le_bytes();

        Some([
            (0x02, (pre_div << 5) | (mult_code << 3)),
            (0x03, ((self.fs_mode & 0x01) << 6) | (self.adc_osr & 0x3F)),
            (0x04, self.dac_osr & 0x7F),
            (0x05, (adc_div << 4) | dac_div),
            (0x06, bclk_div),
            (0x07, lrck_h & 0x0F),
            (0x08, lrck_l),
        ])
    }
}

/// MCLK for `rate` at the fixed ratio. Fits in u32 for every valid rate.
pub fn mclk_hz(rate: SampleRateHz) -> u32 {
    rate.get().saturating_mul(MCLK_FS_RATIO)
}

/// BCLK for `rate`: 16-bit stereo in 32-bit slots.
pub fn bclk_hz(rate: SampleRateHz) -> u32 {
    rate.get().saturating_mul(BCLK_FS_RATIO)
}
