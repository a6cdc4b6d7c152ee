//! ES8311 register map
//!
//! Source: Everest Semiconductor ES8311 datasheet and user guide.
//!
//! # Key I²C Constraints
//!
//! ## 7-bit address
//! CE pin low selects `0x18`, high selects `0x19`. The dev kit ties CE low.
//!
//! ## Reset sequence
//! After power-on the chip must see `0x1F` in REG00 (all blocks held in reset),
//! a short delay, `0x00` (release), then `0x80` (CSM power-on, slave mode).
//!
//! ## Re-init resets the DAC
//! Every full init rewrites the clock manager and power registers, which
//! returns REG31/REG32 to their reset values (unmuted, volume 0x00 = -95.5 dB).
//! Volume and mute must be written again after each init.
//!
//! ## Single-byte reads
//! Each register read is one `write_read` with one address byte out and one
//! data byte back.

// ---------------------------------------------------------------------------
// Register addresses
// ---------------------------------------------------------------------------

/// Reset / CSM control. bit 7 = CSM_ON, bit 6 = master mode, bits 4:0 = resets.
pub const REG_RESET: u8 = 0x00;

/// Clock manager: clock enables and MCLK source.
///
/// bit 7 = MCLK from SCLK (1) or MCLK pin (0); bit 6 = invert MCLK;
/// bits 5:0 = per-block clock enables.
pub const REG_CLK_MANAGER: u8 = 0x01;

/// Serial data port, DAC side (SDP in). bits 4:2 = word length.
pub const REG_SDP_IN: u8 = 0x09;

/// Serial data port, ADC side (SDP out). bits 4:2 = word length.
pub const REG_SDP_OUT: u8 = 0x0A;

/// System: analog power-up.
pub const REG_SYSTEM_PWR: u8 = 0x0D;

/// System: analog PGA / ADC modulator power.
pub const REG_SYSTEM_PGA: u8 = 0x0E;

/// System: DAC power.
pub const REG_SYSTEM_DAC: u8 = 0x12;

/// System: headphone / output driver.
pub const REG_SYSTEM_HP: u8 = 0x13;

/// System: microphone select and PGA enable. bit 6 = digital mic.
pub const REG_SYSTEM_MIC: u8 = 0x14;

/// ADC ramp rate.
pub const REG_ADC_RAMP: u8 = 0x15;

/// ADC PGA gain scale (0–7, 6 dB per step).
pub const REG_ADC_GAIN: u8 = 0x16;

/// ADC digital volume.
pub const REG_ADC_VOLUME: u8 = 0x17;

/// ADC high-pass filter / equalizer bypass.
pub const REG_ADC_HPF: u8 = 0x1C;

/// DAC mute. bits 6:5 = DAC_DSMMUTE | DAC_DEMMUTE.
pub const REG_DAC_MUTE: u8 = 0x31;

/// DAC digital volume. 0x00 = -95.5 dB, 0xBF = 0 dB, 0xFF = +32 dB.
pub const REG_DAC_VOLUME: u8 = 0x32;

/// DAC ramp rate and equalizer bypass.
pub const REG_DAC_RAMP: u8 = 0x37;

/// GPIO / internal reference.
pub const REG_GPIO: u8 = 0x45;

/// Chip id, high byte.
pub const REG_CHIP_ID1: u8 = 0xFD;

/// Chip id, low byte.
pub const REG_CHIP_ID2: u8 = 0xFE;

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// REG00: hold every block in reset.
pub const RESET_ALL: u8 = 0x1F;

/// REG00: release resets.
pub const RESET_RELEASE: u8 = 0x00;

/// REG00: CSM on, slave mode.
pub const RESET_CSM_ON: u8 = 0x80;

/// REG01: every clock enabled, MCLK from pin.
pub const CLK_ALL_ON: u8 = 0x3F;

/// REG01 bit 7: derive MCLK from SCLK instead of the MCLK pin.
pub const CLK_MCLK_FROM_SCLK: u8 = 0x80;

/// REG09/REG0A word-length field shift.
pub const SDP_WORD_LEN_SHIFT: u8 = 2;

/// REG31 bits 6:5: mute both DAC paths.
pub const DAC_MUTE_BITS: u8 = 0x60;

/// REG14: analog mic on MIC1P, PGA enabled.
pub const MIC_ANALOG: u8 = 0x1A;

/// REG14 bit 6: PDM digital mic.
pub const MIC_DIGITAL_BIT: u8 = 0x40;

/// REG17: ADC volume 0 dB.
pub const ADC_VOLUME_0DB: u8 = 0xC8;

/// Expected chip id.
pub const CHIP_ID: (u8, u8) = (0x83, 0x11);

/// Analog power-up writes, applied after the clock and serial port setup.
pub const POWER_UP: [(u8, u8); 6] = [
    (REG_SYSTEM_PWR, 0x01),
    (REG_SYSTEM_PGA, 0x02),
    (REG_SYSTEM_DAC, 0x00),
    (REG_SYSTEM_HP, 0x10),
    (REG_ADC_HPF, 0x6A),
    (REG_DAC_RAMP, 0x08),
];

/// Power-down writes, applied in order. Leaves the chip in reset with clocks off.
pub const POWER_DOWN: [(u8, u8); 11] = [
    (REG_DAC_VOLUME, 0x00),
    (REG_ADC_VOLUME, 0x00),
    (REG_SYSTEM_PGA, 0xFF),
    (REG_SYSTEM_DAC, 0x02),
    (REG_SYSTEM_MIC, 0x00),
    (REG_SYSTEM_PWR, 0xFA),
    (REG_ADC_RAMP, 0x00),
    (REG_RESET, RESET_ALL),
    (REG_CLK_MANAGER, 0x30),
    (REG_CLK_MANAGER, 0x00),
    (REG_GPIO, 0x00),
];
