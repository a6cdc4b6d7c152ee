//! ES8311 driver over async I²C
//!
//! Uses the `embedded_hal_async::i2c::I2c` trait so it is HAL-agnostic while
//! remaining async. The audio stream itself travels over I²S; only control
//! traffic goes through this driver.
//!
//! # I²C Address
//!
//! | CE pin | Address |
//! |--------|---------|
//! | GND    | `0x18`  |
//! | VDD    | `0x19`  |

use embassy_time::Timer;
use embedded_hal::i2c::{Error as _, ErrorKind};
use embedded_hal_async::i2c::I2c;
use platform::audio_types::{CodecBus, DacVolumeRegister, I2cAddr};
use platform::{
    AudioCodec, CodecClockConfig, I2cAddresses, MicGain, MicInput, Resolution, VolumePercent,
};

use super::registers::*;
use crate::audio::clock_math::{mclk_hz, ClockCoefficients};
use crate::audio::codec::CodecDriver;

/// Hold time between asserting and releasing the reset bits.
const RESET_HOLD_MS: u64 = 20;

/// ES8311 driver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Es8311Error<E> {
    /// I²C transfer failed.
    I2c(E),
    /// Chip id registers did not read back `0x83 0x11`.
    ChipNotFound {
        /// Value read from 0xFD
        id1: u8,
        /// Value read from 0xFE
        id2: u8,
    },
    /// Clock configuration the chip cannot be programmed for.
    InvalidConfig,
}

/// ES8311 codec driver
pub struct Es8311Driver<I> {
    i2c: I,
    addr: u8,
}

impl<I: I2c> Es8311Driver<I> {
    /// Driver for the dev-kit codec at `0x18`.
    pub fn new(i2c: I) -> Self {
        Self::with_address(i2c, I2cAddresses::ES8311_CODEC)
    }

    /// Driver for a codec at `addr`.
    pub fn with_address(i2c: I, addr: I2cAddr<CodecBus>) -> Self {
        Self {
            i2c,
            addr: addr.get(),
        }
    }

    /// Give the bus back.
    pub fn release(self) -> I {
        self.i2c
    }

    async fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Es8311Error<I::Error>> {
        self.i2c.write(self.addr, &[reg, value]).await.map_err(|e| {
            warn!("es8311: write {:#x} failed ({})", reg, kind_str(e.kind()));
            Es8311Error::I2c(e)
        })
    }

    async fn read_reg(&mut self, reg: u8) -> Result<u8, Es8311Error<I::Error>> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.addr, &[reg], &mut buf)
            .await
            .map_err(|e| {
                warn!("es8311: read {:#x} failed ({})", reg, kind_str(e.kind()));
                Es8311Error::I2c(e)
            })?;
        let [value] = buf;
        Ok(value)
    }

    async fn write_table(&mut self, table: &[(u8, u8)]) -> Result<(), Es8311Error<I::Error>> {
        for &(reg, value) in table {
            self.write_reg(reg, value).await?;
        }
        Ok(())
    }
}

/// REG09/REG0A word-length code.
// Shift by a constant on a 3-bit code.
#[allow(clippy::arithmetic_side_effects)]
fn word_length(res: Resolution) -> u8 {
    let code: u8 = match res {
        Resolution::Bits24 => 0,
        Resolution::Bits16 => 3,
        Resolution::Bits32 => 4,
    };
    code << SDP_WORD_LEN_SHIFT
}

fn kind_str(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Bus => "bus",
        ErrorKind::ArbitrationLoss => "arbitration loss",
        ErrorKind::NoAcknowledge(_) => "nack",
        ErrorKind::Overrun => "overrun",
        _ => "other",
    }
}

impl<I: I2c> AudioCodec for Es8311Driver<I> {
    type Error = Es8311Error<I::Error>;

    async fn init(&mut self, config: CodecClockConfig) -> Result<(), Self::Error> {
        let coeffs = ClockCoefficients::for_config(&config).ok_or(Es8311Error::InvalidConfig)?;
        let coeff_regs = coeffs.registers().ok_or(Es8311Error::InvalidConfig)?;
        info!(
            "es8311: init {} Hz, MCLK {} Hz",
            config.sample_rate.get(),
            mclk_hz(config.sample_rate)
        );

        self.write_reg(REG_RESET, RESET_ALL).await?;
        Timer::after_millis(RESET_HOLD_MS).await;
        self.write_reg(REG_RESET, RESET_RELEASE).await?;
        self.write_reg(REG_RESET, RESET_CSM_ON).await?;

        let clk = if config.mclk_from_pin {
            CLK_ALL_ON
        } else {
            CLK_ALL_ON | CLK_MCLK_FROM_SCLK
        };
        self.write_reg(REG_CLK_MANAGER, clk).await?;
        self.write_table(&coeff_regs).await?;

        self.write_reg(REG_SDP_IN, word_length(config.dac_resolution))
            .await?;
        self.write_reg(REG_SDP_OUT, word_length(config.adc_resolution))
            .await?;

        self.write_table(&POWER_UP).await
    }

    async fn set_volume(&mut self, volume: VolumePercent) -> Result<(), Self::Error> {
        let reg = DacVolumeRegister::from_volume(volume).get();
        debug!("es8311: volume {}% -> {:#x}", volume.get(), reg);
        self.write_reg(REG_DAC_VOLUME, reg).await
    }

    async fn set_mute(&mut self, muted: bool) -> Result<(), Self::Error> {
        let current = self.read_reg(REG_DAC_MUTE).await?;
        let next = if muted {
            current | DAC_MUTE_BITS
        } else {
            current & !DAC_MUTE_BITS
        };
        self.write_reg(REG_DAC_MUTE, next).await
    }

    async fn configure_microphone(&mut self, input: MicInput) -> Result<(), Self::Error> {
        let select = match input {
            MicInput::Analog => MIC_ANALOG,
            MicInput::Digital => MIC_ANALOG | MIC_DIGITAL_BIT,
        };
        self.write_reg(REG_ADC_VOLUME, ADC_VOLUME_0DB).await?;
        self.write_reg(REG_SYSTEM_MIC, select).await
    }

    async fn set_mic_gain(&mut self, gain: MicGain) -> Result<(), Self::Error> {
        self.write_reg(REG_ADC_GAIN, gain.register_code()).await
    }
}

impl<I: I2c> CodecDriver for Es8311Driver<I> {
    async fn probe(&mut self) -> Result<(), Self::Error> {
        let id1 = self.read_reg(REG_CHIP_ID1).await?;
        let id2 = self.read_reg(REG_CHIP_ID2).await?;
        if (id1, id2) != CHIP_ID {
            warn!("es8311: unexpected chip id {:#x} {:#x}", id1, id2);
            return Err(Es8311Error::ChipNotFound { id1, id2 });
        }
        debug!("es8311: chip id ok");
        Ok(())
    }

    async fn power_down(&mut self) -> Result<(), Self::Error> {
        self.write_table(&POWER_DOWN).await
    }
}
