//! Duplex digital-audio transport (I²S) abstraction
//!
//! The transport owns both data directions of one I²S controller. The
//! transmit and receive paths share a bit clock but can be enabled,
//! disabled and re-clocked independently, which is what allows a sample
//! rate change without tearing the receive side down.
//!
//! `write` and `read` may wait on DMA. Callers bound them with
//! `embassy_time::with_timeout`.

use crate::audio_config::I2sAudioConfig;
use crate::audio_types::SampleRateHz;

/// Data direction on the duplex transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Transmit (memory → codec DAC)
    Tx,
    /// Receive (codec ADC → memory)
    Rx,
}

impl Direction {
    /// Short label for logging.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tx => "tx",
            Self::Rx => "rx",
        }
    }
}

/// Standard-mode clock settings for one transport direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransportClock {
    /// Frame (LRCK) rate
    pub sample_rate: SampleRateHz,
    /// MCLK / fs ratio
    pub mclk_multiple: u16,
}

impl TransportClock {
    /// Clock at `sample_rate` with MCLK = 256 × fs.
    pub fn for_rate(sample_rate: SampleRateHz) -> Self {
        Self {
            sample_rate,
            mclk_multiple: 256,
        }
    }

    /// MCLK frequency in Hz, or `None` on overflow.
    pub fn mclk_hz(&self) -> Option<u32> {
        self.sample_rate
            .get()
            .checked_mul(u32::from(self.mclk_multiple))
    }
}

/// Duplex I²S transport trait
pub trait AudioTransport {
    /// Error type
    type Error: core::fmt::Debug;

    /// Allocate both channels and apply the standard-mode configuration.
    ///
    /// Channels are left disabled.
    fn open(
        &mut self,
        config: I2sAudioConfig,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Release both channels. Disables any enabled direction first.
    fn close(&mut self) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Start clocking data in `direction`.
    fn enable(
        &mut self,
        direction: Direction,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Stop clocking data in `direction`.
    fn disable(
        &mut self,
        direction: Direction,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Reprogram the clock of a disabled direction.
    fn reconfigure_clock(
        &mut self,
        direction: Direction,
        clock: TransportClock,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>>;

    /// Queue interleaved 16-bit LE PCM for transmission.
    ///
    /// Returns the number of bytes accepted.
    fn write(
        &mut self,
        bytes: &[u8],
    ) -> impl core::future::Future<Output = Result<usize, Self::Error>>;

    /// Read captured interleaved 16-bit LE PCM.
    ///
    /// Returns the number of bytes written into `buf`.
    fn read(
        &mut self,
        buf: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, Self::Error>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_clock_mclk() {
        let clk = TransportClock::for_rate(SampleRateHz::KHZ_44_1);
        assert_eq!(clk.mclk_hz(), Some(11_289_600));
    }

    #[test]
    fn direction_labels() {
        assert_eq!(Direction::Tx.as_str(), "tx");
        assert_eq!(Direction::Rx.as_str(), "rx");
    }
}
