//! Codec driver abstractions
//!
//! - `es8311` - ES8311 register-level driver over async I²C
//! - `mock` - in-process mock for host tests (always available)

pub mod es8311;
pub mod mock;

use platform::AudioCodec;

/// Board-level codec trait, extending [`platform::AudioCodec`].
///
/// Adds presence detection and power management, which the subsystem needs
/// for bring-up and rollback but which are not part of the generic codec
/// interface.
pub trait CodecDriver: AudioCodec {
    /// Verify the chip answers on the bus with the expected id.
    async fn probe(&mut self) -> Result<(), Self::Error>;

    /// Silence outputs and put the chip into its lowest-power state.
    async fn power_down(&mut self) -> Result<(), Self::Error>;
}
