//! Audio subsystem - codec driver, clocking and the public audio context
//!
//! Vertically sliced: one sub-directory per hardware component.
//!
//! # Structure
//!
//! - `codec/` - codec drivers (`Es8311Driver` hardware, `MockCodec` for tests)
//! - `clock_math` - ES8311 clock coefficients at 256 × fs
//! - `transport_health` - transmit-path recovery after a failed rate switch
//! - `config` - runtime tunables
//! - `subsystem` - [`AudioSubsystem`], the public operations
//!
//! # Dependency Injection
//!
//! The subsystem targets the [`platform::AudioTransport`],
//! [`codec::CodecDriver`] and [`platform::Storage`] traits. Concrete types
//! are injected at the call site:
//!
//! ```rust,ignore
//! // Hardware:
//! let audio = AudioSubsystem::<CriticalSectionRawMutex, _, _, _>::new(
//!     i2s, Es8311Driver::new(i2c), sd_card, SubsystemConfig::default());
//! // Tests:
//! let audio = AudioSubsystem::<NoopRawMutex, _, _, _>::new(
//!     MockTransport::new(), MockCodec::new(), MockStorage::new(), SubsystemConfig::default());
//! ```

pub mod clock_math;
pub mod codec;
pub mod config;
pub mod subsystem;
pub mod transport_health;

pub use codec::es8311::Es8311Driver;
pub use codec::mock::MockCodec;
pub use config::SubsystemConfig;
pub use subsystem::AudioSubsystem;
