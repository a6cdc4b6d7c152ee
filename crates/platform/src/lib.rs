//! Hardware Abstraction Layer (HAL) for the ES8311 audio board
//!
//! This crate provides trait-based abstractions for the audio hardware,
//! enabling development and testing without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application Layer (firmware crate: AudioSubsystem)
//!         ↓
//! Stream Layer (pcm-stream: WAV container, playback, capture, tone)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (I²S peripheral, I²C bus, filesystem)
//! ```
//!
//! # Abstractions
//!
//! - [`AudioTransport`] - duplex I²S data path with per-direction enable and clock control
//! - [`AudioCodec`] - analog front end (clocking, volume, mute, microphone)
//! - [`Storage`] / [`File`] - file system access
//!
//! # Features
//!
//! - `std`: Enable standard library support (`LocalFileStorage`, host mocks)
//! - `defmt`: Enable `defmt::Format` derives on all platform types
//!
//! # Example
//!
//! ```no_run
//! use platform::{AudioTransport, Direction};
//!
//! async fn example<T: AudioTransport>(transport: &mut T) {
//!     transport.enable(Direction::Tx).await.unwrap();
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors - callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // Embassy no_std: single-threaded, Send bounds not needed

pub mod audio;
pub mod audio_config;
pub mod audio_types;
pub mod config;
pub mod mocks;
pub mod storage;
pub mod transport;

#[cfg(any(test, feature = "std"))]
pub mod storage_local;

// Re-export main high-level traits
pub use audio::{AudioCodec, CodecClockConfig, Resolution};
pub use audio_config::{BoardPins, I2cAddresses, I2sAudioConfig, I2sPins};
pub use audio_types::{MicGain, MicInput, OutOfRangeError, SampleRateHz, VolumePercent};
pub use storage::{File, Storage};
pub use transport::{AudioTransport, Direction, TransportClock};
