//! ES8311 audio firmware
//!
//! Duplex I²S audio for the ESP32-P4 module dev kit: ES8311 codec control,
//! WAV playback and recording, and a self-test tone generator.
//!
//! # Architecture
//!
//! ```text
//! Application (AudioSubsystem public operations)
//!         ↓
//! Streaming (pcm-stream: container reader/writer, playback/capture loops)
//!         ↓
//! Drivers (ES8311 over async I²C) + Platform HAL traits (transport, storage)
//! ```
//!
//! All state lives in one [`AudioSubsystem`] value behind an async mutex;
//! there is no global mutable state.
//!
//! # Features
//!
//! - `std` - host builds: platform mocks and filesystem storage
//! - `defmt` - log through defmt (hardware builds)
//! - `tracing` - log through tracing (host builds)

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::await_holding_lock)] // holding a blocking Mutex across .await is a bug
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unused_async)]
#![allow(async_fn_in_trait)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod audio;
pub mod error;

pub use audio::codec::es8311::{Es8311Driver, Es8311Error};
pub use audio::codec::mock::{CodecCall, CodecFault, MockCodec, MockCodecError};
pub use audio::codec::CodecDriver;
pub use audio::config::SubsystemConfig;
pub use audio::subsystem::AudioSubsystem;
pub use audio::transport_health::TransportHealth;
pub use error::{AudioError, InitStep, ReconfigStep};
