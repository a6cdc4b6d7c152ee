//! PCM streaming between WAV containers and an I²S transport.
//!
//! Hardware-agnostic: everything here is generic over [`platform::File`]
//! and [`platform::AudioTransport`], so the same code drives the real
//! peripheral on target and the mocks on the host.
//!
//! # Modules
//!
//! - [`wav`] - canonical 44-byte header codec
//! - [`reader`] - header validation and tolerant `data` chunk scan
//! - [`writer`] - placeholder header, streamed payload, backfill
//! - [`playback`] - payload → transport, chunked, bounded write timeout
//! - [`capture`] - transport → writer, deadline loop
//! - [`tone`] - in-memory sine synthesis
//!
//! # Features
//!
//! - `defmt`: log through defmt (target builds)
//! - `tracing`: log through tracing (host builds)

#![cfg_attr(not(test), no_std)]
#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]
#![allow(async_fn_in_trait)]

extern crate alloc;

#[macro_use]
mod fmt;
mod io;

pub mod capture;
pub mod cursor;
pub mod error;
pub mod playback;
pub mod reader;
pub mod tone;
pub mod wav;
pub mod writer;

pub use capture::{capture_into, CaptureOptions, CaptureReport, CaptureStop};
pub use cursor::StreamCursor;
pub use error::{ResourceExhausted, StreamError};
pub use playback::{stream_payload, PlaybackOptions, PlaybackReport, PlaybackStop};
pub use reader::{WavPayload, WavReader};
pub use tone::{synthesize, ToneSpec, TONE_AMPLITUDE, TONE_SAMPLE_RATE_HZ};
pub use wav::{FormatError, WavHeader};
pub use writer::WavWriter;
