//! Architecture boundary tests - run with `cargo test -p firmware --test arch_boundaries`
// Architecture test file: unwrap is an intentional test mechanism.
#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
//!
//! Layering rules:
//!   Rule 1: platform (HAL traits, board constants) depends on nothing above it
//!   Rule 2: pcm-stream is generic over the platform traits and knows no codec
//!   Rule 3: the subsystem accepts any `CodecDriver`; the ES8311 driver and
//!           the mock are interchangeable at the type level
//!
//! Most of this is enforced by the crate graph itself: if a lower layer
//! gained a dependency on a higher one, this binary would not link. The
//! tests below pin the seams that the graph cannot express.

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_hal_mock::eh1::i2c::Mock as I2cMock;
use firmware::{AudioSubsystem, CodecDriver, Es8311Driver, MockCodec, SubsystemConfig};
use platform::mocks::{MockFile, MockStorage, MockTransport};
use platform::{AudioCodec, AudioTransport, File, Storage};

/// Rule 1: the HAL traits are nameable without any firmware type.
#[test]
fn platform_traits_are_independent() {
    fn _transport<T: AudioTransport>() {}
    fn _codec<T: AudioCodec>() {}
    fn _storage<T: Storage>() {}
    fn _file<T: File>() {}

    _transport::<MockTransport>();
    _storage::<MockStorage>();
    _file::<MockFile>();
}

/// Rule 2: the streaming layer compiles against the bare traits.
#[test]
fn stream_layer_is_trait_generic() {
    fn _reader<F: File>(f: F) -> impl core::future::Future {
        pcm_stream::WavReader::open(f)
    }
    // A canonical header is all the container layer needs from the board.
    let header = pcm_stream::WavHeader::pcm16_stereo(16_000, 0).unwrap();
    assert_eq!(header.byte_rate, platform::SampleRateHz::KHZ_16.stereo16_byte_rate());
}

/// Rule 3: both codec implementations satisfy the subsystem's bound.
#[test]
fn codec_drivers_are_interchangeable() {
    fn _driver<C: CodecDriver>() {}
    _driver::<MockCodec>();
    _driver::<Es8311Driver<I2cMock>>();

    let mut bus = I2cMock::new(&[]);
    let _hw: AudioSubsystem<NoopRawMutex, MockTransport, Es8311Driver<I2cMock>, MockStorage> =
        AudioSubsystem::new(
            MockTransport::new(),
            Es8311Driver::new(bus.clone()),
            MockStorage::new(),
            SubsystemConfig::default(),
        );
    // Construction alone must not touch the bus.
    bus.done();
}

/// The board constants the subsystem boots with stay consistent with the
/// codec's fixed 256 × fs clock plan.
#[test]
fn default_rate_clock_plan() {
    let cfg = SubsystemConfig::default();
    let rate = cfg.default_rate;
    assert_eq!(
        firmware::audio::clock_math::mclk_hz(rate),
        rate.get() * firmware::audio::clock_math::MCLK_FS_RATIO
    );
    assert_eq!(
        platform::I2sAudioConfig::es8311(rate).mclk_hz(),
        firmware::audio::clock_math::mclk_hz(rate)
    );
}
