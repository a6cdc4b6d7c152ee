//! AudioSubsystem integration tests on the platform mocks.
// Integration test file: unwrap/indexing are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation
)]
//!
//! Every test builds a fresh context around cloned mocks and inspects the
//! clones it kept. Settle delays are shortened to 1 ms.
//!
//! Run with: cargo test -p firmware --test subsystem

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::Duration;
use firmware::{
    AudioError, AudioSubsystem, CodecCall, CodecFault, InitStep, MockCodec, ReconfigStep,
    SubsystemConfig, TransportHealth,
};
use pcm_stream::{FormatError, PlaybackStop, WavHeader};
use platform::mocks::{MockStorage, MockTransport, StorageFault, TransportCall, TransportFault};
use platform::{Direction, MicGain, MicInput};

type Audio = AudioSubsystem<NoopRawMutex, MockTransport, MockCodec, MockStorage>;

struct Rig {
    audio: Audio,
    transport: MockTransport,
    codec: MockCodec,
    storage: MockStorage,
}

fn rig() -> Rig {
    let transport = MockTransport::new();
    let codec = MockCodec::new();
    let storage = MockStorage::new();
    let config = SubsystemConfig {
        settle: Duration::from_millis(1),
        ..SubsystemConfig::default()
    };
    Rig {
        audio: AudioSubsystem::new(transport.clone(), codec.clone(), storage.clone(), config),
        transport,
        codec,
        storage,
    }
}

async fn ready() -> Rig {
    let r = rig();
    r.audio.initialize().await.unwrap();
    r.transport.clear_log();
    r.codec.clear_log();
    r
}

/// Canonical 16-bit stereo file with a counting payload.
fn wav(rate: u32, payload_len: usize) -> (Vec<u8>, Vec<u8>) {
    let payload: Vec<u8> = (0..payload_len).map(|i| (i % 251) as u8).collect();
    let header = WavHeader::pcm16_stereo(rate, payload_len as u32).unwrap();
    let mut bytes = header.encode().to_vec();
    bytes.extend_from_slice(&payload);
    (bytes, payload)
}

// ── initialize ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn initialize_brings_up_transport_then_codec() {
    let r = rig();
    assert!(!r.audio.is_initialized().await);
    r.audio.initialize().await.unwrap();

    assert!(r.audio.is_initialized().await);
    assert_eq!(
        r.transport.calls(),
        vec![
            TransportCall::Open(16_000),
            TransportCall::Enable(Direction::Tx),
            TransportCall::Enable(Direction::Rx),
        ]
    );
    assert_eq!(
        r.codec.calls(),
        vec![
            CodecCall::Probe,
            CodecCall::Init(16_000),
            CodecCall::SetVolume(65),
            CodecCall::ConfigureMicrophone(MicInput::Analog),
            CodecCall::SetMute(false),
        ]
    );
    assert_eq!(r.audio.sample_rate().await.get(), 16_000);
    assert_eq!(r.audio.volume().await.get(), 65);
    assert_eq!(r.codec.volume(), 65);
    assert!(!r.codec.is_muted());
}

#[tokio::test]
async fn initialize_twice_is_a_no_op() {
    let r = ready().await;
    r.audio.initialize().await.unwrap();
    assert!(r.transport.calls().is_empty());
    assert!(r.codec.calls().is_empty());
}

#[tokio::test]
async fn failed_transport_open_touches_nothing() {
    let r = rig();
    r.transport.fail(TransportFault::Open);
    assert_eq!(
        r.audio.initialize().await,
        Err(AudioError::InitializationFailure {
            step: InitStep::TransportOpen
        })
    );
    assert!(r.transport.calls().is_empty());
    assert!(r.codec.calls().is_empty());
    assert!(!r.audio.is_initialized().await);
}

#[tokio::test]
async fn failed_rx_enable_releases_tx_and_channels() {
    let r = rig();
    r.transport.fail(TransportFault::Enable(Direction::Rx));
    assert_eq!(
        r.audio.initialize().await,
        Err(AudioError::InitializationFailure {
            step: InitStep::TransportEnable
        })
    );
    assert_eq!(
        r.transport.calls(),
        vec![
            TransportCall::Open(16_000),
            TransportCall::Enable(Direction::Tx),
            TransportCall::Disable(Direction::Tx),
            TransportCall::Close,
        ]
    );
    assert!(!r.transport.is_open());
}

#[tokio::test]
async fn missing_codec_releases_transport_only() {
    let r = rig();
    r.codec.fail(CodecFault::Probe);
    assert_eq!(
        r.audio.initialize().await,
        Err(AudioError::InitializationFailure {
            step: InitStep::CodecProbe
        })
    );
    assert_eq!(r.codec.calls(), vec![CodecCall::Probe]);
    assert_eq!(
        r.transport.calls()[3..],
        [
            TransportCall::Disable(Direction::Rx),
            TransportCall::Disable(Direction::Tx),
            TransportCall::Close,
        ]
    );
}

#[tokio::test]
async fn codec_step_failures_power_the_codec_down() {
    let cases = [
        (CodecFault::Init, InitStep::CodecInit),
        (CodecFault::SetVolume, InitStep::Volume),
        (CodecFault::ConfigureMicrophone, InitStep::Microphone),
        (CodecFault::SetMute, InitStep::Unmute),
    ];
    for (fault, step) in cases {
        let r = rig();
        r.codec.fail(fault);
        assert_eq!(
            r.audio.initialize().await,
            Err(AudioError::InitializationFailure { step }),
            "{fault:?}"
        );
        assert_eq!(r.codec.calls().last(), Some(&CodecCall::PowerDown));
        assert!(!r.codec.is_powered());
        assert!(!r.transport.is_open());
        assert!(!r.audio.is_initialized().await);
    }
}

#[tokio::test]
async fn initialize_retries_after_failure() {
    let r = rig();
    r.codec.fail(CodecFault::Init);
    assert!(r.audio.initialize().await.is_err());
    r.codec.clear_faults();
    r.audio.initialize().await.unwrap();
    assert!(r.audio.is_initialized().await);
    assert!(r.transport.is_enabled(Direction::Tx));
    assert!(r.transport.is_enabled(Direction::Rx));
}

#[tokio::test]
async fn operations_before_initialize_are_refused() {
    let r = rig();
    let (bytes, _) = wav(16_000, 64);
    r.storage.insert("/a.wav", bytes);

    assert_eq!(r.audio.play_tone(440, 100).await, Err(AudioError::InvalidState));
    assert_eq!(
        r.audio.play_file("/a.wav").await.unwrap_err(),
        AudioError::InvalidState
    );
    assert_eq!(r.audio.set_volume(50).await, Err(AudioError::InvalidState));
    assert_eq!(
        r.audio.record_to_file("/b.wav", 100).await.unwrap_err(),
        AudioError::InvalidState
    );
    assert_eq!(
        r.audio.set_sample_rate(48_000).await,
        Err(AudioError::InvalidState)
    );
    assert!(r.transport.calls().is_empty());
    assert_eq!(r.storage.opened_total(), 0);
}

// ── set_sample_rate ─────────────────────────────────────────────────────────

#[tokio::test]
async fn rate_switch_sequence() {
    let r = ready().await;
    r.audio.set_sample_rate(44_100).await.unwrap();

    assert_eq!(
        r.transport.calls(),
        vec![
            TransportCall::Disable(Direction::Tx),
            TransportCall::Reconfigure(Direction::Tx, 44_100),
            TransportCall::Enable(Direction::Tx),
        ]
    );
    assert_eq!(
        r.codec.calls(),
        vec![
            CodecCall::Init(44_100),
            CodecCall::SetVolume(65),
            CodecCall::SetMute(false),
            CodecCall::ConfigureMicrophone(MicInput::Analog),
        ]
    );
    // Receive path keeps its channel.
    assert!(r.transport.is_enabled(Direction::Rx));
}

#[tokio::test]
async fn every_supported_rate_reaches_transport_and_codec() {
    let r = ready().await;
    for rate in [8_000, 22_050, 44_100, 48_000, 16_000] {
        r.audio.set_sample_rate(rate).await.unwrap();
        assert_eq!(r.audio.sample_rate().await.get(), rate);
        assert_eq!(
            r.transport.clock(Direction::Tx).unwrap().sample_rate.get(),
            rate
        );
        assert_eq!(
            r.transport.clock(Direction::Rx).unwrap().sample_rate.get(),
            rate
        );
        assert_eq!(r.codec.clock().unwrap().sample_rate.get(), rate);
        assert_eq!(r.codec.volume(), 65, "volume lost at {rate} Hz");
        assert!(r.transport.is_enabled(Direction::Tx));
    }
}

#[tokio::test]
async fn same_rate_is_a_no_op() {
    let r = ready().await;
    r.audio.set_sample_rate(16_000).await.unwrap();
    assert!(r.transport.calls().is_empty());
    assert!(r.codec.calls().is_empty());
}

#[tokio::test]
async fn out_of_range_rate_is_rejected() {
    let r = ready().await;
    assert_eq!(
        r.audio.set_sample_rate(4_000).await,
        Err(AudioError::UnsupportedRate(4_000))
    );
    assert_eq!(
        r.audio.set_sample_rate(192_000).await,
        Err(AudioError::UnsupportedRate(192_000))
    );
    assert!(r.transport.calls().is_empty());
}

#[tokio::test]
async fn volume_survives_rate_switch() {
    let r = ready().await;
    r.audio.set_volume(30).await.unwrap();
    r.audio.set_sample_rate(48_000).await.unwrap();
    assert_eq!(r.codec.volume(), 30);
    assert_eq!(r.audio.volume().await.get(), 30);
}

#[tokio::test]
async fn mic_gain_survives_rate_switch_after_recording() {
    let r = ready().await;
    r.audio.record_to_file("/rec.wav", 20).await.unwrap();
    r.codec.clear_log();

    r.audio.set_sample_rate(48_000).await.unwrap();
    assert_eq!(
        r.codec.calls()[3..],
        [
            CodecCall::ConfigureMicrophone(MicInput::Analog),
            CodecCall::SetMicGain(MicGain::Db18),
        ]
    );
    assert_eq!(r.codec.mic_gain(), Some(MicGain::Db18));
}

#[tokio::test]
async fn failed_file_rate_switch_aborts_playback() {
    let r = ready().await;
    let (bytes, _) = wav(44_100, 4_096);
    r.storage.insert("/a.wav", bytes);
    r.transport.fail(TransportFault::Reconfigure);

    assert_eq!(
        r.audio.play_file("/a.wav").await.unwrap_err(),
        AudioError::ReconfigurationFailure {
            rate: 44_100,
            step: ReconfigStep::TransportClock
        }
    );
    assert_eq!(r.transport.write_count(), 0);
    assert!(r.transport.written().is_empty());
    assert_eq!(
        r.audio.transport_health().await,
        TransportHealth::NeedsRecovery { failures: 1 }
    );
    assert_eq!(r.storage.open_handles(), 0);
}

#[tokio::test]
async fn failed_switch_blocks_tx_until_recovered() {
    let r = ready().await;
    r.transport.fail(TransportFault::Reconfigure);
    assert_eq!(
        r.audio.set_sample_rate(48_000).await,
        Err(AudioError::ReconfigurationFailure {
            rate: 48_000,
            step: ReconfigStep::TransportClock
        })
    );
    assert_eq!(r.audio.sample_rate().await.get(), 16_000);
    assert_eq!(
        r.audio.transport_health().await,
        TransportHealth::NeedsRecovery { failures: 1 }
    );
    assert!(!r.transport.is_enabled(Direction::Tx));
    assert_eq!(r.audio.play_tone(440, 50).await, Err(AudioError::InvalidState));

    // Recording does not use TX.
    r.audio.record_to_file("/rec.wav", 20).await.unwrap();

    r.transport.clear_faults();
    let before = r.transport.reconfigure_count();
    // Same rate as recorded, still re-runs the whole switch.
    r.audio.set_sample_rate(16_000).await.unwrap();
    assert_eq!(r.transport.reconfigure_count(), before + 1);
    assert_eq!(r.audio.transport_health().await, TransportHealth::Healthy);
    assert!(r.transport.is_enabled(Direction::Tx));
    r.audio.play_tone(440, 50).await.unwrap();
}

#[tokio::test]
async fn codec_failure_during_switch_names_the_step() {
    let r = ready().await;
    r.codec.fail(CodecFault::SetVolume);
    assert_eq!(
        r.audio.set_sample_rate(22_050).await,
        Err(AudioError::ReconfigurationFailure {
            rate: 22_050,
            step: ReconfigStep::RestoreVolume
        })
    );
    assert!(r.audio.transport_health().await.needs_recovery());
    assert!(!r.transport.is_enabled(Direction::Tx));
}

// ── set_volume ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn set_volume_validates_and_reports_device_errors() {
    let r = ready().await;
    assert_eq!(r.audio.set_volume(101).await, Err(AudioError::InvalidArgument));
    assert!(r.codec.calls().is_empty());

    r.codec.fail(CodecFault::SetVolume);
    assert_eq!(r.audio.set_volume(40).await, Err(AudioError::DeviceFailure));
    assert_eq!(r.audio.volume().await.get(), 65);

    r.codec.clear_faults();
    r.audio.set_volume(0).await.unwrap();
    r.audio.set_volume(100).await.unwrap();
    assert_eq!(r.codec.volume(), 100);
}

// ── play_tone ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn tone_is_one_stereo_write() {
    let r = ready().await;
    r.audio.play_tone(440, 100).await.unwrap();

    assert_eq!(r.transport.write_count(), 1);
    let out = r.transport.written();
    assert_eq!(out.len(), 1600 * 4);
    for frame in out.chunks_exact(4) {
        assert_eq!(frame[..2], frame[2..]);
        let s = i16::from_le_bytes([frame[0], frame[1]]);
        assert!(s.unsigned_abs() <= 15_000);
    }
}

#[tokio::test]
async fn tone_ignores_transport_rate() {
    let r = ready().await;
    r.audio.set_sample_rate(48_000).await.unwrap();
    r.transport.clear_log();

    r.audio.play_tone(440, 100).await.unwrap();
    assert_eq!(r.transport.write_count(), 1);
    // Synthesized at 16 kHz regardless of the active rate.
    assert_eq!(r.transport.written().len(), 1600 * 4);
    assert_eq!(r.audio.sample_rate().await.get(), 48_000);
}

#[tokio::test]
async fn tone_write_failure_is_not_an_error() {
    let r = ready().await;
    r.transport.fail(TransportFault::Write);
    r.audio.play_tone(1_000, 50).await.unwrap();
    assert!(r.transport.written().is_empty());
}

#[tokio::test]
async fn zero_length_tone_writes_nothing() {
    let r = ready().await;
    r.audio.play_tone(440, 0).await.unwrap();
    assert_eq!(r.transport.write_count(), 0);
}

// ── play_file ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn file_plays_at_its_declared_rate() {
    let r = ready().await;
    let (bytes, payload) = wav(44_100, 5_000);
    r.storage.insert("/song.wav", bytes);

    let report = r.audio.play_file("/song.wav").await.unwrap();
    assert_eq!(report.stop, PlaybackStop::Completed);
    assert_eq!(report.bytes_written, 5_000);
    assert_eq!(report.writes, 5);
    assert_eq!(r.transport.written(), payload);
    assert_eq!(r.audio.sample_rate().await.get(), 44_100);
    assert_eq!(r.codec.clock().unwrap().sample_rate.get(), 44_100);
    assert_eq!(r.storage.open_handles(), 0);
}

#[tokio::test]
async fn unsupported_file_rate_plays_at_current_rate() {
    let r = ready().await;
    let (bytes, payload) = wav(96_000, 2_048);
    r.storage.insert("/hi.wav", bytes);

    let report = r.audio.play_file("/hi.wav").await.unwrap();
    assert_eq!(report.bytes_written, 2_048);
    assert_eq!(r.transport.written(), payload);
    assert_eq!(r.audio.sample_rate().await.get(), 16_000);
    assert_eq!(r.transport.reconfigure_count(), 0);
}

#[tokio::test]
async fn chunk_before_data_is_skipped() {
    let r = ready().await;
    let (canonical, payload) = wav(16_000, 1_000);
    let mut bytes = canonical[..36].to_vec();
    bytes.extend_from_slice(b"LIST");
    bytes.extend_from_slice(&6u32.to_le_bytes());
    bytes.extend_from_slice(b"INFOab");
    bytes.extend_from_slice(&canonical[36..]);
    let riff = (bytes.len() - 8) as u32;
    bytes[4..8].copy_from_slice(&riff.to_le_bytes());
    r.storage.insert("/list.wav", bytes);

    let report = r.audio.play_file("/list.wav").await.unwrap();
    assert_eq!(report.bytes_written, 1_000);
    assert_eq!(r.transport.written(), payload);
}

#[tokio::test]
async fn file_without_data_chunk_is_rejected() {
    let r = ready().await;
    let (canonical, _) = wav(16_000, 0);
    let mut bytes = canonical;
    bytes[36..40].copy_from_slice(b"LIST");
    r.storage.insert("/nodata.wav", bytes);

    assert_eq!(
        r.audio.play_file("/nodata.wav").await.unwrap_err(),
        AudioError::InvalidFormat(FormatError::MissingDataChunk)
    );
    assert_eq!(r.transport.write_count(), 0);
    assert_eq!(r.storage.open_handles(), 0);
}

#[tokio::test]
async fn bad_or_missing_files() {
    let r = ready().await;
    assert_eq!(
        r.audio.play_file("/missing.wav").await.unwrap_err(),
        AudioError::IoFailure
    );
    r.storage.insert("/short.wav", b"RIFF\0\0\0\0WAVE".to_vec());
    assert_eq!(
        r.audio.play_file("/short.wav").await.unwrap_err(),
        AudioError::InvalidFormat(FormatError::TruncatedHeader)
    );
    let mut ogg = wav(16_000, 16).0;
    ogg[..4].copy_from_slice(b"OggS");
    r.storage.insert("/x.ogg", ogg);
    assert_eq!(
        r.audio.play_file("/x.ogg").await.unwrap_err(),
        AudioError::InvalidFormat(FormatError::BadMagic)
    );
    assert_eq!(r.storage.open_handles(), 0);
}

// ── record_to_file ──────────────────────────────────────────────────────────

#[tokio::test]
async fn recording_round_trips_through_playback() {
    let r = ready().await;
    let report = r.audio.record_to_file("/rec.wav", 200).await.unwrap();
    assert_eq!(r.codec.mic_gain(), Some(MicGain::Db18));

    let bytes = r.storage.contents("/rec.wav").unwrap();
    let header = WavHeader::decode(bytes[..44].try_into().unwrap()).unwrap();
    assert_eq!(header.sample_rate, 16_000);
    assert_eq!(header.byte_rate, 64_000);
    assert_eq!(u64::from(header.data_size), report.bytes_captured);
    assert_eq!(bytes.len(), 44 + header.data_size as usize);
    assert!(header.data_size.abs_diff(12_800) <= 1_024, "{}", header.data_size);

    let played = r.audio.play_file("/rec.wav").await.unwrap();
    assert_eq!(played.bytes_written, u64::from(header.data_size));
    assert_eq!(r.storage.open_handles(), 0);
}

#[tokio::test]
async fn recording_header_carries_active_rate() {
    let r = ready().await;
    r.audio.set_sample_rate(8_000).await.unwrap();
    r.audio.record_to_file("/low.wav", 100).await.unwrap();

    let bytes = r.storage.contents("/low.wav").unwrap();
    let header = WavHeader::decode(bytes[..44].try_into().unwrap()).unwrap();
    assert_eq!(header.sample_rate, 8_000);
    assert_eq!(header.byte_rate, 32_000);
}

#[tokio::test]
async fn recording_continues_without_mic_gain() {
    let r = ready().await;
    r.codec.fail(CodecFault::SetMicGain);
    let report = r.audio.record_to_file("/rec.wav", 50).await.unwrap();
    assert!(report.bytes_captured > 0);
}

#[tokio::test]
async fn recording_create_failure_is_io_failure() {
    let r = ready().await;
    r.storage.fail(StorageFault::Create);
    assert_eq!(
        r.audio.record_to_file("/rec.wav", 50).await.unwrap_err(),
        AudioError::IoFailure
    );
    assert!(r.codec.calls().is_empty());
}
