//! Playback and capture loops driven against the platform mocks.
#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::cast_possible_truncation
)]

use embassy_time::Duration;
use pcm_stream::{
    capture_into, stream_payload, CaptureOptions, CaptureStop, PlaybackOptions, PlaybackStop,
    WavHeader, WavReader, WavWriter,
};
use platform::mocks::{MockStorage, MockTransport, StorageFault, TransportFault};
use platform::{AudioTransport, Direction, I2sAudioConfig, SampleRateHz, Storage};

fn wav_bytes(rate: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = WavHeader::pcm16_stereo(rate, payload.len() as u32)
        .unwrap()
        .encode()
        .to_vec();
    out.extend_from_slice(payload);
    out
}

async fn transport(direction: Direction) -> MockTransport {
    let mut t = MockTransport::new();
    t.open(I2sAudioConfig::es8311(SampleRateHz::KHZ_16)).await.unwrap();
    t.enable(direction).await.unwrap();
    t
}

#[tokio::test]
async fn playback_writes_whole_chunks_then_remainder() {
    let payload: Vec<u8> = (0..2500u32).map(|i| i as u8).collect();
    let storage = MockStorage::new();
    storage.insert("a.wav", wav_bytes(16_000, &payload));
    let mut t = transport(Direction::Tx).await;

    let file = storage.clone().open_file("a.wav").await.unwrap();
    let mut p = WavReader::open(file).await.unwrap().into_payload().await.unwrap();
    let report = stream_payload(&mut p, &mut t, PlaybackOptions::default()).await.unwrap();

    assert_eq!(report.stop, PlaybackStop::Completed);
    assert_eq!(report.bytes_written, 2500);
    assert_eq!(report.writes, 3);
    assert_eq!(t.written(), payload);
    assert_eq!(
        t.calls()
            .iter()
            .filter_map(|c| match c {
                platform::mocks::TransportCall::Write(n) => Some(*n),
                _ => None,
            })
            .collect::<Vec<_>>(),
        vec![1024, 1024, 452]
    );
}

#[tokio::test]
async fn playback_stops_at_end_of_file() {
    let mut bytes = WavHeader::pcm16_stereo(16_000, 4096).unwrap().encode().to_vec();
    bytes.extend_from_slice(&[7u8; 1000]);
    let storage = MockStorage::new();
    storage.insert("short.wav", bytes);
    let mut t = transport(Direction::Tx).await;

    let file = storage.clone().open_file("short.wav").await.unwrap();
    let mut p = WavReader::open(file).await.unwrap().into_payload().await.unwrap();
    let report = stream_payload(&mut p, &mut t, PlaybackOptions::default()).await.unwrap();

    assert_eq!(report.stop, PlaybackStop::EndOfFile);
    assert_eq!(report.bytes_written, 1000);
}

#[tokio::test]
async fn stalled_write_is_bounded_by_timeout() {
    let storage = MockStorage::new();
    storage.insert("a.wav", wav_bytes(16_000, &[0u8; 4096]));
    let mut t = transport(Direction::Tx).await;
    t.fail(TransportFault::StallWrite);

    let file = storage.clone().open_file("a.wav").await.unwrap();
    let mut p = WavReader::open(file).await.unwrap().into_payload().await.unwrap();
    let options = PlaybackOptions {
        write_timeout: Duration::from_millis(20),
        ..PlaybackOptions::default()
    };
    let report = stream_payload(&mut p, &mut t, options).await.unwrap();

    assert_eq!(report.stop, PlaybackStop::WriteTimedOut);
    assert_eq!(report.bytes_written, 0);
}

#[tokio::test]
async fn failed_write_ends_stream() {
    let storage = MockStorage::new();
    storage.insert("a.wav", wav_bytes(16_000, &[0u8; 4096]));
    let mut t = transport(Direction::Tx).await;
    t.fail(TransportFault::Write);

    let file = storage.clone().open_file("a.wav").await.unwrap();
    let mut p = WavReader::open(file).await.unwrap().into_payload().await.unwrap();
    let report = stream_payload(&mut p, &mut t, PlaybackOptions::default()).await.unwrap();
    assert_eq!(report.stop, PlaybackStop::WriteFailed);
    assert_eq!(report.writes, 0);
}

#[tokio::test]
async fn capture_length_tracks_duration() {
    let storage = MockStorage::new();
    let mut t = transport(Direction::Rx).await;

    let file = storage.clone().create_file("rec.wav").await.unwrap();
    let mut w = WavWriter::create(file).await.unwrap();
    let expected = u64::from(SampleRateHz::KHZ_16.stereo16_byte_rate()) / 5;
    let report = capture_into(&mut t, &mut w, CaptureOptions::for_millis(200), expected)
        .await
        .unwrap();
    assert_eq!(report.stop, CaptureStop::Deadline);
    assert!(
        report.bytes_captured.abs_diff(expected) <= 1024,
        "captured {} expected {}",
        report.bytes_captured,
        expected
    );
    w.finalize(16_000).await.unwrap();

    let bytes = storage.contents("rec.wav").unwrap();
    assert_eq!(bytes.len() as u64, 44 + report.bytes_captured);
    let r = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(r.spec().sample_rate, 16_000);
    assert_eq!(r.spec().channels, 2);
    assert_eq!(u64::from(r.len()) * 2, report.bytes_captured);
}

#[tokio::test]
async fn capture_disk_full_keeps_what_was_written() {
    let storage = MockStorage::new();
    storage.fail(StorageFault::DiskFull(44 + 2048));
    let mut t = transport(Direction::Rx).await;

    let file = storage.clone().create_file("rec.wav").await.unwrap();
    let mut w = WavWriter::create(file).await.unwrap();
    let report = capture_into(&mut t, &mut w, CaptureOptions::for_millis(1000), 64_000)
        .await
        .unwrap();
    assert_eq!(report.stop, CaptureStop::WriteFailed);
    assert!(report.bytes_captured <= 2048);
    assert_eq!(u64::from(w.payload_len()), report.bytes_captured);

    let header = w.finalize(16_000).await.unwrap();
    assert_eq!(u64::from(header.data_size), report.bytes_captured);
    let bytes = storage.contents("rec.wav").unwrap();
    let r = hound::WavReader::new(std::io::Cursor::new(bytes)).unwrap();
    assert_eq!(u64::from(r.len()) * 2, report.bytes_captured);
}

#[tokio::test]
async fn capture_survives_read_errors() {
    let storage = MockStorage::new();
    let mut t = transport(Direction::Rx).await;
    t.fail(TransportFault::Read);

    let file = storage.clone().create_file("rec.wav").await.unwrap();
    let mut w = WavWriter::create(file).await.unwrap();
    let report = capture_into(&mut t, &mut w, CaptureOptions::for_millis(30), 1920)
        .await
        .unwrap();
    assert_eq!(report.stop, CaptureStop::Deadline);
    assert_eq!(report.bytes_captured, 0);
    assert!(report.misses > 0);
}
