//! xtask demo - drive the audio subsystem end to end on the host.
//!
//! Mock transport and codec, real files: the recording lands in `root` and
//! can be inspected with `xtask wav-info` or any audio player.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use firmware::{AudioError, AudioSubsystem, MockCodec, SubsystemConfig};
use platform::mocks::MockTransport;
use platform::storage_local::LocalFileStorage;

const CAPTURE_NAME: &str = "demo-capture.wav";

pub fn run(root: Option<PathBuf>, record_ms: u32, rate: u32) -> Result<()> {
    let root = root
        .or_else(|| std::env::var_os("AUDIO_ROOT").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&root)
        .with_context(|| format!("Failed to create {}", root.display()))?;

    println!();
    println!("{}", platform::config::dev_banner().cyan().bold());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("Failed to start runtime")?;
    let summary = runtime.block_on(session(root.clone(), record_ms, rate))?;

    println!();
    println!("{}", "✓ Demo finished".green().bold());
    println!("   tone bytes      {}", summary.tone_bytes);
    println!("   captured bytes  {}", summary.captured);
    println!("   played bytes    {}", summary.played);
    println!("   codec calls     {}", summary.codec_calls);
    println!(
        "   {}",
        format!("Recording: {}", root.join(CAPTURE_NAME).display()).dimmed()
    );
    println!();
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Summary {
    pub tone_bytes: usize,
    pub captured: u64,
    pub played: u64,
    pub codec_calls: usize,
}

fn audio_err(op: &str) -> impl FnOnce(AudioError) -> anyhow::Error + '_ {
    move |e| anyhow!("{op}: {e}")
}

pub(crate) async fn session(root: PathBuf, record_ms: u32, rate: u32) -> Result<Summary> {
    let transport = MockTransport::new();
    let codec = MockCodec::new();
    let audio = AudioSubsystem::<NoopRawMutex, _, _, _>::new(
        transport.clone(),
        codec.clone(),
        LocalFileStorage::new(root),
        SubsystemConfig::default(),
    );

    audio.initialize().await.map_err(audio_err("initialize"))?;

    audio.play_tone(440, 250).await.map_err(audio_err("tone"))?;
    let tone_bytes = transport.written().len();

    audio
        .set_sample_rate(rate)
        .await
        .map_err(audio_err("set_sample_rate"))?;
    let captured = audio
        .record_to_file(CAPTURE_NAME, record_ms)
        .await
        .map_err(audio_err("record"))?;
    let played = audio
        .play_file(CAPTURE_NAME)
        .await
        .map_err(audio_err("play"))?;
    tracing::info!(stop = played.stop.as_str(), "playback ended");

    Ok(Summary {
        tone_bytes,
        captured: captured.bytes_captured,
        played: played.bytes_written,
        codec_calls: codec.calls().len(),
    })
}
