//! xtask wav-info - print the canonical header and the located data chunk.
//!
//! Reads through the same `pcm-stream` reader the firmware uses, so a file
//! that plays on the board prints cleanly here and vice versa.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use pcm_stream::{StreamError, WavHeader, WavReader};
use platform::storage_local::LocalFileStorage;
use platform::Storage;

pub fn run(path: &Path) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("invalid file name: {}", path.display()))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("Failed to start runtime")?;
    let info = runtime.block_on(inspect(LocalFileStorage::new(dir), name))?;

    println!();
    println!("{}", path.display().to_string().cyan().bold());
    print!("{}", render(&info));
    println!();
    Ok(())
}

/// What the reader found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WavInfo {
    pub header: WavHeader,
    pub payload_offset: u64,
    pub payload_len: u64,
}

pub(crate) async fn inspect(mut storage: LocalFileStorage, name: &str) -> Result<WavInfo> {
    let file = storage
        .open_file(name)
        .await
        .with_context(|| format!("Failed to open {name}"))?;
    let reader = WavReader::open(file).await.map_err(describe)?;
    let header = *reader.header();
    let payload = reader.into_payload().await.map_err(describe)?;
    Ok(WavInfo {
        header,
        payload_offset: payload.offset(),
        payload_len: payload.len(),
    })
}

#[allow(clippy::use_debug)] // storage errors only implement Debug
fn describe<E: std::fmt::Debug>(e: StreamError<E>) -> anyhow::Error {
    match e {
        StreamError::Io(io) => anyhow!("read failed: {io:?}"),
        StreamError::Format(f) => anyhow!("{f}"),
        StreamError::WriteZero => anyhow!("write accepted zero bytes"),
        StreamError::ResourceExhaustion => anyhow!("out of memory"),
    }
}

pub(crate) fn render(info: &WavInfo) -> String {
    let h = &info.header;
    let frame = u64::from(h.block_align.max(1));
    let frames = info.payload_len.checked_div(frame).unwrap_or(0);
    let millis = frames
        .saturating_mul(1000)
        .checked_div(u64::from(h.sample_rate))
        .unwrap_or(0);
    let mut out = String::new();
    out.push_str(&format!("  format        {}\n", h.audio_format));
    out.push_str(&format!("  channels      {}\n", h.channels));
    out.push_str(&format!("  sample rate   {} Hz\n", h.sample_rate));
    out.push_str(&format!("  bits          {}\n", h.bits_per_sample));
    out.push_str(&format!("  byte rate     {}\n", h.byte_rate));
    out.push_str(&format!(
        "  data chunk    {} bytes at offset {}\n",
        info.payload_len, info.payload_offset
    ));
    out.push_str(&format!("  duration      {millis} ms ({frames} frames)\n"));
    if u64::from(h.data_size) != info.payload_len {
        out.push_str(&format!(
            "  note          header data size {} differs\n",
            h.data_size
        ));
    }
    out
}
