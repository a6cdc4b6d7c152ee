// Desktop/tooling crate - unwrap/expect/panic acceptable in non-embedded code.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod check;
mod demo;
mod wav_info;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "ES8311 audio firmware development tasks", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check host and no_std builds, clippy and formatting
    Check,
    /// Run all tests (unit, integration, doc)
    Test {
        /// Run only unit tests
        #[arg(long)]
        unit: bool,
        /// Run only integration tests
        #[arg(long)]
        integration: bool,
    },
    /// Print the header and data chunk of a WAV file
    WavInfo {
        /// File to inspect
        path: PathBuf,
    },
    /// Run the audio subsystem on host mocks: tone, record, play back
    Demo {
        /// Directory for the recording (defaults to $AUDIO_ROOT, then the
        /// current directory)
        #[arg(long)]
        root: Option<PathBuf>,
        /// Recording length in milliseconds
        #[arg(long, default_value_t = 500)]
        record_ms: u32,
        /// Rate to switch to before recording
        #[arg(long, default_value_t = 16_000)]
        rate: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => check::run(),
        Commands::Test { unit, integration } => test::run(unit, integration),
        Commands::WavInfo { path } => {
            init_tracing();
            wav_info::run(&path)
        }
        Commands::Demo {
            root,
            record_ms,
            rate,
        } => {
            init_tracing();
            demo::run(root, record_ms, rate)
        }
    }
}

/// `RUST_LOG` filtering, `info` when unset.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
