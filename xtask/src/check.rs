use anyhow::{Context, Result};
use colored::Colorize;
use std::process::{Command, Output};
use std::time::Instant;

/// ESP32-P4 HP core.
const EMBEDDED_TARGET: &str = "riscv32imafc-unknown-none-elf";

/// Whether a failed step aborts the run.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Severity {
    Fatal,
    Advisory,
}

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking workspace builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    step(
        "host build (std + tracing)",
        &["check", "-p", "firmware", "--features", "std,tracing"],
        Severity::Fatal,
    )?;

    // Library crates must stay no_std: nothing in them may pull in std.
    for krate in ["platform", "pcm-stream", "firmware"] {
        step(
            &format!("{krate} (no_std, {EMBEDDED_TARGET})"),
            &[
                "check",
                "-p",
                krate,
                "--target",
                EMBEDDED_TARGET,
                "--no-default-features",
                "--features",
                "defmt",
            ],
            Severity::Fatal,
        )?;
    }

    step(
        "clippy lints",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        Severity::Advisory,
    )?;

    let fmt_ok = step(
        "code formatting",
        &["fmt", "--all", "--check"],
        Severity::Advisory,
    )?;
    if !fmt_ok {
        eprintln!("     Run 'cargo fmt --all' to fix");
    }
    println!();

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

/// Run one `cargo` invocation and report it. Returns whether it passed.
fn step(label: &str, args: &[&str], severity: Severity) -> Result<bool> {
    println!("{}", format!("  Checking {label}...").cyan());
    let start = Instant::now();

    let output: Output = Command::new("cargo")
        .args(args)
        .output()
        .with_context(|| format!("Failed to run cargo for {label}"))?;

    if output.status.success() {
        println!(
            "{}",
            format!("  ✓ {label} passed in {:.2}s", start.elapsed().as_secs_f64()).green()
        );
        return Ok(true);
    }

    match severity {
        Severity::Fatal => {
            eprintln!("{}", format!("  ✗ {label} failed").red().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            anyhow::bail!("{label} failed");
        }
        Severity::Advisory => {
            eprintln!("{}", format!("  ⚠ {label} reported problems").yellow().bold());
            eprintln!();
            eprintln!("{}", String::from_utf8_lossy(&output.stderr));
            Ok(false)
        }
    }
}
