//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use forest_adapter_qvm::QvmConnection;
use forest_quil::Program;

/// Where the program text comes from.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ProgramSource {
    /// Quil source file
    #[arg(short, long)]
    pub input: Option<String>,

    /// Inline instruction (repeatable)
    #[arg(short = 'e', long = "exec")]
    pub exec: Vec<String>,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Build the program from a file or from inline instructions.
pub fn load_program(source: &ProgramSource) -> Result<Program> {
    match &source.input {
        Some(path) => load_program_file(path),
        None => Ok(source.exec.iter().map(String::as_str).collect()),
    }
}

/// Load a Quil program from a file.
pub fn load_program_file(path: &str) -> Result<Program> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    let program: Program = Program::from(source.as_str());
    if program.is_empty() {
        anyhow::bail!("No instructions in {path}");
    }
    debug!("Loaded {} instructions from {path}", program.len());
    Ok(program)
}

/// Connect with the process-wide configuration.
pub fn connect() -> Result<QvmConnection> {
    QvmConnection::new().context("Failed to configure QVM connection")
}

/// Spinner shown while waiting on the QVM.
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Render a row of bits as a compact string, e.g. `[1, 0, 1]` → `101`.
pub fn bit_string(bits: &[u8]) -> String {
    bits.iter().map(|b| if *b == 0 { '0' } else { '1' }).collect()
}

/// Histogram bar for a probability in `[0, 1]`, one block per 2%.
pub fn bar(probability: f64) -> String {
    let len = (probability * 50.0).round().clamp(0.0, 50.0) as usize;
    "█".repeat(len)
}
