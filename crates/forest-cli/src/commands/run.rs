//! Run command implementation.

use std::collections::BTreeMap;

use anyhow::Result;
use console::style;

use super::common::{
    OutputFormat, ProgramSource, bar, bit_string, connect, load_program, spinner,
};

/// Outcomes shown in the histogram before the rest is summarized.
const MAX_OUTCOMES: usize = 16;

/// Execute the run command.
pub async fn execute(
    source: &ProgramSource,
    addresses: &[u64],
    trials: u32,
    format: OutputFormat,
) -> Result<()> {
    let program = load_program(source)?;
    let qvm = connect()?;

    if format == OutputFormat::Table {
        println!(
            "{} Running {} instructions on {} ({} trials)",
            style("→").cyan().bold(),
            program.len(),
            style(&qvm.config().endpoint).yellow(),
            trials
        );
    }

    let pb = spinner("Waiting for QVM...");
    let rows = qvm.run(&program, addresses, trials).await;
    pb.finish_and_clear();
    let rows = rows?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Table => print_samples(&rows, addresses),
    }
    Ok(())
}

/// Count how often each bitstring occurs, most frequent first.
///
/// Ties are ordered by bitstring.
pub fn tally(rows: &[Vec<u8>]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(bit_string(row)).or_default() += 1;
    }

    let mut sorted: Vec<_> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

fn print_samples(rows: &[Vec<u8>], addresses: &[u64]) {
    println!(
        "\n{} Results ({} trials):",
        style("✓").green().bold(),
        rows.len()
    );

    if addresses.is_empty() {
        println!("  No addresses requested");
        return;
    }

    let header: Vec<String> = addresses.iter().map(|a| format!("[{a}]")).collect();
    println!("  Addresses: {}", style(header.join(" ")).dim());

    let sorted = tally(rows);
    let total = rows.len() as f64;

    for (bitstring, count) in sorted.iter().take(MAX_OUTCOMES) {
        let prob = *count as f64 / total;
        println!(
            "  {}: {:>6} ({:>6.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob * 100.0,
            style(bar(prob)).green()
        );
    }

    if sorted.len() > MAX_OUTCOMES {
        println!("  ... and {} more outcomes", sorted.len() - MAX_OUTCOMES);
    }
}
