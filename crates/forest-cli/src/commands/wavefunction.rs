//! Wavefunction command implementation.

use anyhow::Result;
use console::style;
use serde_json::json;

use forest_adapter_qvm::PaddingPolicy;
use forest_wire::{MemoryBits, Wavefunction};

use super::common::{
    OutputFormat, ProgramSource, bar, bit_string, connect, load_program, spinner,
};

/// Basis states with a lower probability are left out of the table.
const MIN_PROBABILITY: f64 = 1e-10;

/// Execute the wavefunction command.
pub async fn execute(
    source: &ProgramSource,
    addresses: &[u64],
    strict_padding: bool,
    format: OutputFormat,
) -> Result<()> {
    let program = load_program(source)?;
    let padding = if strict_padding {
        PaddingPolicy::RequireZero
    } else {
        PaddingPolicy::Ignore
    };
    let qvm = connect()?.with_padding_policy(padding);

    if format == OutputFormat::Table {
        println!(
            "{} Simulating {} instructions on {}",
            style("→").cyan().bold(),
            program.len(),
            style(&qvm.config().endpoint).yellow()
        );
    }

    let pb = spinner("Waiting for QVM...");
    let reply = qvm.wavefunction(&program, addresses).await;
    pb.finish_and_clear();
    let (wavefunction, memory) = reply?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&to_json(&wavefunction, &memory))?
        ),
        OutputFormat::Table => print_wavefunction(&wavefunction, &memory),
    }
    Ok(())
}

/// JSON form: amplitudes as `[re, im]` pairs plus the memory bits.
pub fn to_json(wavefunction: &Wavefunction, memory: &MemoryBits) -> serde_json::Value {
    let amplitudes: Vec<[f64; 2]> = wavefunction
        .amplitudes()
        .iter()
        .map(|a| [a.re, a.im])
        .collect();
    json!({
        "amplitudes": amplitudes,
        "memory": memory,
    })
}

fn print_wavefunction(wavefunction: &Wavefunction, memory: &MemoryBits) {
    println!(
        "\n{} Wavefunction ({} amplitudes):",
        style("✓").green().bold(),
        wavefunction.len()
    );
    println!("  {}", wavefunction);

    if !wavefunction.is_empty() {
        let width = wavefunction
            .num_qubits()
            .map_or(1, |n| n.max(1) as usize);
        println!();
        for (index, prob) in wavefunction.probabilities().into_iter().enumerate() {
            if prob < MIN_PROBABILITY {
                continue;
            }
            println!(
                "  |{}>: {:>7.4} {}",
                style(format!("{index:0width$b}")).cyan(),
                prob,
                style(bar(prob)).green()
            );
        }
    }

    if !memory.is_empty() {
        println!("\n  Memory: {}", style(bit_string(memory)).yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_to_json() {
        let wf = Wavefunction::new(vec![Complex64::new(0.0, 1.0), Complex64::new(0.5, -0.5)]);
        let value = to_json(&wf, &vec![1, 0]);
        assert_eq!(
            value,
            json!({
                "amplitudes": [[0.0, 1.0], [0.5, -0.5]],
                "memory": [1, 0],
            })
        );
    }

    #[test]
    fn test_to_json_empty() {
        let value = to_json(&Wavefunction::new(vec![]), &vec![]);
        assert_eq!(value, json!({ "amplitudes": [], "memory": [] }));
    }
}
