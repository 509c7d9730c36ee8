//! Version command implementation.

use anyhow::Result;
use console::style;

use super::common::connect;

/// Execute the version command.
pub async fn execute() -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - command-line client for the Rigetti QVM",
        style("Forest").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  forest-wire         Wavefunction response codec");
    println!("  forest-quil         Quil program builder");
    println!("  forest-adapter-qvm  QVM REST client");
    println!("  forest-cli          Command-line interface");
    println!();

    let remote = match connect() {
        Ok(qvm) => qvm.version().await.map_err(anyhow::Error::from),
        Err(e) => Err(e),
    };
    match remote {
        Ok(v) => println!("QVM:        {}", style(v).green()),
        Err(e) => println!("QVM:        {} ({e})", style("unavailable").dim()),
    }
    Ok(())
}
