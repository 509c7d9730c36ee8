//! Ping command implementation.

use anyhow::Result;
use console::style;

use super::common::connect;

/// Execute the ping command.
pub async fn execute() -> Result<()> {
    let qvm = connect()?;
    println!(
        "{} Pinging {}",
        style("→").cyan().bold(),
        style(&qvm.config().endpoint).yellow()
    );

    let reply = qvm.ping().await?;
    println!("{} {}", style("✓").green().bold(), reply.trim());
    Ok(())
}
