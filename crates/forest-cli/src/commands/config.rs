//! Config command implementation.

use anyhow::Result;
use console::style;

use forest_adapter_qvm::config::config_file_path;

/// Execute the config command.
pub fn execute() -> Result<()> {
    let config = forest_adapter_qvm::current_config()?;

    println!("{} Configuration:\n", style("Forest").cyan().bold());
    println!("  Endpoint: {}", style(&config.endpoint).yellow());
    println!(
        "  API key:  {}",
        if config.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
            style("set").green()
        } else {
            style("not set").red()
        }
    );
    println!("  Timeout:  {} s", config.timeout_seconds);

    match config_file_path() {
        Some(path) if path.exists() => println!("  File:     {}", path.display()),
        Some(path) => println!("  File:     {} {}", path.display(), style("(absent)").dim()),
        None => println!("  File:     {}", style("(no home directory)").dim()),
    }
    Ok(())
}
