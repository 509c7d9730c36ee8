//! Forest Command-Line Interface
//!
//! Submit Quil programs to the QVM from the shell.
//!
//! ```text
//! forest ping
//! forest run -e "X 0" -e "MEASURE 0 [0]" -a 0 -t 10
//! forest wavefunction -i bell.quil -a 0,1
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::{OutputFormat, ProgramSource};
use commands::{config, ping, run, version, wavefunction};

/// Forest - a command-line client for the Rigetti QVM
#[derive(Parser)]
#[command(name = "forest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// QVM endpoint URL
    #[arg(long, env = "FOREST_ENDPOINT", global = true)]
    endpoint: Option<String>,

    /// QVM API key
    #[arg(long, env = "FOREST_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the QVM is reachable
    Ping,

    /// Show client and QVM versions
    Version,

    /// Run a program repeatedly and print sampled memory bits
    Run {
        #[command(flatten)]
        source: ProgramSource,

        /// Classical addresses to read back (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        addresses: Vec<u64>,

        /// Number of trials
        #[arg(short, long, default_value = "1")]
        trials: u32,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Run a program once and print the final wavefunction
    Wavefunction {
        #[command(flatten)]
        source: ProgramSource,

        /// Classical addresses to read back (comma separated)
        #[arg(short, long, value_delimiter = ',')]
        addresses: Vec<u64>,

        /// Reject responses whose memory padding bits are not zero
        #[arg(long)]
        strict_padding: bool,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the resolved client configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    if let Some(endpoint) = cli.endpoint {
        forest_adapter_qvm::set_endpoint(endpoint);
    }
    if let Some(key) = cli.api_key {
        forest_adapter_qvm::set_api_key(key);
    }

    // Execute command
    let result = match cli.command {
        Commands::Ping => ping::execute().await,

        Commands::Version => version::execute().await,

        Commands::Run {
            source,
            addresses,
            trials,
            format,
        } => run::execute(&source, &addresses, trials, format).await,

        Commands::Wavefunction {
            source,
            addresses,
            strict_padding,
            format,
        } => wavefunction::execute(&source, &addresses, strict_padding, format).await,

        Commands::Config => config::execute(),
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
