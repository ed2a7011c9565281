//! Inspect the container registries configuration for this process.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print results as a JSON array
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the resolved registries.conf path (empty for the built-in default)
    ConfPath,

    /// List search registries
    Search,

    /// List insecure registries
    Insecure,

    /// Print the registry domain of an image reference
    Domain {
        /// Image reference, or a bare registry ending in `/`
        image: String,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let lines = match cli.command {
        Command::ConfPath => vec![registries::system_registries_conf_path()],
        Command::Search => registries::get_registries()?,
        Command::Insecure => registries::get_insecure_registries()?,
        Command::Domain { image } => vec![registries::get_registry(&image)?],
    };

    if cli.json {
        println!("{}", serde_json::to_string(&lines)?);
    } else {
        for line in lines {
            println!("{line}");
        }
    }

    Ok(())
}
