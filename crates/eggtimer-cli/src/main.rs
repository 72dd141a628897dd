use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod terminal;

use commands::countdown::Target;

#[derive(Parser)]
#[command(name = "eggtimer", version, about = "Egg timer CLI")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count down from a preset (soft, medium, hard) or MM:SS
    Start {
        /// Preset name or duration
        target: String,
    },
    /// Count down from a minutes/seconds picker selection
    Custom {
        /// Minutes (0-59)
        #[arg(short, long, default_value = "0")]
        minutes: u32,
        /// Seconds (0-59)
        #[arg(short, long, default_value = "0")]
        seconds: u32,
    },
    /// List the built-in presets
    Presets {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Render a number of seconds as MM:SS
    Format {
        seconds: u64,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("eggtimer={level},eggtimer_core={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Start { target } => Target::parse(&target).and_then(commands::countdown::run),
        Commands::Custom { minutes, seconds } => {
            commands::countdown::run(Target::Picker { minutes, seconds })
        }
        Commands::Presets { json } => commands::presets::run(json),
        Commands::Format { seconds } => commands::presets::format(seconds),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
