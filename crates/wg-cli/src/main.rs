//! CLI frontend for the Wildgrove exploration loop.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "wg",
    about = "Wildgrove: explore a content pack with an adaptive AI Director",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON content pack
    Check {
        /// Path to the content pack
        pack: PathBuf,
    },

    /// Explore a content pack interactively
    Play {
        /// Path to the content pack
        pack: PathBuf,

        /// Starting location
        #[arg(short, long, default_value = "garden")]
        location: String,

        /// Starting biome
        #[arg(short, long)]
        biome: Option<String>,

        /// TOML exploration config
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run an automatic exploration with seeded choices
    Simulate {
        /// Path to the content pack
        pack: PathBuf,

        /// Number of explore steps
        #[arg(short = 'n', long, default_value = "20")]
        steps: u32,

        /// RNG seed for option picks
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Starting location
        #[arg(short, long, default_value = "garden")]
        location: String,

        /// Starting biome
        #[arg(short, long)]
        biome: Option<String>,

        /// TOML exploration config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the exploration log here (markdown for .md, text otherwise)
        #[arg(short = 'o', long)]
        export: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Check { pack } => commands::check::run(&pack),
        Commands::Play {
            pack,
            location,
            biome,
            config,
        } => commands::play::run(&pack, &location, biome.as_deref(), config.as_deref()),
        Commands::Simulate {
            pack,
            steps,
            seed,
            location,
            biome,
            config,
            export,
        } => commands::simulate::run(
            &pack,
            steps,
            seed,
            &location,
            biome.as_deref(),
            config.as_deref(),
            export.as_deref(),
        ),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
