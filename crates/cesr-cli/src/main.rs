//! cesr CLI - Split CESR streams into events and validate ACDC credentials.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod output;

use commands::validate::SchemaArgs;
use commands::{dump, validate};
use input::InputArgs;

#[derive(Parser)]
#[command(name = "cesr", version)]
#[command(about = "Split CESR streams into their JSON events and validate ACDC credentials")]
#[command(after_help = "Examples:
  cesr dump -p file.cesr
  cesr dump-credentials \"<cesr-content>\"
  cat file.cesr | cesr validate-credentials --schema-dir schema/acdc")]
struct Cli {
    /// Log debug details to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pretty-print every event from a CESR stream
    Dump {
        #[command(flatten)]
        input: InputArgs,
        /// Output one JSON event per line
        #[arg(long)]
        json: bool,
    },
    /// Pretty-print only ACDC credential bodies
    DumpCredentials {
        #[command(flatten)]
        input: InputArgs,
        /// Output one JSON event per line
        #[arg(long)]
        json: bool,
    },
    /// Validate credential events in a CESR stream
    ValidateCredentials {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        schemas: SchemaArgs,
    },
    /// Validate credentials from a JSON array of parsed events
    ValidateParsed {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        schemas: SchemaArgs,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Dump { input, json } => dump::run(&input, false, json),
        Commands::DumpCredentials { input, json } => dump::run(&input, true, json),
        Commands::ValidateCredentials { input, schemas } => validate::run(&input, &schemas),
        Commands::ValidateParsed { input, schemas } => validate::run_parsed(&input, &schemas),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
