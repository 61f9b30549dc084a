use clap::{Parser, Subcommand};
use fxdoc::{
    commands::{generate, inspect},
    GlobalOpts,
};
use fxdoc_logger as logger;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fxdoc")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Reference documentation generator for CFX resources",
    long_about = "fxdoc statically analyzes a resource directory (fxmanifest.lua plus Lua scripts) and generates reference documentation for its declared network events, callbacks, commands, and exports."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a summary of a resource's manifest and declarations
    Inspect {
        /// Path to the resource directory ('.' for the current directory)
        path: PathBuf,
        /// Print the full analysis as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Generate the documentation tree for a resource
    Generate {
        /// Path to the resource directory ('.' for the current directory)
        path: PathBuf,
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_with_verbosity(cli.global.verbosity_level()) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    match cli.command {
        Commands::Inspect { path, json } => {
            if let Err(e) = inspect::handle_inspect(&path, json, &cli.global) {
                logger::error(&format!("{e}"));
                std::process::exit(1);
            }
        }
        Commands::Generate { path, output } => {
            if let Err(e) = generate::handle_generate(&path, &output, &cli.global) {
                logger::error(&format!("{e}"));
                std::process::exit(1);
            }
        }
    }
}
