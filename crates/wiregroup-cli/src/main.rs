//! WireGroup CLI
//!
//! Command-line interface for the protocol version grouping pipeline

use clap::{Parser, Subcommand};
use wiregroup_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "wiregroup")]
#[command(about = "WireGroup - Group protocol versions into shared implementations", long_about = None)]
struct Cli {
    /// Logging profile: `dev` (human readable) or `prod` (JSON)
    #[arg(long, global = true, default_value = "dev")]
    log: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the manifest and generate missing artifacts
    Run(commands::run::RunArgs),
    /// Fail if the manifest on disk is out of date
    Check(commands::check::CheckArgs),
    /// List packets in the corpus that no slot tracks
    Untracked(commands::untracked::UntrackedArgs),
}

fn main() {
    let cli = Cli::parse();

    let Some(profile) = Profile::parse(&cli.log) else {
        eprintln!("Error: unknown logging profile {:?} (expected dev or prod)", cli.log);
        std::process::exit(2);
    };
    init(profile);

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Check(args) => commands::check::execute(args),
        Commands::Untracked(args) => commands::untracked::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
