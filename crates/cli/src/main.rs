use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use ballot_cli::commands::{inspect, tally, timeline, verify};

#[derive(Parser)]
#[command(name = "ballot")]
#[command(about = "Ballot Ledger Forensic CLI - offline audit of an election event log", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the log header, event counts and per-election heights
    Inspect {
        log_path: PathBuf,
    },
    /// Replay the log and verify every hash chain
    Verify {
        log_path: PathBuf,
    },
    /// List events in commit order
    Timeline {
        log_path: PathBuf,

        /// Show at most this many events
        #[arg(long, short)]
        limit: Option<usize>,
    },
    /// Recompute the results of one election
    Tally {
        log_path: PathBuf,

        #[arg(long, short)]
        election: u64,

        /// Print the tally as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Inspect { log_path } => inspect::run(&log_path),
        Commands::Verify { log_path } => verify::run(&log_path),
        Commands::Timeline { log_path, limit } => timeline::run(&log_path, limit),
        Commands::Tally { log_path, election, json } => tally::run(&log_path, election, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
