mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::ledger::{SetStatusArgs, SummaryArgs};
use commands::prepayment::PrepayArgs;
use commands::schedule::ScheduleArgs;

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Cooperative loan schedules and prepayment recalculation
#[derive(Parser)]
#[command(
    name = "coopbook",
    version,
    about = "Cooperative loan schedules and prepayment recalculation",
    long_about = "Generates reducing-balance EMI schedules, tracks installment status, \
                  and re-amortizes the remaining schedule after a lump-sum prepayment \
                  (reduce tenure or reduce EMI). Reads JSON from --input files or stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a repayment schedule from loan terms
    Schedule(ScheduleArgs),
    /// Apply a lump-sum prepayment to a loan and re-amortize its tail
    Prepay(PrepayArgs),
    /// Mark one installment Paid or Pending
    SetStatus(SetStatusArgs),
    /// Totals, pending counts and the next due installment of a schedule
    Summary(SummaryArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("coopbook_core={default_level},coopbook={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let result: CliResult<serde_json::Value> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Prepay(args) => commands::prepayment::run_prepay(args),
        Commands::SetStatus(args) => commands::ledger::run_set_status(args),
        Commands::Summary(args) => commands::ledger::run_summary(args),
        Commands::Version => {
            println!("coopbook {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
