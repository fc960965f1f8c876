mod advisor;
mod commands;
mod config;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::affordability::{ProfileArgs, ScheduleArgs, SensitivityArgs};
use commands::chat::ChatArgs;
use config::AppConfig;

/// KPR (home loan) affordability simulation and advisory chat
#[derive(Parser)]
#[command(
    name = "kpr",
    version,
    about = "KPR affordability simulation and advisory chat",
    long_about = "Estimate a home loan's monthly installment, debt service ratio and \
                  loan-to-value against bank policy limits, explore terms and down \
                  payments, and talk the result through with a banker persona."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter, e.g. `debug` or `kpr_core=debug` (overrides RUST_LOG and KPR_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate affordability against DSR and LTV limits
    Evaluate(ProfileArgs),
    /// Print the localized simulation summary
    Snapshot(ProfileArgs),
    /// Month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Term by down payment sensitivity grid
    Sensitivity(SensitivityArgs),
    /// Interactive advisory chat about the simulation
    Chat(ChatArgs),
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

fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("{}: {}", "error".red().bold(), err);
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    let (mut config, config_errors) = AppConfig::load();
    for e in &config_errors {
        eprintln!("{}: {}", "warning".yellow().bold(), e);
    }
    if let Some(level) = cli.log_level.clone() {
        config.telemetry.log_level = level;
        config.telemetry.from_flag = true;
    }
    if let Err(e) = telemetry::init(&config.telemetry) {
        fail(e);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Evaluate(args) => commands::affordability::run_evaluate(args),
        Commands::Snapshot(args) => commands::affordability::run_snapshot(args),
        Commands::Schedule(args) => commands::affordability::run_schedule(args),
        Commands::Sensitivity(args) => commands::affordability::run_sensitivity(args),
        Commands::Chat(args) => {
            if let Err(e) = commands::chat::run_chat(args, &config.advisor) {
                fail(e);
            }
            return;
        }
        Commands::Version => {
            println!("kpr {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => fail(e),
    }
}
