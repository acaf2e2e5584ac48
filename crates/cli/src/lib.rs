pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "workforce",
    about = "Workforce assistant operator CLI",
    long_about = "Inspect configuration, check readiness, and run intent dispatch against the workforce backend.",
    after_help = "Examples:\n  workforce doctor --json\n  workforce config\n  workforce dispatch --intent numCustomers --app-id T024BE7LD"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, workspace readiness, and engine credential checks")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Fetch and render one intent's backend answer for a tenant")]
    Dispatch {
        #[arg(long, help = "Intent name, e.g. numCustomers")]
        intent: String,
        #[arg(long = "app-id", help = "Tenant identifier sent in the tenant header")]
        app_id: String,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
        Command::Dispatch { intent, app_id } => commands::dispatch::run(&intent, &app_id),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
