mod commands;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusty_forms::{employee, Config, StrategyKind};

#[derive(Parser)]
#[command(name = "rusty-forms")]
#[command(version, about = "rusty-forms CLI - declarative record validation", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = "rusty-forms.toml")]
    config: PathBuf,

    /// Log level, overrides [logging] level from the configuration
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an employee record read from a JSON file
    Validate {
        /// Path to the record (PascalCase keys)
        record: PathBuf,

        /// Strategy: model, object or property (TryValidate* names also accepted)
        #[arg(short, long, default_value = "object")]
        strategy: StrategyKind,

        /// Field to validate with the property strategy
        #[arg(short, long)]
        field: Option<String>,

        /// Print the error list as JSON
        #[arg(long)]
        json: bool,

        /// Extra model-level message appended when the record is invalid
        #[arg(long, value_name = "MESSAGE")]
        model_error: Option<String>,
    },

    /// Print the sample employee record as JSON
    Sample,

    /// Print the client validation attributes of a field
    Attrs {
        /// Field identifier, e.g. DepartmentCode
        field: String,

        /// Render an <input> tag instead of the attribute list
        #[arg(long)]
        html: bool,
    },
}

fn main() -> Result<ExitCode> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    logging::init(cli.log_level.as_deref().unwrap_or(&config.logging.level))?;

    let catalog = employee::catalog(&config.employee)
        .with_context(|| format!("Invalid employee rules in {:?}", cli.config))?;

    // Execute command
    match cli.command {
        Commands::Validate {
            record,
            strategy,
            field,
            json,
            model_error,
        } => commands::validate::execute(
            &catalog,
            &record,
            strategy,
            field.as_deref(),
            model_error.as_deref(),
            json,
        ),
        Commands::Sample => {
            commands::sample::execute()?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Attrs { field, html } => {
            commands::attrs::execute(&catalog, &field, html)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
