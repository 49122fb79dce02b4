use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use rusty_forms::employee::Employee;
use rusty_forms::{RuleCatalog, Strategy, StrategyKind, ValidationErrors, Validator};
use tracing::info;

pub fn execute(
    catalog: &RuleCatalog,
    path: &Path,
    kind: StrategyKind,
    field: Option<&str>,
    model_error: Option<&str>,
    json: bool,
) -> Result<ExitCode> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read record: {:?}", path))?;
    let record: Employee = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse record: {:?}", path))?;

    let strategy = match (kind, field) {
        (StrategyKind::Property, Some(field)) => Strategy::Property(field.to_string()),
        (StrategyKind::Property, None) => bail!("The property strategy needs --field"),
        (StrategyKind::Model, _) => Strategy::Model,
        (StrategyKind::Object, _) => Strategy::Object,
    };

    info!(strategy = %kind, record = ?path, "validating");
    let errors = with_model_error(Validator::new(catalog).run(&record, &strategy), model_error);

    if json {
        println!("{}", serde_json::to_string_pretty(&errors)?);
    } else {
        print_errors(kind, &errors);
    }

    Ok(if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Append a model-level message after the rule messages of an invalid result
fn with_model_error(errors: ValidationErrors, model_error: Option<&str>) -> ValidationErrors {
    match model_error {
        Some(message) if !errors.is_empty() => {
            let mut builder = ValidationErrors::builder(errors.label().to_string());
            builder.absorb(errors).push(message);
            builder.finish()
        }
        _ => errors,
    }
}

fn print_errors(kind: StrategyKind, errors: &ValidationErrors) {
    if errors.is_empty() {
        println!("{} {} ({})", "✓".green(), "Valid".green().bold(), kind);
        return;
    }

    println!("{} {} ({})", "✗".red(), errors.label().red().bold(), kind);
    for message in errors {
        println!("  - {}", message);
    }
}
