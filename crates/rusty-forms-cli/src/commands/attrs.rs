use anyhow::{Context, Result};
use colored::Colorize;
use rusty_forms::{client_mirrors, FieldAttrs, RuleCatalog};

pub fn execute(catalog: &RuleCatalog, field: &str, html: bool) -> Result<()> {
    let attrs = FieldAttrs::for_field(catalog, field).with_context(|| {
        format!(
            "The field '{}' is not declared on {}",
            field,
            catalog.record_display_name()
        )
    })?;

    if html {
        println!("{}", attrs.render_input(field, "").into_string());
        return Ok(());
    }

    println!("{} {}", "Field:".bold(), attrs.label.cyan());
    if attrs.attrs.is_empty() {
        println!("{}", "No client validation rules".yellow());
        return Ok(());
    }
    for (name, value) in &attrs.attrs {
        println!("  {}={:?}", name.green(), value);
    }

    let mirrors = client_mirrors(catalog, field);
    if !mirrors.is_empty() {
        println!();
        println!("{}", "Client mirrors:".bold());
        for mirror in &mirrors {
            println!("{}", serde_json::to_string(mirror)?);
        }
    }

    Ok(())
}
