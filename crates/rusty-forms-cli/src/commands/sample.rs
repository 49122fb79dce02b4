use anyhow::Result;
use rusty_forms::employee::Employee;

pub fn execute() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&Employee::sample())?);
    Ok(())
}
