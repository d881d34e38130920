//! Naming hierarchy view

use crate::config::ConsoleConfig;
use crate::output;
use anyhow::{Context, Result};
use comfy_table::Table;

pub async fn run(config: &ConsoleConfig, format: &str) -> Result<()> {
    output::validate_format(format)?;

    let client = config.client();
    let attributes = client
        .hierarchy()
        .await
        .context("Failed to load the naming hierarchy")?;

    if output::is_json(format) {
        println!("{}", serde_json::to_string_pretty(&attributes)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ORDER", "NAME", "LABEL"]);
    for attribute in &attributes {
        table.add_row(vec![
            attribute.order.to_string(),
            attribute.name.clone(),
            attribute.label.clone(),
        ]);
    }
    println!("{table}");
    Ok(())
}
