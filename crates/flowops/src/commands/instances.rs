//! Instance listing

use crate::config::ConsoleConfig;
use crate::output;
use anyhow::{Context, Result};
use comfy_table::Table;

pub async fn run(config: &ConsoleConfig, format: &str) -> Result<()> {
    output::validate_format(format)?;

    let client = config.client();
    let instances = client
        .instances()
        .await
        .context("Failed to load instances")?;

    if output::is_json(format) {
        println!("{}", serde_json::to_string_pretty(&instances)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["INSTANCE", "NAME", "ATTRIBUTE", "VALUE", "URL"]);
    for instance in &instances {
        table.add_row(vec![
            &instance.id,
            &instance.name,
            &instance.hierarchy_attribute,
            &instance.hierarchy_value,
            &instance.url,
        ]);
    }
    println!("{table}");
    Ok(())
}
