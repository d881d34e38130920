//! Output helpers shared by the commands

use anyhow::Result;

/// Reject anything other than the two supported output formats.
pub fn validate_format(format: &str) -> Result<()> {
    if format != "table" && format != "json" {
        anyhow::bail!("Invalid format: {}. Must be 'table' or 'json'", format);
    }
    Ok(())
}

/// Whether the user asked for JSON output.
pub fn is_json(format: &str) -> bool {
    format == "json"
}
