//! Deployment settings pages

use crate::config::ConsoleConfig;
use crate::output;
use anyhow::{Context, Result};
use comfy_table::Table;
use platform_client::DeploymentSettings;

/// Parsed `flowops settings set` arguments.
#[derive(Debug, clap::Args)]
pub struct SetArgs {
    /// Process-group naming template
    #[arg(long)]
    pub name_template: Option<String>,

    /// Disable the deployed group after deployment
    #[arg(long)]
    pub disable_after_deploy: Option<bool>,

    /// Detach the deployed group from version control after deployment
    #[arg(long)]
    pub stop_versioning_after_deploy: Option<bool>,

    /// Start the deployed group after deployment
    #[arg(long)]
    pub start_after_deploy: Option<bool>,

    /// Instance the path options below apply to
    #[arg(long)]
    pub instance: Option<String>,

    /// Configured base path for source-side deployments
    #[arg(long)]
    pub source_path: Option<String>,

    /// Configured base path for destination-side deployments
    #[arg(long)]
    pub destination_path: Option<String>,
}

pub async fn show(config: &ConsoleConfig, format: &str) -> Result<()> {
    output::validate_format(format)?;

    let client = config.client();
    let settings = client
        .deployment_settings()
        .await
        .context("Failed to load deployment settings")?;

    if output::is_json(format) {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["SETTING", "VALUE"]);
    table.add_row(vec!["name_template".to_string(), settings.name_template.clone()]);
    table.add_row(vec![
        "disable_after_deploy".to_string(),
        settings.disable_after_deploy.to_string(),
    ]);
    table.add_row(vec![
        "stop_versioning_after_deploy".to_string(),
        settings.stop_versioning_after_deploy.to_string(),
    ]);
    table.add_row(vec![
        "start_after_deploy".to_string(),
        settings.start_after_deploy.to_string(),
    ]);
    println!("{table}");

    if !settings.instance_paths.is_empty() {
        let mut paths = Table::new();
        paths.set_header(vec!["INSTANCE", "SOURCE PATH", "DESTINATION PATH"]);
        let mut instances: Vec<_> = settings.instance_paths.iter().collect();
        instances.sort_by_key(|(instance_id, _)| instance_id.to_string());
        for (instance_id, entry) in instances {
            paths.add_row(vec![
                instance_id.as_str(),
                entry.source_path.as_deref().unwrap_or("-"),
                entry.destination_path.as_deref().unwrap_or("-"),
            ]);
        }
        println!("{paths}");
    }
    Ok(())
}

pub async fn set(config: &ConsoleConfig, args: SetArgs) -> Result<()> {
    config.capabilities().require_write()?;

    let client = config.client();
    let mut settings = client
        .deployment_settings()
        .await
        .context("Failed to load deployment settings")?;

    apply(&mut settings, &args)?;

    client
        .save_deployment_settings(&settings)
        .await
        .context("Failed to save deployment settings")?;
    println!("Deployment settings saved.");
    Ok(())
}

/// Merge the given overrides into the loaded settings.
fn apply(settings: &mut DeploymentSettings, args: &SetArgs) -> Result<()> {
    if args.instance.is_none() && (args.source_path.is_some() || args.destination_path.is_some()) {
        anyhow::bail!("--source-path/--destination-path require --instance");
    }

    if let Some(template) = &args.name_template {
        settings.name_template = template.clone();
    }
    if let Some(disable) = args.disable_after_deploy {
        settings.disable_after_deploy = disable;
    }
    if let Some(stop) = args.stop_versioning_after_deploy {
        settings.stop_versioning_after_deploy = stop;
    }
    if let Some(start) = args.start_after_deploy {
        settings.start_after_deploy = start;
    }

    if let Some(instance) = &args.instance {
        let entry = settings.instance_paths.entry(instance.clone()).or_default();
        if let Some(source) = &args.source_path {
            entry.source_path = Some(source.clone());
        }
        if let Some(destination) = &args.destination_path {
            entry.destination_path = Some(destination.clone());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> SetArgs {
        SetArgs {
            name_template: None,
            disable_after_deploy: None,
            stop_versioning_after_deploy: None,
            start_after_deploy: None,
            instance: None,
            source_path: None,
            destination_path: None,
        }
    }

    #[test]
    fn apply_merges_only_given_fields() {
        let mut settings = DeploymentSettings::default();
        let args = SetArgs {
            start_after_deploy: Some(true),
            ..empty_args()
        };

        apply(&mut settings, &args).unwrap();
        assert!(settings.start_after_deploy);
        assert!(!settings.disable_after_deploy);
        assert_eq!(settings.name_template, "{flow_name}-{last_hierarchy_value}");
    }

    #[test]
    fn apply_updates_instance_paths() {
        let mut settings = DeploymentSettings::default();
        let args = SetArgs {
            instance: Some("inst-east".to_string()),
            destination_path: Some("/From east".to_string()),
            ..empty_args()
        };

        apply(&mut settings, &args).unwrap();
        let entry = &settings.instance_paths["inst-east"];
        assert_eq!(entry.destination_path.as_deref(), Some("/From east"));
        assert!(entry.source_path.is_none());
    }

    #[test]
    fn apply_rejects_paths_without_an_instance() {
        let mut settings = DeploymentSettings::default();
        let args = SetArgs {
            source_path: Some("/Out".to_string()),
            ..empty_args()
        };

        assert!(apply(&mut settings, &args).is_err());
    }
}
