//! The deployment workflow
//!
//! Fetches the reference data, derives deployment configs, enriches them
//! stage by stage (paths, target selection, naming, versions) and hands the
//! batch to the coordinator. Enrichment failures degrade the affected
//! config rather than aborting: a config that stays incomplete is recorded
//! as failed by the coordinator and the rest of the batch proceeds.

use crate::config::ConsoleConfig;
use crate::output;
use crate::resolver::InteractiveResolver;
use anyhow::{Context, Result};
use comfy_table::{Cell, Color, Table};
use deploy_orchestration::{
    ConflictAction, ConflictResolver, DeploymentConfig, DeploymentCoordinator, DeploymentReport,
    DirectionChoice, FixedResolver, auto_select_process_group, build_deployment_configs,
    generate_process_group_name, suggested_path,
};
use platform_client::{
    DeploymentSettings, Flow, HierarchyAttribute, PlatformClient, ProcessGroupPath,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Parsed `flowops deploy` arguments.
pub struct DeployArgs {
    /// Flow ids or names to deploy.
    pub flows: Vec<String>,
    /// Which sides to deploy.
    pub direction: DirectionChoice,
    /// Pinned version; `None` deploys the latest.
    pub version: Option<i64>,
    /// Parameter context bound to every deployed group.
    pub parameter_context: Option<String>,
    /// Non-interactive conflict handling; `None` prompts.
    pub fixed_action: Option<ConflictAction>,
    /// Output format.
    pub format: String,
}

pub async fn run(config: &ConsoleConfig, args: DeployArgs) -> Result<()> {
    output::validate_format(&args.format)?;
    config.capabilities().require_write()?;
    if args.flows.is_empty() {
        anyhow::bail!("no flows selected; pass at least one flow id or name");
    }

    let client = config.client();

    let hierarchy = client
        .hierarchy()
        .await
        .context("Failed to load the naming hierarchy")?;
    let all_flows = client.flows().await.context("Failed to load flows")?;
    let instances = client
        .instances()
        .await
        .context("Failed to load instances")?;
    let registry_flows = client
        .registry_flows()
        .await
        .context("Failed to load registry flows")?;
    let settings = client
        .deployment_settings()
        .await
        .context("Failed to load deployment settings")?;

    let selected = select_flows(&all_flows, &args.flows)?;
    let directions: HashMap<String, DirectionChoice> = selected
        .iter()
        .map(|flow| (flow.id.clone(), args.direction))
        .collect();

    let configs = build_deployment_configs(
        &selected,
        &directions,
        &instances,
        &registry_flows,
        &hierarchy,
    );
    if configs.is_empty() {
        println!("Nothing to deploy: the selected flows have no deployable sides.");
        return Ok(());
    }

    println!("Preparing {} configurations...", configs.len());
    let configs = enrich(&client, configs, &selected, &settings, &hierarchy, &args).await;

    for config in &configs {
        let target = config.instance_id.as_deref().unwrap_or("no instance found");
        match suggested_path(config, &settings) {
            Some(hint) => println!("  {} -> {} ({})", config.key, target, hint),
            None => println!("  {} -> {}", config.key, target),
        }
    }

    let resolver: Arc<dyn ConflictResolver> = match args.fixed_action {
        Some(action) => Arc::new(FixedResolver::new(action)),
        None => Arc::new(InteractiveResolver::new()),
    };
    let coordinator = DeploymentCoordinator::new(Arc::new(client), resolver, settings);
    let report = coordinator.run(configs).await;

    render_report(&report, &args.format)?;

    if report.failure_count() > 0 {
        anyhow::bail!(
            "{} of {} deployments failed",
            report.failure_count(),
            report.total()
        );
    }
    Ok(())
}

/// Resolve the user's flow references against the known flows.
fn select_flows(all_flows: &[Flow], wanted: &[String]) -> Result<Vec<Flow>> {
    let mut selected: Vec<Flow> = Vec::new();
    for reference in wanted {
        let found = all_flows
            .iter()
            .find(|flow| flow.id == *reference || flow.name == *reference);
        let Some(flow) = found else {
            anyhow::bail!("unknown flow '{}'", reference);
        };
        if !selected.iter().any(|known| known.id == flow.id) {
            selected.push(flow.clone());
        }
    }
    Ok(selected)
}

/// Run the enrichment pipeline over every config.
async fn enrich(
    client: &PlatformClient,
    configs: Vec<DeploymentConfig>,
    flows: &[Flow],
    settings: &DeploymentSettings,
    hierarchy: &[HierarchyAttribute],
    args: &DeployArgs,
) -> Vec<DeploymentConfig> {
    let mut paths_cache: HashMap<String, Vec<ProcessGroupPath>> = HashMap::new();
    let mut enriched = Vec::with_capacity(configs.len());

    for config in configs {
        let config = attach_paths(client, &mut paths_cache, config).await;
        let config = select_process_group(config, settings);
        let config = apply_name_template(config, flows, settings, hierarchy);
        let config = attach_versions(client, config).await;
        let config = config
            .with_version(args.version)
            .with_parameter_context(args.parameter_context.clone());

        if let Some(version) = args.version {
            let known = config
                .available_versions
                .iter()
                .any(|candidate| candidate.version == version);
            if !config.available_versions.is_empty() && !known {
                warn!(
                    "version {} is not among the known versions of '{}'",
                    version, config.key
                );
            }
        }
        enriched.push(config);
    }
    enriched
}

/// Stage: attach the target instance's deployable paths, fetched once per
/// instance. A failed fetch leaves the config without paths; it will fail
/// per-config validation later instead of aborting the batch.
async fn attach_paths(
    client: &PlatformClient,
    cache: &mut HashMap<String, Vec<ProcessGroupPath>>,
    config: DeploymentConfig,
) -> DeploymentConfig {
    let Some(instance_id) = config.instance_id.clone() else {
        return config;
    };
    if !cache.contains_key(&instance_id) {
        let paths = match client.process_group_paths(&instance_id).await {
            Ok(paths) => paths,
            Err(error) => {
                warn!(
                    "failed to load process-group paths of instance '{}': {}",
                    instance_id, error
                );
                Vec::new()
            }
        };
        cache.insert(instance_id.clone(), paths);
    }
    let paths = cache[&instance_id].clone();
    config.with_paths(paths)
}

/// Stage: pick the parent process group — the configured base path when it
/// matches, the instance root otherwise.
fn select_process_group(
    config: DeploymentConfig,
    settings: &DeploymentSettings,
) -> DeploymentConfig {
    let selected = auto_select_process_group(&config, settings).or_else(|| {
        config
            .available_paths
            .iter()
            .find(|path| path.level == 0)
            .map(|path| path.id.clone())
    });
    config.with_process_group(selected)
}

/// Stage: expand the naming template.
fn apply_name_template(
    config: DeploymentConfig,
    flows: &[Flow],
    settings: &DeploymentSettings,
    hierarchy: &[HierarchyAttribute],
) -> DeploymentConfig {
    let Some(flow) = flows.iter().find(|flow| flow.id == config.flow_id) else {
        return config;
    };
    let name = generate_process_group_name(&settings.name_template, &config, flow, hierarchy);
    config.with_name(name)
}

/// Stage: attach the artifact's known versions.
async fn attach_versions(client: &PlatformClient, config: DeploymentConfig) -> DeploymentConfig {
    let Some(instance_id) = config.instance_id.clone() else {
        return config;
    };
    let Some(registry) = config.registry.clone() else {
        return config;
    };

    match client
        .flow_versions(
            &instance_id,
            &registry.registry_client_id,
            &registry.bucket_id,
            &registry.flow_id,
        )
        .await
    {
        Ok(versions) => config.with_versions(versions),
        Err(error) => {
            warn!("failed to load versions for '{}': {}", config.key, error);
            config
        }
    }
}

fn render_report(report: &DeploymentReport, format: &str) -> Result<()> {
    if output::is_json(format) {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["CONFIG", "INSTANCE", "RESULT", "DETAIL"]);

    for outcome in &report.successful {
        table.add_row(vec![
            Cell::new(&outcome.key),
            Cell::new(outcome.instance_id.as_deref().unwrap_or("-")),
            Cell::new("deployed").fg(Color::Green),
            Cell::new(""),
        ]);
    }
    for outcome in &report.failed {
        table.add_row(vec![
            Cell::new(&outcome.key),
            Cell::new(outcome.instance_id.as_deref().unwrap_or("-")),
            Cell::new("failed").fg(Color::Red),
            Cell::new(outcome.failure_reason().unwrap_or_default()),
        ]);
    }

    println!("{table}");
    println!(
        "\n{} of {} configurations deployed",
        report.success_count(),
        report.total()
    );
    Ok(())
}
