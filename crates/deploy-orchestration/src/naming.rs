//! Name generation, path auto-selection and execution ordering

use crate::config::{DeploymentConfig, Direction};
use platform_client::{DeploymentSettings, Flow, HierarchyAttribute};

/// Expand a naming template into a concrete process-group name.
///
/// Performs literal single-pass substring replacement (never regex) of
/// three placeholders: `{last_hierarchy_value}` — the direction-appropriate
/// value of the *last* hierarchy attribute, falling back to the config's
/// top-level value — `{flow_name}`, and `{template_name}`, which falls back
/// to the literal `"Template"`.
pub fn generate_process_group_name(
    template: &str,
    config: &DeploymentConfig,
    flow: &Flow,
    attributes: &[HierarchyAttribute],
) -> String {
    let last_value = attributes
        .last()
        .and_then(|attribute| flow.hierarchy.get(&attribute.name))
        .and_then(|sides| sides.get(config.direction.is_source()))
        .unwrap_or(config.hierarchy_value.as_str());

    template
        .replace("{last_hierarchy_value}", last_value)
        .replace("{flow_name}", &flow.name)
        .replace(
            "{template_name}",
            config.template_name.as_deref().unwrap_or("Template"),
        )
}

/// The configured base path for a config's instance and direction, if any.
pub fn configured_base_path<'a>(
    config: &DeploymentConfig,
    settings: &'a DeploymentSettings,
) -> Option<&'a str> {
    let instance_id = config.instance_id.as_deref()?;
    let paths = settings.instance_paths.get(instance_id)?;
    match config.direction {
        Direction::Source => paths.source_path.as_deref(),
        Direction::Destination => paths.destination_path.as_deref(),
    }
}

/// Pick a parent process group from the config's available paths, driven by
/// the configured base path for its instance and direction.
///
/// An exact match on the raw or formatted path wins; only when none exists
/// does the first-match prefix/contains heuristic apply. Best effort: no
/// configured path or no match returns `None`.
pub fn auto_select_process_group(
    config: &DeploymentConfig,
    settings: &DeploymentSettings,
) -> Option<String> {
    let configured = configured_base_path(config, settings)?;

    if let Some(exact) = config
        .available_paths
        .iter()
        .find(|path| path.path == configured || path.formatted_path == configured)
    {
        return Some(exact.id.clone());
    }

    config
        .available_paths
        .iter()
        .find(|path| path.path.starts_with(configured) || path.formatted_path.contains(configured))
        .map(|path| path.id.clone())
}

/// Display-only hint for the configured base path.
pub fn suggested_path(config: &DeploymentConfig, settings: &DeploymentSettings) -> Option<String> {
    configured_base_path(config, settings).map(|path| format!("Suggested: {path}"))
}

/// Order configs for execution: ascending flow id, destination before
/// source within the same flow.
///
/// The sort is stable and idempotent. The destination-first ordering is
/// load-bearing: receiving instances are provisioned before sending
/// instances begin transmitting.
pub fn sort_deployment_configs(mut configs: Vec<DeploymentConfig>) -> Vec<DeploymentConfig> {
    configs.sort_by(|a, b| {
        a.flow_id
            .cmp(&b.flow_id)
            .then_with(|| direction_rank(a.direction).cmp(&direction_rank(b.direction)))
    });
    configs
}

fn direction_rank(direction: Direction) -> u8 {
    match direction {
        Direction::Destination => 0,
        Direction::Source => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryCoordinates;
    use platform_client::{HierarchySides, InstancePaths, ProcessGroupPath};
    use std::collections::HashMap;

    fn attributes() -> Vec<HierarchyAttribute> {
        vec![
            HierarchyAttribute {
                name: "DC".to_string(),
                label: "Datacenter".to_string(),
                order: 0,
            },
            HierarchyAttribute {
                name: "CN".to_string(),
                label: "Node".to_string(),
                order: 2,
            },
        ]
    }

    fn flow() -> Flow {
        let mut hierarchy = HashMap::new();
        hierarchy.insert(
            "DC".to_string(),
            HierarchySides {
                source: Some("west".to_string()),
                destination: Some("east".to_string()),
            },
        );
        hierarchy.insert(
            "CN".to_string(),
            HierarchySides {
                source: Some("node-w1".to_string()),
                destination: Some("node-e1".to_string()),
            },
        );
        Flow {
            id: "flow-1".to_string(),
            name: "Alpha".to_string(),
            source_template: Some("tpl-out".to_string()),
            destination_template: Some("tpl-in".to_string()),
            hierarchy,
        }
    }

    fn config(flow_id: &str, direction: Direction) -> DeploymentConfig {
        DeploymentConfig {
            key: format!("{flow_id}-{direction}"),
            flow_id: flow_id.to_string(),
            flow_name: "Alpha".to_string(),
            direction,
            hierarchy_value: "east".to_string(),
            instance_id: Some("inst-east".to_string()),
            template_id: "tpl-in".to_string(),
            template_name: Some("Ingest".to_string()),
            registry: Some(RegistryCoordinates {
                registry_client_id: "reg-1".to_string(),
                bucket_id: "bucket-1".to_string(),
                flow_id: "rf-in".to_string(),
            }),
            available_paths: Vec::new(),
            process_group_id: None,
            process_group_name: "east".to_string(),
            parameter_context_name: None,
            available_versions: Vec::new(),
            version: None,
        }
    }

    fn path(id: &str, raw: &str, formatted: &str) -> ProcessGroupPath {
        ProcessGroupPath {
            id: id.to_string(),
            name: id.to_string(),
            path: raw.to_string(),
            level: 1,
            formatted_path: formatted.to_string(),
        }
    }

    fn settings_with_destination_path(path: &str) -> DeploymentSettings {
        let mut settings = DeploymentSettings::default();
        settings.instance_paths.insert(
            "inst-east".to_string(),
            InstancePaths {
                source_path: None,
                destination_path: Some(path.to_string()),
            },
        );
        settings
    }

    #[test]
    fn name_uses_last_hierarchy_value_and_flow_name() {
        let name = generate_process_group_name(
            "{flow_name}-{last_hierarchy_value}",
            &config("flow-1", Direction::Destination),
            &flow(),
            &attributes(),
        );
        assert_eq!(name, "Alpha-node-e1");
    }

    #[test]
    fn name_matches_the_documented_example() {
        // Single-attribute hierarchy: the last value is the top value.
        let attributes = vec![HierarchyAttribute {
            name: "DC".to_string(),
            label: "Datacenter".to_string(),
            order: 0,
        }];
        let name = generate_process_group_name(
            "{flow_name}-{last_hierarchy_value}",
            &config("flow-1", Direction::Destination),
            &flow(),
            &attributes,
        );
        assert_eq!(name, "Alpha-east");
    }

    #[test]
    fn name_falls_back_to_top_level_value() {
        let mut flow = flow();
        flow.hierarchy.remove("CN");

        let name = generate_process_group_name(
            "{last_hierarchy_value}",
            &config("flow-1", Direction::Destination),
            &flow,
            &attributes(),
        );
        assert_eq!(name, "east");
    }

    #[test]
    fn template_name_falls_back_to_literal() {
        let mut config = config("flow-1", Direction::Destination);
        config.template_name = None;

        let name =
            generate_process_group_name("{template_name} deploy", &config, &flow(), &attributes());
        assert_eq!(name, "Template deploy");
    }

    #[test]
    fn placeholders_are_not_expanded_recursively() {
        let mut flow = flow();
        flow.name = "{last_hierarchy_value}".to_string();

        // The flow name lands verbatim; the already-substituted value is
        // not rewritten by the later pass.
        let name = generate_process_group_name(
            "{last_hierarchy_value}/{flow_name}",
            &config("flow-1", Direction::Source),
            &flow,
            &attributes(),
        );
        assert_eq!(name, "node-w1/{last_hierarchy_value}");
    }

    #[test]
    fn auto_select_prefers_exact_match() {
        let settings = settings_with_destination_path("/From east");
        let config = config("flow-1", Direction::Destination).with_paths(vec![
            path("pg-backup", "/From east-backup", "/ From east-backup"),
            path("pg-exact", "/From east", "/ From east"),
        ]);

        assert_eq!(
            auto_select_process_group(&config, &settings),
            Some("pg-exact".to_string())
        );
    }

    #[test]
    fn auto_select_falls_back_to_prefix_match() {
        let settings = settings_with_destination_path("/From east");
        let config = config("flow-1", Direction::Destination).with_paths(vec![
            path("pg-other", "/Elsewhere", "/ Elsewhere"),
            path("pg-backup", "/From east-backup", "/ From east-backup"),
        ]);

        assert_eq!(
            auto_select_process_group(&config, &settings),
            Some("pg-backup".to_string())
        );
    }

    #[test]
    fn auto_select_without_configured_path_returns_none() {
        let config = config("flow-1", Direction::Source)
            .with_paths(vec![path("pg-1", "/From east", "/ From east")]);
        assert_eq!(
            auto_select_process_group(&config, &settings_with_destination_path("/From east")),
            None
        );
    }

    #[test]
    fn suggested_path_is_display_only() {
        let settings = settings_with_destination_path("/From east");
        assert_eq!(
            suggested_path(&config("flow-1", Direction::Destination), &settings),
            Some("Suggested: /From east".to_string())
        );
        assert_eq!(
            suggested_path(&config("flow-1", Direction::Source), &settings),
            None
        );
    }

    #[test]
    fn sort_orders_by_flow_then_destination_first() {
        let configs = vec![
            config("flow-b", Direction::Source),
            config("flow-a", Direction::Source),
            config("flow-b", Direction::Destination),
            config("flow-a", Direction::Destination),
        ];

        let sorted = sort_deployment_configs(configs);
        let keys: Vec<&str> = sorted.iter().map(|config| config.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "flow-a-destination",
                "flow-a-source",
                "flow-b-destination",
                "flow-b-source",
            ]
        );
    }

    #[test]
    fn sort_is_idempotent() {
        let configs = vec![
            config("flow-b", Direction::Source),
            config("flow-a", Direction::Destination),
            config("flow-a", Direction::Source),
        ];

        let once = sort_deployment_configs(configs);
        let twice = sort_deployment_configs(once.clone());
        assert_eq!(once, twice);
    }
}
