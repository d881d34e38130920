//! Deployment config derivation
//!
//! Pure derivation of [`DeploymentConfig`]s from the user's flow/direction
//! selection and the backend's reference data. Resolution failures here are
//! never errors: a side without a hierarchy value or template yields no
//! config, and a config without a matching instance is still emitted so the
//! user sees "no instance found" instead of a silent drop.

use crate::config::{DeploymentConfig, Direction, DirectionChoice, RegistryCoordinates};
use platform_client::{Flow, HierarchyAttribute, Instance, RegistryFlow};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Derive one config per selected (flow, direction) pair.
///
/// `both` expands to destination then source; that relative order is
/// preserved by the later stable sort. A flow may legitimately produce
/// zero, one or two configs.
pub fn build_deployment_configs(
    flows: &[Flow],
    directions: &HashMap<String, DirectionChoice>,
    instances: &[Instance],
    registry_flows: &[RegistryFlow],
    hierarchy: &[HierarchyAttribute],
) -> Vec<DeploymentConfig> {
    let Some(top_attribute) = hierarchy.first() else {
        warn!("no hierarchy attributes defined; nothing to deploy");
        return Vec::new();
    };

    let mut configs = Vec::new();
    for flow in flows {
        let Some(choice) = directions.get(&flow.id) else {
            continue;
        };
        for &direction in choice.expand() {
            if let Some(config) =
                build_config(flow, direction, instances, registry_flows, top_attribute)
            {
                configs.push(config);
            }
        }
    }
    configs
}

fn build_config(
    flow: &Flow,
    direction: Direction,
    instances: &[Instance],
    registry_flows: &[RegistryFlow],
    top_attribute: &HierarchyAttribute,
) -> Option<DeploymentConfig> {
    let hierarchy_value = flow
        .hierarchy
        .get(&top_attribute.name)
        .and_then(|sides| sides.get(direction.is_source()));
    let Some(hierarchy_value) = hierarchy_value else {
        debug!(
            "flow '{}' has no {} value for '{}'; skipping that side",
            flow.id, direction, top_attribute.name
        );
        return None;
    };

    let template_id = match direction {
        Direction::Destination => flow.destination_template.as_deref(),
        Direction::Source => flow.source_template.as_deref(),
    };
    let Some(template_id) = template_id else {
        debug!(
            "flow '{}' has no {} template; nothing to deploy on that side",
            flow.id, direction
        );
        return None;
    };

    let instance_id = instances
        .iter()
        .find(|instance| {
            instance.hierarchy_attribute == top_attribute.name
                && instance.hierarchy_value == hierarchy_value
        })
        .map(|instance| instance.id.clone());
    if instance_id.is_none() {
        warn!(
            "no instance found for {}={} (flow '{}', {})",
            top_attribute.name, hierarchy_value, flow.id, direction
        );
    }

    let record = registry_flows.iter().find(|record| record.id == template_id);
    if record.is_none() {
        warn!(
            "template '{}' of flow '{}' has no registry record",
            template_id, flow.id
        );
    }

    Some(DeploymentConfig {
        key: format!("{}-{}", flow.id, direction),
        flow_id: flow.id.clone(),
        flow_name: flow.name.clone(),
        direction,
        hierarchy_value: hierarchy_value.to_string(),
        instance_id,
        template_id: template_id.to_string(),
        template_name: record.map(|record| record.name.clone()),
        registry: record.map(|record| RegistryCoordinates {
            registry_client_id: record.registry_client_id.clone(),
            bucket_id: record.bucket_id.clone(),
            flow_id: record.flow_id.clone(),
        }),
        available_paths: Vec::new(),
        process_group_id: None,
        // Until a naming template is applied, the raw hierarchy value is
        // the generated name.
        process_group_name: hierarchy_value.to_string(),
        parameter_context_name: None,
        available_versions: Vec::new(),
        version: None,
    })
}
