//! Deployment configuration model
//!
//! A [`DeploymentConfig`] is the central derived entity: one exists per
//! (flow, direction) pair the user selected for deployment. Configs are
//! created by the builder, progressively enriched with paths and versions
//! as the workflow advances, consumed at deploy time and never persisted.

use platform_client::{DeployRequest, DeploymentSettings, FlowVersion, ProcessGroupPath};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of a flow a configuration deploys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The receiving side; always provisioned first.
    Destination,
    /// The sending side.
    Source,
}

impl Direction {
    /// Whether this is the sending side.
    pub fn is_source(self) -> bool {
        matches!(self, Direction::Source)
    }

    /// Stable lowercase name used in config keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Destination => "destination",
            Direction::Source => "source",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User choice of which sides of a flow to deploy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionChoice {
    /// Deploy the sending side only.
    Source,
    /// Deploy the receiving side only.
    Destination,
    /// Deploy both sides.
    Both,
}

impl DirectionChoice {
    /// The directions this choice expands to.
    ///
    /// `Both` expands destination before source; this ordering is carried
    /// through to execution ordering.
    pub fn expand(self) -> &'static [Direction] {
        match self {
            DirectionChoice::Source => &[Direction::Source],
            DirectionChoice::Destination => &[Direction::Destination],
            DirectionChoice::Both => &[Direction::Destination, Direction::Source],
        }
    }
}

/// Registry coordinates of the artifact a config deploys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryCoordinates {
    /// Registry client to fetch the definition through.
    pub registry_client_id: String,
    /// Bucket holding the flow definition.
    pub bucket_id: String,
    /// The registry's identifier for the flow definition.
    pub flow_id: String,
}

/// One planned deployment of one flow side onto one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Stable key, `{flow_id}-{direction}`.
    pub key: String,
    /// Flow being deployed.
    pub flow_id: String,
    /// Flow display name.
    pub flow_name: String,
    /// Side being deployed.
    pub direction: Direction,
    /// Top-level hierarchy value used to locate the target instance.
    pub hierarchy_value: String,
    /// Resolved target instance; `None` means no instance matched, which is
    /// surfaced to the user rather than silently dropped.
    pub instance_id: Option<String>,
    /// Template the deployment derives from.
    pub template_id: String,
    /// Display name of the registry record backing the template.
    pub template_name: Option<String>,
    /// Registry coordinates resolved from the template id.
    pub registry: Option<RegistryCoordinates>,
    /// Deployable paths of the target instance; populated lazily.
    #[serde(default)]
    pub available_paths: Vec<ProcessGroupPath>,
    /// Selected parent process group.
    pub process_group_id: Option<String>,
    /// Name of the process group the deploy creates.
    pub process_group_name: String,
    /// Parameter context bound to the deployed group, if any.
    pub parameter_context_name: Option<String>,
    /// Known versions of the artifact; populated lazily.
    #[serde(default)]
    pub available_versions: Vec<FlowVersion>,
    /// Selected version; `None` deploys the latest.
    pub version: Option<i64>,
}

impl DeploymentConfig {
    /// Stage: attach the target instance's deployable paths.
    pub fn with_paths(mut self, paths: Vec<ProcessGroupPath>) -> Self {
        self.available_paths = paths;
        self
    }

    /// Stage: attach the artifact's known versions.
    pub fn with_versions(mut self, versions: Vec<FlowVersion>) -> Self {
        self.available_versions = versions;
        self
    }

    /// Stage: select the parent process group.
    pub fn with_process_group(mut self, process_group_id: Option<String>) -> Self {
        self.process_group_id = process_group_id;
        self
    }

    /// Stage: pin the deployed version (`None` = latest).
    pub fn with_version(mut self, version: Option<i64>) -> Self {
        self.version = version;
        self
    }

    /// Stage: replace the generated process-group name.
    pub fn with_name(mut self, name: String) -> Self {
        self.process_group_name = name;
        self
    }

    /// Stage: bind a parameter context.
    pub fn with_parameter_context(mut self, name: Option<String>) -> Self {
        self.parameter_context_name = name;
        self
    }

    /// Build the deploy request body, if the registry coordinates and the
    /// target process group are resolved.
    ///
    /// The canvas position is fixed at the origin; the three post-deploy
    /// behaviors come from the global settings.
    pub fn deploy_request(&self, settings: &DeploymentSettings) -> Option<DeployRequest> {
        let registry = self.registry.as_ref()?;
        let parent = self.process_group_id.clone()?;
        Some(DeployRequest {
            template_id: self.template_id.clone(),
            bucket_id: registry.bucket_id.clone(),
            flow_id: registry.flow_id.clone(),
            registry_client_id: registry.registry_client_id.clone(),
            parent_process_group_id: parent,
            process_group_name: self.process_group_name.clone(),
            version: self.version,
            parameter_context_name: self.parameter_context_name.clone(),
            x_position: 0.0,
            y_position: 0.0,
            stop_versioning_after_deploy: settings.stop_versioning_after_deploy,
            disable_after_deploy: settings.disable_after_deploy,
            start_after_deploy: settings.start_after_deploy,
        })
    }
}
