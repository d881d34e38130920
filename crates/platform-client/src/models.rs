//! Wire models for the platform's admin REST API
//!
//! All types mirror the JSON the backend produces and consumes. The backend
//! owns these resources; the console never persists them locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One naming dimension (e.g. datacenter, organizational unit) used both to
/// locate instances and to generate process-group names and paths.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HierarchyAttribute {
    /// Attribute key, e.g. `"DC"`.
    pub name: String,
    /// Human-readable label for display.
    pub label: String,
    /// Position in the hierarchy; lower is closer to the top.
    pub order: u32,
}

/// Source-side and destination-side values of one hierarchy attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HierarchySides {
    /// Value on the sending side, if any.
    #[serde(default)]
    pub source: Option<String>,
    /// Value on the receiving side, if any.
    #[serde(default)]
    pub destination: Option<String>,
}

impl HierarchySides {
    /// The value for one side, by direction name.
    pub fn get(&self, source_side: bool) -> Option<&str> {
        if source_side {
            self.source.as_deref()
        } else {
            self.destination.as_deref()
        }
    }
}

/// A named dataflow definition with optional per-side template references.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Flow {
    /// Stable flow identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Template deployed on the sending side, if any.
    #[serde(default)]
    pub source_template: Option<String>,
    /// Template deployed on the receiving side, if any.
    #[serde(default)]
    pub destination_template: Option<String>,
    /// Hierarchy attribute name to per-side values.
    #[serde(default)]
    pub hierarchy: HashMap<String, HierarchySides>,
}

/// A deployment target, identified by one top-level hierarchy pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Instance {
    /// Stable instance identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Hierarchy attribute this instance is keyed on, e.g. `"DC"`.
    pub hierarchy_attribute: String,
    /// Value of that attribute, e.g. `"east"`.
    pub hierarchy_value: String,
    /// Connection URL of the runtime instance.
    pub url: String,
}

/// A versioned flow definition stored in the external flow registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegistryFlow {
    /// Template identifier flows reference via their template fields.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Registry client the definition lives in.
    pub registry_client_id: String,
    /// Bucket within that registry.
    pub bucket_id: String,
    /// The registry's own identifier for the flow definition.
    pub flow_id: String,
}

/// A deployable location in an instance's canvas hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessGroupPath {
    /// Process-group identifier.
    pub id: String,
    /// Group name.
    pub name: String,
    /// Raw path, e.g. `"/From east"`.
    pub path: String,
    /// Nesting depth, root is 0.
    pub level: u32,
    /// Human-readable path for display.
    pub formatted_path: String,
}

impl ProcessGroupPath {
    /// Synthetic root entry used when an instance reports no groups.
    pub fn synthetic_root() -> Self {
        Self {
            id: "root".to_string(),
            name: "root".to_string(),
            path: "/".to_string(),
            level: 0,
            formatted_path: "/".to_string(),
        }
    }
}

/// Response of `GET instances/{id}/ops/process-groups/all-paths`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllPathsResponse {
    /// Known process groups; absent means the canvas only has its root.
    #[serde(default)]
    pub process_groups: Option<Vec<ProcessGroupPath>>,
}

impl AllPathsResponse {
    /// The usable path list; a missing field yields a synthetic root entry.
    pub fn into_paths(self) -> Vec<ProcessGroupPath> {
        self.process_groups
            .unwrap_or_else(|| vec![ProcessGroupPath::synthetic_root()])
    }
}

/// One version of a registry flow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowVersion {
    /// Version number, ascending.
    pub version: i64,
    /// Commit timestamp, epoch milliseconds.
    pub timestamp: i64,
    /// Commit comments, if any.
    #[serde(default)]
    pub comments: Option<String>,
}

/// Configured base paths of one instance, per direction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InstancePaths {
    /// Base path suggested for source-side deployments.
    #[serde(default)]
    pub source_path: Option<String>,
    /// Base path suggested for destination-side deployments.
    #[serde(default)]
    pub destination_path: Option<String>,
}

/// Global deployment defaults, persisted by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeploymentSettings {
    /// Process-group naming template; supports `{flow_name}`,
    /// `{template_name}` and `{last_hierarchy_value}` placeholders.
    pub name_template: String,
    /// Disable the deployed group after deployment.
    pub disable_after_deploy: bool,
    /// Detach the deployed group from version control after deployment.
    pub stop_versioning_after_deploy: bool,
    /// Start the deployed group after deployment.
    pub start_after_deploy: bool,
    /// Per-instance configured base paths used for auto-suggestion.
    #[serde(default)]
    pub instance_paths: HashMap<String, InstancePaths>,
}

impl Default for DeploymentSettings {
    fn default() -> Self {
        Self {
            name_template: "{flow_name}-{last_hierarchy_value}".to_string(),
            disable_after_deploy: false,
            stop_versioning_after_deploy: false,
            start_after_deploy: false,
            instance_paths: HashMap::new(),
        }
    }
}

/// Body of `POST instances/{id}/deploy`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeployRequest {
    /// Template the deployment was derived from.
    pub template_id: String,
    /// Registry bucket holding the flow definition.
    pub bucket_id: String,
    /// Registry flow definition to deploy.
    pub flow_id: String,
    /// Registry client to fetch the definition through.
    pub registry_client_id: String,
    /// Process group the new group is created under.
    pub parent_process_group_id: String,
    /// Name of the created process group.
    pub process_group_name: String,
    /// Version to deploy; omitted means latest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    /// Parameter context bound to the group, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter_context_name: Option<String>,
    /// Canvas x coordinate of the created group.
    pub x_position: f64,
    /// Canvas y coordinate of the created group.
    pub y_position: f64,
    /// Detach from version control after deploy.
    pub stop_versioning_after_deploy: bool,
    /// Disable the group after deploy.
    pub disable_after_deploy: bool,
    /// Start the group after deploy.
    pub start_after_deploy: bool,
}

/// Response of a successful deploy.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeployResponse {
    /// Identifier of the created process group.
    #[serde(default)]
    pub process_group_id: Option<String>,
    /// Version that was deployed.
    #[serde(default)]
    pub version: Option<i64>,
}

/// An existing process group blocking a deployment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConflictInfo {
    /// Identifier of the blocking group.
    pub id: String,
    /// Name of the blocking group.
    pub name: String,
    /// Processors currently running inside it.
    pub running_count: u32,
    /// Processors currently stopped inside it.
    pub stopped_count: u32,
    /// Whether the group is under version control.
    pub has_version_control: bool,
}

/// 409 payload of `POST instances/{id}/deploy`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictPayload {
    /// The group occupying the target location.
    pub existing_process_group: ConflictInfo,
}

/// Body of `PUT instances/{id}/process-groups/{pgId}/version`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateVersionRequest {
    /// Version to move the group to; omitted means latest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
}

/// Lifecycle state of a background job.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Queued, not yet picked up.
    Pending,
    /// Currently executing.
    Running,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
}

impl JobState {
    /// Whether the job still makes progress and is worth polling.
    pub fn is_active(self) -> bool {
        matches!(self, JobState::Pending | JobState::Running)
    }
}

/// A background job executed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    /// Job identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Current lifecycle state.
    pub state: JobState,
    /// Last state change, if the backend reports one.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Progress of a single background job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobProgress {
    /// Completed units of work.
    pub current: u64,
    /// Total units of work.
    pub total: u64,
    /// Human-readable progress message, if any.
    #[serde(default)]
    pub message: Option<String>,
}
