//! Per-config outcomes and the batch report

use crate::config::{DeploymentConfig, Direction};
use chrono::{DateTime, Utc};
use platform_client::DeployResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Final result of one deployment config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigOutcome {
    /// Config key, `{flow_id}-{direction}`.
    pub key: String,
    /// Flow display name.
    pub flow_name: String,
    /// Side that was deployed.
    pub direction: Direction,
    /// Target instance, if one was resolved.
    pub instance_id: Option<String>,
    /// What happened.
    pub status: OutcomeStatus,
}

/// Success or failure of one config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The deploy (or an update-version remediation) went through.
    Succeeded {
        /// Deploy response; absent when the conflict was resolved by
        /// updating the existing group in place.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        response: Option<DeployResponse>,
    },
    /// The config did not deploy.
    Failed {
        /// Human-readable reason shown in the results view.
        reason: String,
    },
}

impl ConfigOutcome {
    /// A successful outcome for `config`.
    pub fn succeeded(config: &DeploymentConfig, response: Option<DeployResponse>) -> Self {
        Self {
            key: config.key.clone(),
            flow_name: config.flow_name.clone(),
            direction: config.direction,
            instance_id: config.instance_id.clone(),
            status: OutcomeStatus::Succeeded { response },
        }
    }

    /// A failed outcome for `config`.
    pub fn failed(config: &DeploymentConfig, reason: impl Into<String>) -> Self {
        Self {
            key: config.key.clone(),
            flow_name: config.flow_name.clone(),
            direction: config.direction,
            instance_id: config.instance_id.clone(),
            status: OutcomeStatus::Failed {
                reason: reason.into(),
            },
        }
    }

    /// Whether this config deployed.
    pub fn is_success(&self) -> bool {
        matches!(self.status, OutcomeStatus::Succeeded { .. })
    }

    /// The failure reason, if the config failed.
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.status {
            OutcomeStatus::Failed { reason } => Some(reason),
            OutcomeStatus::Succeeded { .. } => None,
        }
    }
}

/// Aggregate result of one deployment batch.
///
/// This is the coordinator's terminal state; it holds nothing else once a
/// batch completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentReport {
    /// Batch identifier.
    pub id: Uuid,
    /// When the batch started.
    pub started_at: DateTime<Utc>,
    /// When the batch completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Configs that deployed, in execution order.
    pub successful: Vec<ConfigOutcome>,
    /// Configs that did not, in execution order.
    pub failed: Vec<ConfigOutcome>,
}

impl DeploymentReport {
    /// Start an empty report.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            completed_at: None,
            successful: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Record one config's outcome.
    pub fn record(&mut self, outcome: ConfigOutcome) {
        if outcome.is_success() {
            self.successful.push(outcome);
        } else {
            self.failed.push(outcome);
        }
    }

    /// Stamp the completion time.
    pub fn finish(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Configs processed in total.
    pub fn total(&self) -> usize {
        self.successful.len() + self.failed.len()
    }

    /// Configs that deployed.
    pub fn success_count(&self) -> usize {
        self.successful.len()
    }

    /// Configs that did not.
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }
}

impl Default for DeploymentReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryCoordinates;

    fn config() -> DeploymentConfig {
        DeploymentConfig {
            key: "flow-1-destination".to_string(),
            flow_id: "flow-1".to_string(),
            flow_name: "Alpha".to_string(),
            direction: Direction::Destination,
            hierarchy_value: "east".to_string(),
            instance_id: Some("inst-east".to_string()),
            template_id: "tpl-1".to_string(),
            template_name: None,
            registry: Some(RegistryCoordinates {
                registry_client_id: "reg-1".to_string(),
                bucket_id: "bucket-1".to_string(),
                flow_id: "rf-1".to_string(),
            }),
            available_paths: Vec::new(),
            process_group_id: Some("root".to_string()),
            process_group_name: "east".to_string(),
            parameter_context_name: None,
            available_versions: Vec::new(),
            version: None,
        }
    }

    #[test]
    fn report_partitions_outcomes() {
        let mut report = DeploymentReport::new();
        report.record(ConfigOutcome::succeeded(&config(), None));
        report.record(ConfigOutcome::failed(&config(), "boom"));
        report.record(ConfigOutcome::failed(&config(), "boom again"));
        report.finish();

        assert_eq!(report.total(), 3);
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.failure_count(), 2);
        assert!(report.completed_at.is_some());
    }

    #[test]
    fn failure_reason_is_exposed() {
        let outcome = ConfigOutcome::failed(&config(), "Missing instance or process group");
        assert!(!outcome.is_success());
        assert_eq!(
            outcome.failure_reason(),
            Some("Missing instance or process group")
        );

        let outcome = ConfigOutcome::succeeded(&config(), None);
        assert!(outcome.failure_reason().is_none());
    }
}
