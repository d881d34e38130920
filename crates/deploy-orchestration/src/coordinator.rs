//! Sequential deployment coordinator
//!
//! Executes an ordered batch of deployment configs against the backend,
//! one at a time: a config's round-trip (or its interactive conflict
//! resolution) completes before the next config is dispatched. Sequential
//! dispatch is intentional — it bounds backend load and is what makes the
//! destination-before-source ordering guarantee meaningful.

use crate::config::DeploymentConfig;
use crate::conflict::{ConflictAction, ConflictResolver, PendingConflict};
use crate::naming::sort_deployment_configs;
use crate::report::{ConfigOutcome, DeploymentReport};
use async_trait::async_trait;
use platform_client::{
    ConflictInfo, DeployRequest, DeployResponse, DeploymentSettings, Error as ClientError,
    PlatformClient,
};
use std::sync::Arc;
use tracing::{info, warn};

/// The remote operations the coordinator drives.
///
/// [`PlatformClient`] is the production implementation; tests substitute
/// their own.
#[async_trait]
pub trait DeployBackend: Send + Sync {
    /// Deploy a flow onto an instance.
    async fn deploy(
        &self,
        instance_id: &str,
        request: &DeployRequest,
    ) -> Result<DeployResponse, ClientError>;

    /// Delete a process group from an instance.
    async fn delete_process_group(
        &self,
        instance_id: &str,
        process_group_id: &str,
    ) -> Result<(), ClientError>;

    /// Move a version-controlled process group to another version.
    async fn update_process_group_version(
        &self,
        instance_id: &str,
        process_group_id: &str,
        version: Option<i64>,
    ) -> Result<(), ClientError>;
}

#[async_trait]
impl DeployBackend for PlatformClient {
    async fn deploy(
        &self,
        instance_id: &str,
        request: &DeployRequest,
    ) -> Result<DeployResponse, ClientError> {
        PlatformClient::deploy(self, instance_id, request).await
    }

    async fn delete_process_group(
        &self,
        instance_id: &str,
        process_group_id: &str,
    ) -> Result<(), ClientError> {
        PlatformClient::delete_process_group(self, instance_id, process_group_id).await
    }

    async fn update_process_group_version(
        &self,
        instance_id: &str,
        process_group_id: &str,
        version: Option<i64>,
    ) -> Result<(), ClientError> {
        PlatformClient::update_process_group_version(self, instance_id, process_group_id, version)
            .await
    }
}

/// Drives one deployment batch to completion.
///
/// Holds no state across batches: [`run`](DeploymentCoordinator::run)
/// returns the terminal [`DeploymentReport`] and the coordinator is done.
pub struct DeploymentCoordinator {
    backend: Arc<dyn DeployBackend>,
    resolver: Arc<dyn ConflictResolver>,
    settings: DeploymentSettings,
}

impl DeploymentCoordinator {
    /// Create a coordinator over a backend and a conflict resolver.
    pub fn new(
        backend: Arc<dyn DeployBackend>,
        resolver: Arc<dyn ConflictResolver>,
        settings: DeploymentSettings,
    ) -> Self {
        Self {
            backend,
            resolver,
            settings,
        }
    }

    /// Execute the batch in sorted order and return the aggregate report.
    ///
    /// Every failure is terminal for its config and non-fatal for the
    /// batch; the loop always proceeds to the next config.
    pub async fn run(&self, configs: Vec<DeploymentConfig>) -> DeploymentReport {
        let configs = sort_deployment_configs(configs);
        info!("Deploying {} configurations", configs.len());

        let mut report = DeploymentReport::new();
        for config in &configs {
            let outcome = self.deploy_one(config).await;
            match outcome.failure_reason() {
                None => info!("Deployed '{}'", config.key),
                Some(reason) => warn!("'{}' failed: {}", config.key, reason),
            }
            report.record(outcome);
        }
        report.finish();

        info!(
            "Deployment finished: {}/{} succeeded",
            report.success_count(),
            report.total()
        );
        report
    }

    /// Per-config state machine: validate, dispatch, and on conflict
    /// suspend until the resolver supplies a remediation.
    async fn deploy_one(&self, config: &DeploymentConfig) -> ConfigOutcome {
        let (Some(instance_id), Some(_)) = (
            config.instance_id.as_deref(),
            config.process_group_id.as_deref(),
        ) else {
            return ConfigOutcome::failed(config, "Missing instance or process group");
        };

        let Some(request) = config.deploy_request(&self.settings) else {
            return ConfigOutcome::failed(config, "Missing registry coordinates");
        };

        match self.backend.deploy(instance_id, &request).await {
            Ok(response) => ConfigOutcome::succeeded(config, Some(response)),
            Err(ClientError::Conflict(existing)) => {
                self.resolve_conflict(config, instance_id, &request, existing)
                    .await
            }
            Err(error) => ConfigOutcome::failed(config, error.to_string()),
        }
    }

    async fn resolve_conflict(
        &self,
        config: &DeploymentConfig,
        instance_id: &str,
        request: &DeployRequest,
        existing: ConflictInfo,
    ) -> ConfigOutcome {
        warn!(
            "deploy of '{}' blocked by existing process group '{}' ({} running, {} stopped)",
            request.process_group_name, existing.name, existing.running_count,
            existing.stopped_count
        );

        let pending = PendingConflict {
            config_key: config.key.clone(),
            process_group_name: request.process_group_name.clone(),
            existing: existing.clone(),
        };

        match self.resolver.resolve(pending).await {
            ConflictAction::Skip => {
                ConfigOutcome::failed(config, "Deployment skipped due to conflict")
            }
            ConflictAction::Delete => {
                if let Err(error) = self
                    .backend
                    .delete_process_group(instance_id, &existing.id)
                    .await
                {
                    return ConfigOutcome::failed(
                        config,
                        format!("Failed to delete conflicting process group: {error}"),
                    );
                }
                // Exactly one retry; its outcome is final either way.
                match self.backend.deploy(instance_id, request).await {
                    Ok(response) => ConfigOutcome::succeeded(config, Some(response)),
                    Err(error) => ConfigOutcome::failed(config, error.to_string()),
                }
            }
            ConflictAction::Update => {
                match self
                    .backend
                    .update_process_group_version(instance_id, &existing.id, config.version)
                    .await
                {
                    Ok(()) => ConfigOutcome::succeeded(config, None),
                    Err(error) => ConfigOutcome::failed(config, error.to_string()),
                }
            }
        }
    }
}
