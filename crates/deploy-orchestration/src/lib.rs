//! # Deployment orchestration
//!
//! Client-side orchestration of flow deployments: deriving per-target
//! deployment configurations from user selections, resolving generated
//! names and target paths, ordering configurations so receiving instances
//! are provisioned before sending instances, and executing the ordered
//! batch sequentially against the backend with interactive conflict
//! resolution.
//!
//! The durable state lives in the backend reached through
//! [`platform_client`]; everything here is derived, short-lived and
//! discarded once a deployment batch completes.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use deploy_orchestration::{ConflictAction, DeploymentCoordinator, FixedResolver};
//! use platform_client::{DeploymentSettings, PlatformClient};
//!
//! # async fn example(configs: Vec<deploy_orchestration::DeploymentConfig>) {
//! let client = Arc::new(PlatformClient::new("https://console.example.com/api"));
//! let resolver = Arc::new(FixedResolver::new(ConflictAction::Skip));
//! let coordinator = DeploymentCoordinator::new(client, resolver, DeploymentSettings::default());
//! let report = coordinator.run(configs).await;
//! println!("{} succeeded, {} failed", report.success_count(), report.failure_count());
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]

mod builder;
mod config;
mod conflict;
mod coordinator;
mod jobs;
mod naming;
mod report;

pub use builder::build_deployment_configs;
pub use config::{Direction, DirectionChoice, DeploymentConfig, RegistryCoordinates};
pub use conflict::{
    ChannelResolver, ConflictAction, ConflictRequest, ConflictResolver, FixedResolver,
    PendingConflict,
};
pub use coordinator::{DeployBackend, DeploymentCoordinator};
pub use jobs::{JobMonitor, JobSource};
pub use naming::{
    auto_select_process_group, configured_base_path, generate_process_group_name,
    sort_deployment_configs, suggested_path,
};
pub use report::{ConfigOutcome, DeploymentReport, OutcomeStatus};
