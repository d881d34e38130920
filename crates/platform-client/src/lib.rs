//! # Platform client
//!
//! Typed HTTP client for the flow-orchestration platform's admin REST API.
//!
//! The backend owns all durable state: flow definitions, runtime instances,
//! naming hierarchies, deployment settings and background jobs. This crate
//! only models those resources and the calls the console issues against
//! them. Deploy conflicts (an existing process group at the target
//! location) surface as a typed [`Error::Conflict`] so callers can resolve
//! them interactively instead of treating them as hard failures.
//!
//! ## Example
//!
//! ```rust,no_run
//! use platform_client::PlatformClient;
//!
//! # async fn example() -> Result<(), platform_client::Error> {
//! let client = PlatformClient::new("https://console.example.com/api");
//! let instances = client.instances().await?;
//! for instance in &instances {
//!     println!("{} ({}={})", instance.id, instance.hierarchy_attribute, instance.hierarchy_value);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]

mod client;
mod error;
mod models;

pub use client::PlatformClient;
pub use error::Error;
pub use models::{
    AllPathsResponse, ConflictInfo, ConflictPayload, DeployRequest, DeployResponse,
    DeploymentSettings, Flow, FlowVersion, HierarchyAttribute, HierarchySides, Instance,
    InstancePaths, Job, JobProgress, JobState, ProcessGroupPath, RegistryFlow,
    UpdateVersionRequest,
};

/// Convenience result alias for platform API calls.
pub type Result<T> = std::result::Result<T, Error>;
