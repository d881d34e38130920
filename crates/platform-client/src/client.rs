//! HTTP client for the admin REST API

use crate::models::{
    AllPathsResponse, ConflictPayload, DeployRequest, DeployResponse, DeploymentSettings, Flow,
    FlowVersion, HierarchyAttribute, Instance, Job, JobProgress, ProcessGroupPath, RegistryFlow,
    UpdateVersionRequest,
};
use crate::{Error, Result};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Client for the flow-orchestration platform's admin REST API.
///
/// Holds one reused [`reqwest::Client`]; all calls are relative to the
/// configured base URL and authenticate with an optional bearer token.
#[derive(Debug, Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl PlatformClient {
    /// Create a client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            token: None,
        }
    }

    /// Attach a bearer token used on every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.endpoint(path);
        debug!("{} {}", method, url);
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Turn a non-success response into [`Error::Api`].
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(Error::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    /// Ordered hierarchy attribute list.
    pub async fn hierarchy(&self) -> Result<Vec<HierarchyAttribute>> {
        let mut attributes: Vec<HierarchyAttribute> = self.get_json("hierarchy").await?;
        attributes.sort_by_key(|attribute| attribute.order);
        Ok(attributes)
    }

    /// All known flow definitions.
    pub async fn flows(&self) -> Result<Vec<Flow>> {
        self.get_json("flows").await
    }

    /// All known runtime instances.
    pub async fn instances(&self) -> Result<Vec<Instance>> {
        self.get_json("instances").await
    }

    /// All known registry flow records.
    pub async fn registry_flows(&self) -> Result<Vec<RegistryFlow>> {
        self.get_json("registry-flows").await
    }

    /// Read the persisted deployment settings.
    pub async fn deployment_settings(&self) -> Result<DeploymentSettings> {
        self.get_json("nifi/hierarchy/deploy").await
    }

    /// Persist deployment settings.
    pub async fn save_deployment_settings(&self, settings: &DeploymentSettings) -> Result<()> {
        let response = self
            .request(Method::POST, "nifi/hierarchy/deploy")
            .json(settings)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Deployable process-group paths of one instance.
    ///
    /// An instance whose canvas holds no groups yet reports none; that case
    /// yields a synthetic root entry rather than an error.
    pub async fn process_group_paths(&self, instance_id: &str) -> Result<Vec<ProcessGroupPath>> {
        let response: AllPathsResponse = self
            .get_json(&format!(
                "instances/{instance_id}/ops/process-groups/all-paths"
            ))
            .await?;
        Ok(response.into_paths())
    }

    /// Available versions of one registry flow, as seen by one instance.
    pub async fn flow_versions(
        &self,
        instance_id: &str,
        registry_client_id: &str,
        bucket_id: &str,
        flow_id: &str,
    ) -> Result<Vec<FlowVersion>> {
        self.get_json(&format!(
            "instances/{instance_id}/ops/registries/{registry_client_id}/buckets/{bucket_id}/flows/{flow_id}/versions"
        ))
        .await
    }

    /// Deploy a flow onto an instance.
    ///
    /// A 409 response is decoded into [`Error::Conflict`] carrying the
    /// blocking process group.
    pub async fn deploy(
        &self,
        instance_id: &str,
        request: &DeployRequest,
    ) -> Result<DeployResponse> {
        let response = self
            .request(Method::POST, &format!("instances/{instance_id}/deploy"))
            .json(request)
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            let payload: ConflictPayload = response.json().await?;
            return Err(Error::Conflict(payload.existing_process_group));
        }

        Ok(Self::check(response).await?.json().await?)
    }

    /// Delete a process group from an instance.
    pub async fn delete_process_group(
        &self,
        instance_id: &str,
        process_group_id: &str,
    ) -> Result<()> {
        let response = self
            .request(
                Method::DELETE,
                &format!("instances/{instance_id}/process-groups/{process_group_id}"),
            )
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Move a version-controlled process group to another version.
    pub async fn update_process_group_version(
        &self,
        instance_id: &str,
        process_group_id: &str,
        version: Option<i64>,
    ) -> Result<()> {
        let response = self
            .request(
                Method::PUT,
                &format!("instances/{instance_id}/process-groups/{process_group_id}/version"),
            )
            .json(&UpdateVersionRequest { version })
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// All background jobs known to the backend.
    pub async fn jobs(&self) -> Result<Vec<Job>> {
        self.get_json("jobs").await
    }

    /// Progress of a single background job.
    pub async fn job_progress(&self, job_id: &str) -> Result<JobProgress> {
        self.get_json(&format!("jobs/{job_id}/progress")).await
    }
}
