//! Background job monitoring
//!
//! The jobs view is a fixed-interval refetch, not a scheduler: polling
//! runs while at least one job is active and stops automatically once
//! none are. It is independent of the deployment coordinator and never
//! touches its state.

use async_trait::async_trait;
use platform_client::{Error as ClientError, Job, PlatformClient};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Source of job snapshots.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Fetch the current jobs.
    async fn jobs(&self) -> Result<Vec<Job>, ClientError>;
}

#[async_trait]
impl JobSource for PlatformClient {
    async fn jobs(&self) -> Result<Vec<Job>, ClientError> {
        PlatformClient::jobs(self).await
    }
}

/// Fixed-interval job poller.
pub struct JobMonitor {
    source: Arc<dyn JobSource>,
    interval: Duration,
}

impl JobMonitor {
    /// Create a monitor polling `source` every `interval`.
    pub fn new(source: Arc<dyn JobSource>, interval: Duration) -> Self {
        Self { source, interval }
    }

    /// Poll until no job is active, handing every snapshot (including the
    /// final idle one) to `on_update`. Returns the final snapshot.
    pub async fn watch<F>(&self, mut on_update: F) -> Result<Vec<Job>, ClientError>
    where
        F: FnMut(&[Job]),
    {
        loop {
            let jobs = self.source.jobs().await?;
            on_update(&jobs);

            let active = jobs.iter().filter(|job| job.state.is_active()).count();
            if active == 0 {
                debug!("no active jobs; stopping poll loop");
                return Ok(jobs);
            }
            debug!("{} active jobs; next poll in {:?}", active, self.interval);
            tokio::time::sleep(self.interval).await;
        }
    }
}
