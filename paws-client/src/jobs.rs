//! Job registration endpoint

use async_trait::async_trait;
use tracing::info;

use crate::NomadClient;
use crate::error::Result;
use paws_core::domain::job::JobDefinition;
use paws_core::dto::job::{RegisterJobRequest, RegisterJobResponse};

/// Anything that can register a compiled job with a scheduler
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    /// Register `job`, returning the scheduler's acknowledgement
    async fn submit(&self, job: &JobDefinition) -> Result<RegisterJobResponse>;
}

impl NomadClient {
    // =============================================================================
    // Job Registration
    // =============================================================================

    /// Register a job
    ///
    /// Registering creates a new job or a new version of an existing one and
    /// triggers an evaluation.
    ///
    /// # Arguments
    /// * `job` - The compiled job definition
    ///
    /// # Returns
    /// The evaluation created for the job
    pub async fn register_job(&self, job: &JobDefinition) -> Result<RegisterJobResponse> {
        let url = format!("{}/v1/jobs", self.base_url);
        let body = RegisterJobRequest { job: job.clone() };

        info!("Registering job {} with {}", job.id, self.base_url);
        let response = self
            .authorize(self.client.put(&url))
            .json(&body)
            .send()
            .await?;

        self.handle_response(response).await
    }
}

#[async_trait]
impl JobSubmitter for NomadClient {
    async fn submit(&self, job: &JobDefinition) -> Result<RegisterJobResponse> {
        self.register_job(job).await
    }
}
