//! Paws Nomad Client
//!
//! A small, type-safe HTTP client for registering compiled jobs with a Nomad
//! cluster.
//!
//! # Example
//!
//! ```no_run
//! use paws_client::NomadClient;
//! use paws_core::domain::job::JobDefinition;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), paws_client::ClientError> {
//!     let client = NomadClient::new("http://127.0.0.1:4646");
//!     let job = JobDefinition::batch("example-badger-paws", "global", 50);
//!
//!     let response = client.register_job(&job).await?;
//!     println!("Evaluation: {}", response.eval_id);
//!     Ok(())
//! }
//! ```

pub mod error;
mod jobs;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use jobs::JobSubmitter;
pub use paws_core::dto::job::RegisterJobResponse;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Default Nomad HTTP address
pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:4646";

/// Header carrying the ACL token
const TOKEN_HEADER: &str = "X-Nomad-Token";

/// HTTP client for the Nomad API
#[derive(Debug, Clone)]
pub struct NomadClient {
    /// Base URL of the Nomad agent (e.g., "http://127.0.0.1:4646")
    base_url: String,
    /// ACL token sent with every request, if any
    token: Option<String>,
    /// HTTP client instance
    client: Client,
}

impl NomadClient {
    /// Create a new Nomad client
    ///
    /// An empty address falls back to [`DEFAULT_ADDRESS`].
    ///
    /// # Example
    /// ```
    /// use paws_client::NomadClient;
    ///
    /// let client = NomadClient::new("http://127.0.0.1:4646");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new Nomad client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        let base_url = if base_url.is_empty() {
            DEFAULT_ADDRESS.to_string()
        } else {
            base_url.trim_end_matches('/').to_string()
        };
        Self {
            base_url,
            token: None,
            client,
        }
    }

    /// Attach an ACL token
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Get the base URL of the Nomad agent
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Add authentication to a request
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(TOKEN_HEADER, token),
            None => request,
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Nomad reports errors as plain text bodies; those are carried in
    /// [`ClientError::ApiError`].
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
