//! Client side of the survey submission endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::rest::dto::SurveySubmission;

/// Shown when the server rejects a submission without saying why
pub const DEFAULT_REJECTION_MESSAGE: &str = "Failed to submit";
/// Shown for transport failures and anything unexpected
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Server answered with a non-2xx status
    #[error("submission rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
    /// Request never completed
    #[error("submission failed: {0}")]
    Network(String),
}

impl SubmitError {
    /// Text for the inline error under the submit button
    pub fn user_message(&self) -> &str {
        match self {
            SubmitError::Rejected { message, .. } => message,
            SubmitError::Network(_) => GENERIC_FAILURE_MESSAGE,
        }
    }
}

/// What the server returned for a stored survey
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmissionReceipt {
    #[serde(default)]
    pub id: Option<String>,
}

/// Sends a completed survey
#[async_trait]
pub trait SubmissionClient: Send + Sync {
    async fn submit(&self, submission: &SurveySubmission) -> Result<SubmissionReceipt, SubmitError>;
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    /// Prefer the human message, then the error code, then the default
    fn into_message(self) -> String {
        self.message
            .filter(|m| !m.trim().is_empty())
            .or(self.error.filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string())
    }
}

/// Posts surveys as JSON to a fixed endpoint
pub struct HttpSubmissionClient {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpSubmissionClient {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, SubmitError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            "signup/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SubmissionClient for HttpSubmissionClient {
    async fn submit(&self, submission: &SurveySubmission) -> Result<SubmissionReceipt, SubmitError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(endpoint = %self.endpoint, error = %e, "Survey submission failed");
                SubmitError::Network(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            // The id is informational; a 2xx without one still counts
            let receipt = response.json::<SubmissionReceipt>().await.unwrap_or_default();
            tracing::info!(id = ?receipt.id, "Survey submitted");
            return Ok(receipt);
        }

        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        let message = body.into_message();
        tracing::warn!(status = status.as_u16(), %message, "Survey submission rejected");
        Err(SubmitError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
