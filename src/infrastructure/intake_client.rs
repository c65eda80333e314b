use crate::domain::error::{AppError, Result};
use crate::domain::submission::Submission;
use serde::Deserialize;
use tracing::warn;

/// Page the form navigates to after a successful submission.
pub const SUCCESS_REDIRECT: &str = "/success";

/// What the form shows while and after submitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionStatus {
    Submitting,
    Received { redirect_to: String },
    Failed(String),
}

impl SubmissionStatus {
    pub fn message(&self) -> &str {
        match self {
            SubmissionStatus::Submitting => "Submitting…",
            SubmissionStatus::Received { .. } => "Thanks! Submission received.",
            SubmissionStatus::Failed(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, SubmissionStatus::Failed(_))
    }
}

#[derive(Debug, Default, Deserialize)]
struct AppendResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Posts collected submissions to the append endpoint.
pub struct IntakeClient {
    client: reqwest::Client,
    endpoint: String,
}

impl IntakeClient {
    pub fn new(client: reqwest::Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }

    /// Sends one submission. Failures are reported, never retried, so the
    /// form stays resubmittable.
    pub async fn submit(&self, submission: &Submission) -> SubmissionStatus {
        match self.post(submission).await {
            Ok(()) => SubmissionStatus::Received {
                redirect_to: SUCCESS_REDIRECT.to_string(),
            },
            Err(err) => {
                warn!("Submission failed: {}", err);
                SubmissionStatus::Failed(err.message().to_string())
            }
        }
    }

    async fn post(&self, submission: &Submission) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(submission)
            .send()
            .await
            .map_err(|e| AppError::UpstreamError(e.to_string()))?;

        let status = response.status();
        // An unreadable body counts as `{}`.
        let body: AppendResponse = response.json().await.unwrap_or_default();

        if !status.is_success() || !body.ok {
            return Err(AppError::UpstreamError(
                body.error.unwrap_or_else(|| "Submission failed".to_string()),
            ));
        }

        Ok(())
    }
}
