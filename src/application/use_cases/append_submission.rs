use crate::domain::csv::{append_row, CsvRow};
use crate::domain::error::Result;
use crate::domain::submission::Submission;
use crate::infrastructure::blob_store::BlobStore;
use chrono::{DateTime, Utc};
use tracing::info;

/// Appends one submission as a CSV row to the submissions file.
///
/// One read followed by one write. A concurrent writer between the two makes
/// the write fail on the version check, and that failure is returned as is.
pub struct AppendSubmissionUseCase {
    csv_path: String,
    commit_message: String,
}

impl AppendSubmissionUseCase {
    pub fn new(csv_path: &str, commit_message: &str) -> Self {
        Self {
            csv_path: csv_path.to_string(),
            commit_message: commit_message.to_string(),
        }
    }

    pub async fn execute(&self, store: &dyn BlobStore, submission: &Submission) -> Result<()> {
        self.execute_at(store, submission, Utc::now()).await
    }

    pub async fn execute_at(
        &self,
        store: &dyn BlobStore,
        submission: &Submission,
        received_at: DateTime<Utc>,
    ) -> Result<()> {
        submission.validate_required()?;

        let row = CsvRow::from_submission(submission, received_at);
        let current = store.fetch(&self.csv_path).await?;
        let content = append_row(current.content(), &row);

        store
            .store(
                &self.csv_path,
                &content,
                current.version(),
                &self.commit_message,
            )
            .await?;

        info!(
            "Submission appended (path={} created={})",
            self.csv_path,
            current.version().is_none()
        );
        Ok(())
    }
}
