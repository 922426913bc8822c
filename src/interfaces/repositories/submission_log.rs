use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use uuid::Uuid;

use crate::{
    entities::submission::{NotificationOutcome, Submission},
    errors::LogError,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn append(&self, submission: &Submission) -> Result<(), LogError>;
    async fn record_outcome(&self, id: &Uuid, outcome: &NotificationOutcome) -> Result<(), LogError>;
    async fn list(&self) -> Result<Vec<Submission>, LogError>;
}

/// Submission log kept as a single JSON array document.
///
/// Every mutation reads the whole document, changes it and writes it back.
/// The cycle runs under one lock so concurrent requests cannot lose each
/// other's entries. The new document is written to a sibling file and renamed
/// into place, so a failed write leaves the previous document intact.
pub struct JsonFileSubmissionLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileSubmissionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileSubmissionLog {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> Result<Vec<Submission>, LogError> {
        match fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(LogError::Corrupt),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_document(&self, submissions: &[Submission]) -> Result<(), LogError> {
        let bytes = serde_json::to_vec_pretty(submissions)
            .map_err(|e| LogError::Serialize(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let staging = staging_path(&self.path);
        let mut file = fs::File::create(&staging).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SubmissionRepository for JsonFileSubmissionLog {
    async fn append(&self, submission: &Submission) -> Result<(), LogError> {
        let _guard = self.lock.lock().await;

        let mut submissions = self.read_document().await?;
        submissions.push(submission.clone());
        self.write_document(&submissions).await?;

        tracing::debug!(id = %submission.id, total = submissions.len(), "Submission appended");
        Ok(())
    }

    async fn record_outcome(&self, id: &Uuid, outcome: &NotificationOutcome) -> Result<(), LogError> {
        let _guard = self.lock.lock().await;

        let mut submissions = self.read_document().await?;
        let entry = submissions
            .iter_mut()
            .find(|s| s.id == *id)
            .ok_or(LogError::UnknownSubmission(*id))?;
        entry.apply_outcome(outcome);

        self.write_document(&submissions).await
    }

    async fn list(&self) -> Result<Vec<Submission>, LogError> {
        let _guard = self.lock.lock().await;
        self.read_document().await
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "submissions.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}
