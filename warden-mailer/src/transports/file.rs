use crate::message::build_message;
use crate::{Email, Mailer, MailerError};
use async_trait::async_trait;
use lettre::Transport;
use lettre::transport::file::FileTransport as LettreFileTransport;
use std::path::{Path, PathBuf};

/// Writes each message as an `.eml` file named after its message id. Used for local
/// development and tests.
#[derive(Debug, Clone)]
pub struct FileTransport {
    outbox: LettreFileTransport,
    output_dir: PathBuf,
}

impl FileTransport {
    /// Create the transport, creating `output_dir` and its parents when missing.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self, MailerError> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;

        Ok(Self {
            outbox: LettreFileTransport::new(&output_dir),
            output_dir,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

#[async_trait]
impl Mailer for FileTransport {
    async fn send_email(&self, email: Email) -> Result<(), MailerError> {
        let message = build_message(email)?;
        let outbox = self.outbox.clone();

        // lettre writes the file synchronously
        let id = tokio::task::spawn_blocking(move || outbox.send(&message))
            .await
            .map_err(|e| MailerError::Delivery(format!("File transport task failed: {e}")))??;

        tracing::debug!(id = %id, dir = %self.output_dir.display(), "Wrote email to outbox");
        Ok(())
    }
}
