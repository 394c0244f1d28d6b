use thiserror::Error;

/// Failures while composing or handing off a message.
///
/// Delivery is attempted once; callers decide whether to retry.
#[derive(Error, Debug)]
pub enum MailerError {
    #[error("SMTP relay error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("File transport error: {0}")]
    File(#[from] lettre::transport::file::Error),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Invalid mailbox: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Failed to assemble message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("Failed to render template: {0}")]
    Template(#[from] askama::Error),

    #[error("Cannot attach {path}: {source}")]
    Attachment {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Mailer misconfigured: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MailerError>;
