use crate::MailerError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A file carried alongside the message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            content,
        }
    }

    /// Read an attachment from disk. The content type is left generic; mail clients sniff it
    /// from the file name.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MailerError> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|source| MailerError::Attachment {
            path: path.display().to_string(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());

        Ok(Self::new(filename, "application/octet-stream", content))
    }
}

/// A message ready for a transport. Addresses may carry a display name (`Name <addr>`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Email {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub from: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub html_body: Option<String>,
    pub text_body: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl Email {
    pub fn builder() -> EmailBuilder {
        EmailBuilder::default()
    }

    /// Check the fields every transport needs: a recipient, a sender, a subject and a body.
    pub fn validate(&self) -> Result<(), MailerError> {
        let problem = if self.to.is_empty() {
            "At least one recipient is required"
        } else if self.from.is_empty() {
            "From address is required"
        } else if self.subject.is_empty() {
            "Subject is required"
        } else if self.html_body.is_none() && self.text_body.is_none() {
            "Either HTML or text body is required"
        } else {
            return Ok(());
        };

        Err(MailerError::InvalidEmail(problem.to_string()))
    }
}

/// Which address list a recipient lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientKind {
    To,
    Cc,
    Bcc,
}

/// Collects the parts of an [`Email`]; [`EmailBuilder::build`] validates the result.
#[derive(Debug, Default)]
pub struct EmailBuilder {
    draft: Email,
}

impl EmailBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append recipients to one of the address lists.
    pub fn recipients<I, S>(mut self, kind: RecipientKind, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list = match kind {
            RecipientKind::To => &mut self.draft.to,
            RecipientKind::Cc => &mut self.draft.cc,
            RecipientKind::Bcc => &mut self.draft.bcc,
        };
        list.extend(addresses.into_iter().map(Into::into));
        self
    }

    pub fn to(self, address: impl Into<String>) -> Self {
        self.recipients(RecipientKind::To, [address])
    }

    pub fn cc(self, address: impl Into<String>) -> Self {
        self.recipients(RecipientKind::Cc, [address])
    }

    pub fn bcc(self, address: impl Into<String>) -> Self {
        self.recipients(RecipientKind::Bcc, [address])
    }

    pub fn from(mut self, address: impl Into<String>) -> Self {
        self.draft.from = address.into();
        self
    }

    pub fn reply_to(mut self, address: impl Into<String>) -> Self {
        self.draft.reply_to = Some(address.into());
        self
    }

    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.draft.subject = subject.into();
        self
    }

    pub fn html_body(mut self, html: impl Into<String>) -> Self {
        self.draft.html_body = Some(html.into());
        self
    }

    pub fn text_body(mut self, text: impl Into<String>) -> Self {
        self.draft.text_body = Some(text.into());
        self
    }

    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.draft.attachments.push(attachment);
        self
    }

    pub fn build(self) -> Result<Email, MailerError> {
        self.draft.validate()?;
        Ok(self.draft)
    }
}
