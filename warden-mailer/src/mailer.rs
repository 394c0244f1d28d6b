use crate::{
    Attachment, Email, MailerConfig, MailerError, RecipientKind, TemplateContext,
    VerificationCodeEmail,
};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_email(&self, email: Email) -> Result<(), MailerError>;
}

#[async_trait]
impl<M: Mailer + ?Sized> Mailer for Box<M> {
    async fn send_email(&self, email: Email) -> Result<(), MailerError> {
        (**self).send_email(email).await
    }
}

#[async_trait]
impl<M: Mailer + ?Sized> Mailer for Arc<M> {
    async fn send_email(&self, email: Email) -> Result<(), MailerError> {
        (**self).send_email(email).await
    }
}

/// Sends mail on behalf of a fixed sender identity.
#[derive(Debug, Clone)]
pub struct MailerService<T: Mailer> {
    transport: T,
    from: String,
    context: TemplateContext,
}

impl<T: Mailer> MailerService<T> {
    pub fn new(transport: T, from: impl Into<String>, context: TemplateContext) -> Self {
        Self {
            transport,
            from: from.into(),
            context,
        }
    }

    pub fn from_address(&self) -> &str {
        &self.from
    }

    pub async fn send(&self, email: Email) -> Result<(), MailerError> {
        self.transport.send_email(email).await
    }

    /// Send an HTML message from the configured sender.
    ///
    /// Attachments that cannot be read are skipped with a warning; the message is still sent.
    pub async fn send_html(
        &self,
        subject: &str,
        to: &[String],
        html_body: &str,
        cc: &[String],
        bcc: &[String],
        attachments: &[PathBuf],
    ) -> Result<(), MailerError> {
        let mut builder = Email::builder()
            .from(self.from.as_str())
            .recipients(RecipientKind::To, to.iter().cloned())
            .recipients(RecipientKind::Cc, cc.iter().cloned())
            .recipients(RecipientKind::Bcc, bcc.iter().cloned())
            .subject(subject)
            .html_body(html_body);

        for path in attachments {
            match Attachment::from_path(path) {
                Ok(attachment) => builder = builder.attachment(attachment),
                Err(error) => {
                    tracing::warn!(path = %path.display(), error = %error, "Skipping attachment");
                }
            }
        }

        self.transport.send_email(builder.build()?).await
    }

    pub async fn send_verification_code(
        &self,
        to: &str,
        code: &str,
        ttl_hours: u32,
    ) -> Result<(), MailerError> {
        let context = TemplateContext {
            user_email: Some(to.to_string()),
            ..self.context.clone()
        };
        let email = VerificationCodeEmail::build(&self.from, to, code, ttl_hours, &context)?;

        tracing::debug!(to = %to, "Sending verification code email");
        self.transport.send_email(email).await
    }
}

impl MailerService<Box<dyn Mailer>> {
    pub fn from_config(config: &MailerConfig) -> Result<Self, MailerError> {
        Ok(Self::new(
            config.build_transport()?,
            config.get_from_address(),
            TemplateContext::from(config),
        ))
    }
}

#[async_trait]
impl<T: Mailer> Mailer for MailerService<T> {
    async fn send_email(&self, email: Email) -> Result<(), MailerError> {
        self.transport.send_email(email).await
    }
}
