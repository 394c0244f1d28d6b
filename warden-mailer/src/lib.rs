//! # Warden Mailer
//!
//! Email delivery used by the warden coordinator to hand verification codes to users.
//!
//! Delivery is synchronous from the caller's point of view: a transport either accepts the
//! message or returns a [`MailerError`]. There is no retry queue; the caller decides whether to
//! re-issue a code.
pub mod config;
pub mod email;
pub mod email_types;
pub mod error;
pub mod mailer;
mod message;
pub mod templates;
pub mod transports;

pub use config::{MailerConfig, TlsType, TransportConfig};
pub use email::{Attachment, Email, EmailBuilder, RecipientKind};
pub use email_types::VerificationCodeEmail;
pub use error::MailerError;
pub use mailer::{Mailer, MailerService};
pub use templates::TemplateContext;
pub use transports::{FileTransport, SmtpTransport, TlsConfig};

pub mod prelude {
    pub use crate::{
        Attachment, Email, EmailBuilder, FileTransport, Mailer, MailerConfig, MailerError,
        MailerService, SmtpTransport, TemplateContext, VerificationCodeEmail,
    };
}
