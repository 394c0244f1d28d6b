use std::time::Duration;

use crate::message::build_message;
use crate::{Email, Mailer, MailerError};
use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

/// Connection security towards the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsConfig {
    /// Plaintext; only for local relays such as mailpit.
    None,
    #[default]
    StartTls,
    /// Implicit TLS from the first byte.
    Tls,
}

impl TlsConfig {
    /// Port a relay listens on for this mode when none is configured.
    pub fn default_port(self) -> u16 {
        match self {
            TlsConfig::None => 25,
            TlsConfig::StartTls => 587,
            TlsConfig::Tls => 465,
        }
    }
}

/// Hands messages to an SMTP relay, optionally authenticating with plain credentials.
#[derive(Debug, Clone)]
pub struct SmtpTransport {
    relay: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpTransport {
    pub fn builder(host: impl Into<String>) -> SmtpTransportBuilder {
        SmtpTransportBuilder {
            host: host.into(),
            port: None,
            login: None,
            tls: TlsConfig::default(),
            timeout: None,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

#[async_trait]
impl Mailer for SmtpTransport {
    async fn send_email(&self, email: Email) -> Result<(), MailerError> {
        let recipients = email.to.len() + email.cc.len() + email.bcc.len();
        let message = build_message(email)?;

        let response = self.relay.send(message).await?;
        tracing::debug!(
            host = %self.host,
            recipients,
            code = %response.code(),
            "Relay accepted message"
        );
        Ok(())
    }
}

pub struct SmtpTransportBuilder {
    host: String,
    port: Option<u16>,
    login: Option<(String, String)>,
    tls: TlsConfig,
    timeout: Option<Duration>,
}

impl SmtpTransportBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.login = Some((username.into(), password.into()));
        self
    }

    pub fn tls(mut self, tls: TlsConfig) -> Self {
        self.tls = tls;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<SmtpTransport, MailerError> {
        let relay = match self.tls {
            TlsConfig::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.host),
            TlsConfig::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)?,
            TlsConfig::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)?,
        };

        let mut relay = relay.port(self.port.unwrap_or(self.tls.default_port()));
        if self.timeout.is_some() {
            relay = relay.timeout(self.timeout);
        }
        if let Some((username, password)) = self.login {
            relay = relay.credentials(Credentials::new(username, password));
        }

        Ok(SmtpTransport {
            relay: relay.build(),
            host: self.host,
        })
    }
}
