use crate::transports::TlsConfig;
use crate::{FileTransport, Mailer, MailerError, SmtpTransport};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailerConfig {
    pub transport: TransportConfig,
    pub from_address: String,
    pub from_name: Option<String>,
    pub app_name: String,
    pub app_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransportConfig {
    /// Plain-auth SMTP relay. When `username` is absent the sender address is used as the login,
    /// which is how mailbox providers such as Gmail expect app passwords to be presented.
    Smtp {
        host: String,
        port: Option<u16>,
        username: Option<String>,
        password: Option<String>,
        tls: Option<TlsType>,
    },
    File {
        output_dir: PathBuf,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsType {
    None,
    StartTls,
    Tls,
}

impl From<TlsType> for TlsConfig {
    fn from(tls_type: TlsType) -> Self {
        match tls_type {
            TlsType::None => TlsConfig::None,
            TlsType::StartTls => TlsConfig::StartTls,
            TlsType::Tls => TlsConfig::Tls,
        }
    }
}

const DEFAULT_OUTBOX: &str = "./emails";

fn env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

impl MailerConfig {
    /// Read the configuration from `MAILER_*` variables.
    ///
    /// `MAILER_SMTP_HOST` selects the SMTP transport; otherwise messages are written to
    /// `MAILER_FILE_OUTPUT_DIR` (default `./emails`).
    pub fn from_env() -> Result<Self, MailerError> {
        let transport = match env("MAILER_SMTP_HOST") {
            Some(host) => TransportConfig::Smtp {
                host,
                port: env("MAILER_SMTP_PORT").map(|v| parse_port(&v)).transpose()?,
                username: env("MAILER_SMTP_USERNAME"),
                password: env("MAILER_SMTP_PASSWORD"),
                tls: env("MAILER_SMTP_TLS").map(|v| parse_tls(&v)).transpose()?,
            },
            None => TransportConfig::File {
                output_dir: env("MAILER_FILE_OUTPUT_DIR")
                    .unwrap_or_else(|| DEFAULT_OUTBOX.to_string())
                    .into(),
            },
        };

        let defaults = Self::default();
        Ok(Self {
            transport,
            from_address: env("MAILER_FROM_ADDRESS").unwrap_or(defaults.from_address),
            from_name: env("MAILER_FROM_NAME"),
            app_name: env("MAILER_APP_NAME").unwrap_or(defaults.app_name),
            app_url: env("MAILER_APP_URL").unwrap_or(defaults.app_url),
        })
    }

    pub fn build_transport(&self) -> Result<Box<dyn Mailer>, MailerError> {
        match &self.transport {
            TransportConfig::Smtp {
                host,
                port,
                username,
                password,
                tls,
            } => {
                let mut builder = SmtpTransport::builder(host.as_str());
                if let Some(port) = *port {
                    builder = builder.port(port);
                }
                if let Some(tls) = tls {
                    builder = builder.tls(TlsConfig::from(tls.clone()));
                }
                // Mailbox providers expect the sender address as the login when none is given
                if let Some(password) = password {
                    let login = username.as_deref().unwrap_or(&self.from_address);
                    builder = builder.credentials(login, password.as_str());
                }
                Ok(Box::new(builder.build()?))
            }
            TransportConfig::File { output_dir } => {
                Ok(Box::new(FileTransport::new(output_dir.clone())?))
            }
        }
    }

    /// The `From` header value: `Name <address>` when a display name is configured.
    pub fn get_from_address(&self) -> String {
        match &self.from_name {
            Some(name) => format!("{name} <{}>", self.from_address),
            None => self.from_address.clone(),
        }
    }
}

fn parse_tls(value: &str) -> Result<TlsType, MailerError> {
    match value.to_ascii_lowercase().as_str() {
        "none" => Ok(TlsType::None),
        "starttls" | "start_tls" => Ok(TlsType::StartTls),
        "tls" => Ok(TlsType::Tls),
        other => Err(MailerError::Config(format!(
            "MAILER_SMTP_TLS must be one of none, starttls, tls (got {other})"
        ))),
    }
}

fn parse_port(value: &str) -> Result<u16, MailerError> {
    value
        .parse()
        .map_err(|e| MailerError::Config(format!("MAILER_SMTP_PORT is not a valid port: {e}")))
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig::File {
                output_dir: PathBuf::from(DEFAULT_OUTBOX),
            },
            from_address: "noreply@example.com".to_string(),
            from_name: None,
            app_name: "Warden".to_string(),
            app_url: "http://localhost:8080".to_string(),
        }
    }
}
