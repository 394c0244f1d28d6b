mod verification;

pub use verification::{VerificationCodeHtmlTemplate, VerificationCodeTextTemplate};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateContext {
    pub app_name: String,
    pub app_url: String,
    pub user_email: Option<String>,
}

impl Default for TemplateContext {
    fn default() -> Self {
        Self {
            app_name: "Warden".to_string(),
            app_url: "http://localhost:8080".to_string(),
            user_email: None,
        }
    }
}

impl From<&crate::MailerConfig> for TemplateContext {
    fn from(config: &crate::MailerConfig) -> Self {
        Self {
            app_name: config.app_name.clone(),
            app_url: config.app_url.clone(),
            user_email: None,
        }
    }
}
