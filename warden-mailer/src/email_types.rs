use crate::{
    Email, MailerError,
    templates::{TemplateContext, VerificationCodeHtmlTemplate, VerificationCodeTextTemplate},
};
use askama::Template;

pub struct VerificationCodeEmail;

impl VerificationCodeEmail {
    pub fn build(
        from: &str,
        to: &str,
        code: &str,
        ttl_hours: u32,
        context: &TemplateContext,
    ) -> Result<Email, MailerError> {
        let html_body = VerificationCodeHtmlTemplate {
            app_name: context.app_name.clone(),
            app_url: context.app_url.clone(),
            user_email: context.user_email.clone(),
            code: code.to_string(),
            ttl_hours,
        }
        .render()?;

        let text_body = VerificationCodeTextTemplate {
            app_name: context.app_name.clone(),
            code: code.to_string(),
            ttl_hours,
        }
        .render()?;

        Email::builder()
            .from(from)
            .to(to)
            .subject(format!("Your {} verification code", context.app_name))
            .html_body(html_body)
            .text_body(text_body)
            .build()
    }
}
