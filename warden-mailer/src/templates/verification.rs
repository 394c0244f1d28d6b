use askama::Template;

#[derive(Template)]
#[template(
    source = r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Verification code - {{ app_name }}</title>
    <style>
        body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; margin: 0; padding: 20px; background-color: #f4f4f4; }
        .container { max-width: 600px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; }
        .code { font-size: 28px; letter-spacing: 6px; font-family: monospace; text-align: center; background: #f8f9fa; padding: 16px; border-radius: 4px; }
        .footer { margin-top: 30px; padding-top: 20px; border-top: 1px solid #eee; font-size: 12px; color: #666; }
    </style>
</head>
<body>
    <div class="container">
        <h1>{{ app_name }}</h1>

        <p>{% if let Some(email) = user_email %}Hello {{ email }},{% else %}Hello,{% endif %}</p>

        <p>Use the code below to confirm this email address. It expires in {{ ttl_hours }} hour{% if ttl_hours != 1 %}s{% endif %}.</p>

        <p class="code">{{ code }}</p>

        <p>If you didn't request this code, you can safely ignore this email.</p>

        <div class="footer">
            <p>Sent by <a href="{{ app_url }}">{{ app_name }}</a>.</p>
        </div>
    </div>
</body>
</html>
"#,
    ext = "html"
)]
pub struct VerificationCodeHtmlTemplate {
    pub app_name: String,
    pub app_url: String,
    pub user_email: Option<String>,
    pub code: String,
    pub ttl_hours: u32,
}

#[derive(Template)]
#[template(
    source = r#"{{ app_name }}

Your verification code is: {{ code }}

It expires in {{ ttl_hours }} hour{% if ttl_hours != 1 %}s{% endif %}. If you didn't request this code, you can safely ignore this email.
"#,
    ext = "txt"
)]
pub struct VerificationCodeTextTemplate {
    pub app_name: String,
    pub code: String,
    pub ttl_hours: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_template_renders_code() {
        let template = VerificationCodeHtmlTemplate {
            app_name: "Warden".to_string(),
            app_url: "https://warden.example.com".to_string(),
            user_email: Some("a@x.com".to_string()),
            code: "Qz81Lm".to_string(),
            ttl_hours: 3,
        };

        let html = template.render().unwrap();
        assert!(html.contains("Qz81Lm"));
        assert!(html.contains("Hello a@x.com,"));
        assert!(html.contains("expires in 3 hours"));
    }

    #[test]
    fn test_text_template_singular_hour() {
        let template = VerificationCodeTextTemplate {
            app_name: "Warden".to_string(),
            code: "Qz81Lm".to_string(),
            ttl_hours: 1,
        };

        let text = template.render().unwrap();
        assert!(text.contains("Your verification code is: Qz81Lm"));
        assert!(text.contains("expires in 1 hour."));
    }
}
