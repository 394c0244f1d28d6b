use crate::{Email, MailerError};
use lettre::Message;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as AttachmentPart, MultiPart, SinglePart};

enum Body {
    Single(SinglePart),
    Multi(MultiPart),
}

/// Convert an [`Email`] into a lettre message shared by every transport.
///
/// Bodies with both HTML and text become `multipart/alternative`; attachments wrap the body in
/// `multipart/mixed`.
pub(crate) fn build_message(email: Email) -> Result<Message, MailerError> {
    let mut message_builder = Message::builder()
        .from(email.from.parse()?)
        .subject(email.subject);

    for to in email.to {
        message_builder = message_builder.to(to.parse()?);
    }

    for cc in email.cc {
        message_builder = message_builder.cc(cc.parse()?);
    }

    for bcc in email.bcc {
        message_builder = message_builder.bcc(bcc.parse()?);
    }

    if let Some(reply_to) = email.reply_to {
        message_builder = message_builder.reply_to(reply_to.parse()?);
    }

    let body = match (email.html_body, email.text_body) {
        (Some(html), Some(text)) => Body::Multi(
            MultiPart::alternative()
                .singlepart(SinglePart::plain(text))
                .singlepart(SinglePart::html(html)),
        ),
        (Some(html), None) => Body::Single(SinglePart::html(html)),
        (None, Some(text)) => Body::Single(SinglePart::plain(text)),
        (None, None) => return Err(MailerError::InvalidEmail("No email body provided".to_string())),
    };

    if email.attachments.is_empty() {
        let message = match body {
            Body::Single(part) => message_builder.singlepart(part)?,
            Body::Multi(parts) => message_builder.multipart(parts)?,
        };
        return Ok(message);
    }

    let mut mixed = match body {
        Body::Single(part) => MultiPart::mixed().singlepart(part),
        Body::Multi(parts) => MultiPart::mixed().multipart(parts),
    };

    for attachment in email.attachments {
        let content_type = ContentType::parse(&attachment.content_type).map_err(|e| {
            MailerError::InvalidEmail(format!(
                "Invalid content type for {}: {e}",
                attachment.filename
            ))
        })?;
        mixed = mixed
            .singlepart(AttachmentPart::new(attachment.filename).body(attachment.content, content_type));
    }

    Ok(message_builder.multipart(mixed)?)
}
