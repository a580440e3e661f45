//! 将草稿构建为 lettre 邮件

use lettre::Message;
use lettre::message::header::{
    self, ContentDisposition, ContentTransferEncoding, ContentType, HeaderName, HeaderValue,
};
use lettre::message::{Mailbox, MultiPart, SinglePart};
use notify_domain::{Address, AttachmentSource, MessageDraft, MessagePart};
use notify_errors::{NotifyError, NotifyResult};
use std::fs;
use std::time::SystemTime;
use tracing::debug;

/// 归档忽略标记头
pub const ARCHIVE_IGNORE_HEADER: &str = "clear-archive-ignore";

/// 邮件内容：单个部件或 multipart
enum Content {
    Single(SinglePart),
    Multi(MultiPart),
}

/// 构建邮件
///
/// 纯文本正文与正文类部件组成 `multipart/alternative`，
/// 附件和内联部件再与之组成 `multipart/mixed`。
pub fn compose_message(
    draft: &MessageDraft,
    sender: &Address,
    reply_to: &Address,
) -> NotifyResult<Message> {
    let from = to_mailbox(sender)
        .map_err(|e| NotifyError::compose(format!("Invalid sender address: {}", e)))?;
    let reply_to = to_mailbox(reply_to)
        .map_err(|e| NotifyError::compose(format!("Invalid reply-to address: {}", e)))?;

    let mut builder = Message::builder().from(from).reply_to(reply_to);

    for recipient in draft.recipients() {
        builder = builder.to(recipient_mailbox(recipient)?);
    }
    for cc in draft.cc() {
        builder = builder.cc(recipient_mailbox(cc)?);
    }
    for bcc in draft.bcc() {
        builder = builder.bcc(recipient_mailbox(bcc)?);
    }

    if let Some(subject) = draft.subject() {
        builder = builder.subject(subject);
    }
    if let Some(date) = draft.date() {
        builder = builder.date(SystemTime::from(date));
    }

    let message = match build_content(draft)? {
        Some(Content::Single(part)) => builder.singlepart(part),
        Some(Content::Multi(multipart)) => builder.multipart(multipart),
        None => builder.body(String::new()),
    };
    let mut message =
        message.map_err(|e| NotifyError::compose(format!("Failed to build message: {}", e)))?;

    apply_headers(&mut message, draft.headers())?;

    Ok(message)
}

fn to_mailbox(address: &Address) -> Result<Mailbox, lettre::address::AddressError> {
    let email = address.address.parse()?;
    Ok(Mailbox::new(address.display_name().map(str::to_string), email))
}

fn recipient_mailbox(address: &Address) -> NotifyResult<Mailbox> {
    to_mailbox(address)
        .map_err(|e| NotifyError::recipient_invalid(format!("{}: {}", address.address, e)))
}

fn build_content(draft: &MessageDraft) -> NotifyResult<Option<Content>> {
    let mut alternatives = Vec::new();
    let mut attachments = Vec::new();

    if let Some(body) = draft.body() {
        alternatives.push(SinglePart::plain(body.to_string()));
    }

    for part in draft.parts() {
        let single = build_part(part)?;
        if part.is_body() {
            alternatives.push(single);
        } else {
            attachments.push(single);
        }
    }

    let main = match alternatives.len() {
        0 => None,
        1 => alternatives.pop().map(Content::Single),
        _ => {
            let mut parts = alternatives.into_iter();
            parts.next().map(|first| {
                Content::Multi(parts.fold(MultiPart::alternative().singlepart(first), |mp, p| {
                    mp.singlepart(p)
                }))
            })
        }
    };

    if attachments.is_empty() {
        return Ok(main);
    }

    let mut rest = attachments.into_iter();
    let mixed = match main {
        Some(Content::Single(part)) => MultiPart::mixed().singlepart(part),
        Some(Content::Multi(multipart)) => MultiPart::mixed().multipart(multipart),
        None => match rest.next() {
            Some(first) => MultiPart::mixed().singlepart(first),
            None => return Ok(None),
        },
    };

    Ok(Some(Content::Multi(
        rest.fold(mixed, |mp, part| mp.singlepart(part)),
    )))
}

fn build_part(part: &MessagePart) -> NotifyResult<SinglePart> {
    let (builder, data) = match part {
        MessagePart::Body {
            data,
            mime_type,
            encoding,
            charset,
            ..
        } => {
            let content_type = match charset {
                Some(charset) => format!("{}; charset={}", mime_type, charset),
                None => mime_type.clone(),
            };
            let builder = SinglePart::builder().header(parse_content_type(&content_type)?);
            (with_encoding(builder, encoding.as_deref()), data.clone())
        }
        MessagePart::Attachment {
            source,
            filename,
            mime_type,
            encoding,
            disposition,
            ..
        } => {
            let data = match source {
                AttachmentSource::Data(data) => data.clone(),
                AttachmentSource::File(path) => fs::read(path).map_err(|e| {
                    NotifyError::attachment(format!("{} - {}", filename, e))
                })?,
            };
            let disposition = if disposition.eq_ignore_ascii_case("inline") {
                ContentDisposition::inline_with_name(filename)
            } else {
                ContentDisposition::attachment(filename)
            };
            let builder = SinglePart::builder()
                .header(parse_content_type(mime_type)?)
                .header(disposition);
            (with_encoding(builder, encoding.as_deref()), data)
        }
        MessagePart::Inline {
            data,
            mime_type,
            encoding,
            ..
        } => {
            let builder = SinglePart::builder()
                .header(parse_content_type(mime_type)?)
                .header(ContentDisposition::inline());
            (with_encoding(builder, encoding.as_deref()), data.clone())
        }
    };

    let builder = match part.content_id() {
        Some(content_id) => builder.header(header::ContentId::from(content_id.to_string())),
        None => builder,
    };

    Ok(builder.body(data))
}

fn parse_content_type(value: &str) -> NotifyResult<ContentType> {
    ContentType::parse(value)
        .map_err(|e| NotifyError::compose(format!("Invalid content type {}: {}", value, e)))
}

fn with_encoding(
    builder: lettre::message::SinglePartBuilder,
    encoding: Option<&str>,
) -> lettre::message::SinglePartBuilder {
    let Some(encoding) = encoding else {
        return builder;
    };

    match parse_transfer_encoding(encoding) {
        Some(encoding) => builder.header(encoding),
        None => {
            debug!(encoding = %encoding, "Unknown transfer encoding, letting lettre choose");
            builder
        }
    }
}

fn parse_transfer_encoding(value: &str) -> Option<ContentTransferEncoding> {
    match value.trim().to_ascii_lowercase().as_str() {
        "7bit" => Some(ContentTransferEncoding::SevenBit),
        "8bit" => Some(ContentTransferEncoding::EightBit),
        "binary" => Some(ContentTransferEncoding::Binary),
        "quoted-printable" => Some(ContentTransferEncoding::QuotedPrintable),
        "base64" => Some(ContentTransferEncoding::Base64),
        _ => None,
    }
}

/// 按顺序写入自定义邮件头，最后强制 `clear-archive-ignore: true`
///
/// 调用方显式提供该头时，无论取值如何都会被改写为 `true`。
fn apply_headers(message: &mut Message, custom: &[(String, String)]) -> NotifyResult<()> {
    let headers = message.headers_mut();

    for (name, value) in custom {
        let header_name = HeaderName::new_from_ascii(name.clone())
            .map_err(|_| NotifyError::compose(format!("Invalid header name: {}", name)))?;
        headers.insert_raw(HeaderValue::new(header_name, value.clone()));
    }

    if custom.iter().any(|(name, _)| name == ARCHIVE_IGNORE_HEADER) {
        debug!("Overriding caller supplied {} header", ARCHIVE_IGNORE_HEADER);
    }
    headers.insert_raw(HeaderValue::new(
        HeaderName::new_from_ascii_str(ARCHIVE_IGNORE_HEADER),
        "true".to_string(),
    ));

    Ok(())
}
