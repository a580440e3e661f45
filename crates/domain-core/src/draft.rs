//! 待发送邮件草稿

use crate::validate::{
    validate_attachment, validate_body, validate_header, validate_html_body, validate_subject,
};
use crate::{Address, Attachment, MessagePart, RawAddress};
use chrono::{DateTime, Utc};
use notify_errors::ValidationError;

/// 邮件草稿
///
/// 每个字段在写入时校验，校验失败不修改草稿。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDraft {
    recipients: Vec<Address>,
    cc: Vec<Address>,
    bcc: Vec<Address>,
    reply_to: Option<Address>,
    subject: Option<String>,
    body: Option<String>,
    date: Option<DateTime<Utc>>,
    parts: Vec<MessagePart>,
    headers: Vec<(String, String)>,
}

impl MessageDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// 草稿是否为空
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// 清空草稿
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// 添加收件人（To）
    pub fn add_recipient(&mut self, raw: impl Into<RawAddress>) -> Result<(), ValidationError> {
        let address = parse_valid(raw)?;
        self.recipients.push(address);
        Ok(())
    }

    /// 添加抄送（Cc）
    pub fn add_cc(&mut self, raw: impl Into<RawAddress>) -> Result<(), ValidationError> {
        let address = parse_valid(raw)?;
        self.cc.push(address);
        Ok(())
    }

    /// 添加密送（Bcc）
    pub fn add_bcc(&mut self, raw: impl Into<RawAddress>) -> Result<(), ValidationError> {
        let address = parse_valid(raw)?;
        self.bcc.push(address);
        Ok(())
    }

    /// 设置回复地址
    pub fn set_reply_to(&mut self, raw: impl Into<RawAddress>) -> Result<(), ValidationError> {
        let address = parse_valid(raw)?;
        self.reply_to = Some(address);
        Ok(())
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) -> Result<(), ValidationError> {
        let subject = subject.into();
        validate_subject(&subject)?;
        self.subject = Some(subject);
        Ok(())
    }

    pub fn set_body(&mut self, body: impl Into<String>) -> Result<(), ValidationError> {
        let body = body.into();
        validate_body(&body)?;
        self.body = Some(body);
        Ok(())
    }

    /// 添加 HTML 备选正文
    pub fn set_html_body(&mut self, html: impl Into<String>) -> Result<(), ValidationError> {
        let html = html.into();
        validate_html_body(&html)?;
        self.parts.push(MessagePart::html(html));
        Ok(())
    }

    /// 添加附件
    ///
    /// 先校验全部附件，全部通过后才按顺序追加。
    pub fn add_attachments(
        &mut self,
        attachments: impl IntoIterator<Item = Attachment>,
    ) -> Result<(), ValidationError> {
        let attachments: Vec<Attachment> = attachments.into_iter().collect();
        for attachment in &attachments {
            validate_attachment(attachment)?;
        }
        self.parts
            .extend(attachments.into_iter().map(MessagePart::from));
        Ok(())
    }

    /// 直接追加部件（不做校验）
    pub fn add_part(&mut self, part: MessagePart) {
        self.parts.push(part);
    }

    pub fn set_date(&mut self, date: DateTime<Utc>) {
        self.date = Some(date);
    }

    /// 添加自定义邮件头
    pub fn add_header(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let (name, value) = (name.into(), value.into());
        validate_header(&name, &value)?;
        self.headers.push((name, value));
        Ok(())
    }

    pub fn recipients(&self) -> &[Address] {
        &self.recipients
    }

    pub fn cc(&self) -> &[Address] {
        &self.cc
    }

    pub fn bcc(&self) -> &[Address] {
        &self.bcc
    }

    pub fn reply_to(&self) -> Option<&Address> {
        self.reply_to.as_ref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    pub fn parts(&self) -> &[MessagePart] {
        &self.parts
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

fn parse_valid(raw: impl Into<RawAddress>) -> Result<Address, ValidationError> {
    let address = Address::parse(raw);
    address.validate()?;
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_draft_is_empty() {
        assert!(MessageDraft::new().is_empty());
    }

    #[test]
    fn test_add_recipient_parses_and_validates() {
        let mut draft = MessageDraft::new();
        draft.add_recipient("Ops Team <ops@example.com>").unwrap();
        draft.add_recipient(("Admin", "admin@example.com")).unwrap();

        assert_eq!(
            draft.recipients(),
            &[
                Address::new("ops@example.com").with_name("Ops Team"),
                Address::new("admin@example.com").with_name("Admin"),
            ]
        );
        assert!(!draft.is_empty());
    }

    #[test]
    fn test_invalid_recipient_leaves_draft_untouched() {
        let mut draft = MessageDraft::new();
        let result = draft.add_recipient("not an address");
        assert_eq!(result, Err(ValidationError::EmailInvalid));
        assert!(draft.is_empty());
    }

    #[test]
    fn test_cc_and_bcc() {
        let mut draft = MessageDraft::new();
        draft.add_cc("cc@example.com").unwrap();
        draft.add_bcc("<bcc@example.com> Hidden").unwrap();
        assert_eq!(draft.cc().len(), 1);
        assert_eq!(draft.bcc()[0].name.as_deref(), Some("Hidden"));
        assert!(draft.recipients().is_empty());
    }

    #[test]
    fn test_reply_to_keeps_display_name() {
        let mut draft = MessageDraft::new();
        draft.set_reply_to(("Doe, John", "john@example.com")).unwrap();
        assert_eq!(
            draft.reply_to(),
            Some(&Address::new("john@example.com").with_name("Doe, John"))
        );
    }

    #[test]
    fn test_subject_with_newline_is_rejected() {
        let mut draft = MessageDraft::new();
        assert_eq!(
            draft.set_subject("line one\nline two"),
            Err(ValidationError::SubjectInvalid)
        );
        assert_eq!(draft.subject(), None);
    }

    #[test]
    fn test_html_body_is_appended_as_part() {
        let mut draft = MessageDraft::new();
        draft.set_body("plain").unwrap();
        draft.set_html_body("<b>rich</b>").unwrap();
        assert_eq!(draft.body(), Some("plain"));
        assert_eq!(draft.parts().len(), 1);
        assert!(draft.parts()[0].is_body());
    }

    #[test]
    fn test_attachments_are_all_or_nothing() {
        let mut draft = MessageDraft::new();
        let result = draft.add_attachments(vec![
            Attachment::from_data("a.txt", b"a".to_vec()),
            Attachment::from_file("/nonexistent/b.txt"),
        ]);
        assert!(matches!(result, Err(ValidationError::AttachmentNotFound(_))));
        assert!(draft.parts().is_empty());

        draft
            .add_attachments(vec![Attachment::from_data("a.txt", b"a".to_vec())])
            .unwrap();
        assert_eq!(draft.parts().len(), 1);
    }

    #[test]
    fn test_headers_keep_order() {
        let mut draft = MessageDraft::new();
        draft.add_header("X-First", "1").unwrap();
        draft.add_header("X-Second", "2").unwrap();
        assert!(draft.add_header("Bad Header", "3").is_err());
        assert!(draft.add_header(format!("X-{}", "a".repeat(80)), "4").is_err());
        assert_eq!(
            draft.headers(),
            &[
                ("X-First".to_string(), "1".to_string()),
                ("X-Second".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_clear() {
        let mut draft = MessageDraft::new();
        draft.add_recipient("a@example.com").unwrap();
        draft.set_subject("s").unwrap();
        draft.set_date(Utc::now());
        draft.clear();
        assert!(draft.is_empty());
    }
}
