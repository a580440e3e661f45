//! 邮件通知门面
//!
//! 持有 SMTP 配置存储和当前草稿；`send` 之后草稿总是被清空。

use crate::compose::compose_message;
use crate::hostname::SystemHostname;
use chrono::{DateTime, Utc};
use notify_config::{ConfigStore, SmtpConfig};
use notify_domain::{Address, Attachment, Encryption, MessageDraft, MessagePart, RawAddress};
use notify_errors::{NotifyError, NotifyResult};
use notify_ports::{HostnameResolver, MailTransport};
use secrecy::Secret;
use tracing::{debug, info, warn};

/// 测试邮件主题
pub const TEST_SUBJECT: &str = "Test";

/// 测试邮件正文
pub const TEST_BODY: &str = "Congratulations.  The mail notification test was successful.";

/// 邮件通知
pub struct MailNotification {
    store: ConfigStore,
    draft: MessageDraft,
    transport: Box<dyn MailTransport>,
    hostname: Box<dyn HostnameResolver>,
}

impl MailNotification {
    /// 创建新的邮件通知
    pub fn new(store: ConfigStore, transport: impl MailTransport + 'static) -> Self {
        Self {
            store,
            draft: MessageDraft::new(),
            transport: Box::new(transport),
            hostname: Box::new(SystemHostname),
        }
    }

    /// 替换主机名解析器
    pub fn with_hostname_resolver(mut self, resolver: impl HostnameResolver + 'static) -> Self {
        self.hostname = Box::new(resolver);
        self
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ConfigStore {
        &mut self.store
    }

    /// 当前草稿
    pub fn draft(&self) -> &MessageDraft {
        &self.draft
    }

    /// 清空草稿
    pub fn clear(&mut self) {
        self.draft.clear();
    }

    // ---- SMTP 配置 ----

    pub fn host(&mut self) -> String {
        self.store.load().host.clone()
    }

    pub fn port(&mut self) -> u16 {
        self.store.load().port
    }

    pub fn encryption(&mut self) -> Encryption {
        self.store.load().encryption
    }

    pub fn username(&mut self) -> String {
        self.store.load().username.clone()
    }

    pub fn password(&mut self) -> Secret<String> {
        self.store.load().password.clone()
    }

    pub fn sender(&mut self) -> String {
        self.store.load().sender.clone()
    }

    /// 加密方式选项（供管理界面展示）
    pub fn encryption_options() -> Vec<(Encryption, &'static str)> {
        Encryption::ALL.iter().map(|e| (*e, e.label())).collect()
    }

    pub fn set_host(&mut self, host: &str) -> NotifyResult<()> {
        self.store.set_host(host)
    }

    pub fn set_port(&mut self, port: u32) -> NotifyResult<()> {
        self.store.set_port(port)
    }

    pub fn set_encryption(&mut self, encryption: Encryption) -> NotifyResult<()> {
        self.store.set_encryption(encryption)
    }

    pub fn set_username(&mut self, username: &str) -> NotifyResult<()> {
        self.store.set_username(username)
    }

    pub fn set_password(&mut self, password: &str) -> NotifyResult<()> {
        self.store.set_password(password)
    }

    pub fn set_sender(&mut self, sender: impl Into<RawAddress>) -> NotifyResult<()> {
        self.store.set_sender(sender)
    }

    // ---- 草稿 ----

    pub fn add_recipient(&mut self, recipient: impl Into<RawAddress>) -> NotifyResult<()> {
        self.draft.add_recipient(recipient)?;
        debug!(count = self.draft.recipients().len(), "Recipient added");
        Ok(())
    }

    pub fn add_cc(&mut self, cc: impl Into<RawAddress>) -> NotifyResult<()> {
        self.draft.add_cc(cc)?;
        debug!(count = self.draft.cc().len(), "Cc added");
        Ok(())
    }

    pub fn add_bcc(&mut self, bcc: impl Into<RawAddress>) -> NotifyResult<()> {
        self.draft.add_bcc(bcc)?;
        debug!(count = self.draft.bcc().len(), "Bcc added");
        Ok(())
    }

    pub fn set_reply_to(&mut self, reply_to: impl Into<RawAddress>) -> NotifyResult<()> {
        self.draft.set_reply_to(reply_to)?;
        Ok(())
    }

    pub fn set_message_subject(&mut self, subject: impl Into<String>) -> NotifyResult<()> {
        self.draft.set_subject(subject)?;
        Ok(())
    }

    pub fn set_message_body(&mut self, body: impl Into<String>) -> NotifyResult<()> {
        self.draft.set_body(body)?;
        Ok(())
    }

    pub fn set_message_html_body(&mut self, html: impl Into<String>) -> NotifyResult<()> {
        self.draft.set_html_body(html)?;
        Ok(())
    }

    pub fn set_message_attachments(
        &mut self,
        attachments: impl IntoIterator<Item = Attachment>,
    ) -> NotifyResult<()> {
        self.draft.add_attachments(attachments)?;
        debug!(parts = self.draft.parts().len(), "Attachments added");
        Ok(())
    }

    /// 直接追加部件（不做校验）
    pub fn set_message_part(&mut self, part: MessagePart) {
        self.draft.add_part(part);
    }

    pub fn set_message_date(&mut self, date: DateTime<Utc>) {
        self.draft.set_date(date);
    }

    pub fn add_header(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> NotifyResult<()> {
        self.draft.add_header(name, value)?;
        Ok(())
    }

    // ---- 发送 ----

    /// 发送当前草稿
    ///
    /// 无论成功与否，草稿都会被清空。
    pub fn send(&mut self) -> NotifyResult<()> {
        let draft = std::mem::take(&mut self.draft);
        let config = self.store.load().clone();

        let result = self.deliver(&draft, &config);
        if let Err(e) = &result {
            warn!(code = e.code(), error = %e, "Mail notification not sent");
        }
        result
    }

    /// 通过 SMTP 发送测试邮件
    pub fn test_relay(&mut self, email: impl Into<RawAddress>) -> NotifyResult<()> {
        self.add_recipient(email)?;
        self.set_message_subject(TEST_SUBJECT)?;
        self.set_message_body(TEST_BODY)?;
        self.send()
    }

    fn deliver(&self, draft: &MessageDraft, config: &SmtpConfig) -> NotifyResult<()> {
        check_recipients(draft.recipients())?;

        let sender = self.resolve_sender(config);
        let reply_to = draft
            .reply_to()
            .cloned()
            .unwrap_or_else(|| Address::new(sender.address.clone()));

        let mut connection = self.transport.connect(config)?;

        let result = compose_message(draft, &sender, &reply_to)
            .and_then(|message| connection.deliver(&message));
        connection.disconnect();
        result?;

        info!(
            recipients = draft.recipients().len(),
            cc = draft.cc().len(),
            bcc = draft.bcc().len(),
            sender = %sender.address,
            subject = draft.subject().unwrap_or_default(),
            "Mail notification sent"
        );
        Ok(())
    }

    /// 配置的发件人；未配置时使用 `root@<hostname>`
    fn resolve_sender(&self, config: &SmtpConfig) -> Address {
        if !config.sender.is_empty() {
            return Address::parse(config.sender.as_str());
        }

        let hostname = self.hostname.local_hostname().unwrap_or_else(|e| {
            warn!(error = %e, "Falling back to localhost for default sender");
            "localhost".to_string()
        });
        Address::new(format!("root@{}", hostname))
    }
}

/// 发送前复查收件人：至少一个，且全部合法
fn check_recipients(recipients: &[Address]) -> NotifyResult<()> {
    if recipients.is_empty() {
        return Err(NotifyError::RecipientNotSet);
    }

    match recipients.iter().find(|r| r.validate().is_err()) {
        Some(bad) => Err(NotifyError::recipient_invalid(bad.address.clone())),
        None => Ok(()),
    }
}
