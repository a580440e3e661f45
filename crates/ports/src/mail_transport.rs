//! 邮件传输 trait 定义

use lettre::Message;
use notify_config::SmtpConfig;
use notify_errors::NotifyResult;

/// 邮件传输 trait
///
/// 根据 SMTP 配置（主机、端口、加密方式、可选凭证）建立连接。
pub trait MailTransport: Send + Sync {
    /// 建立连接
    fn connect(&self, config: &SmtpConfig) -> NotifyResult<Box<dyn MailConnection>>;
}

/// 已建立的传输连接
pub trait MailConnection {
    /// 投递一封邮件（收件人取自邮件的信封）
    fn deliver(&mut self, message: &Message) -> NotifyResult<()>;

    /// 断开连接
    fn disconnect(&mut self) {}
}
