//! Email 适配器
//!
//! 提供邮件通知功能，支持：
//! - SMTP 邮件发送（明文 / SSL / STARTTLS）
//! - 纯文本、HTML 备选正文、附件和内联部件
//! - 自定义邮件头

mod compose;
mod hostname;
mod notifier;
mod transport;

pub use compose::{ARCHIVE_IGNORE_HEADER, compose_message};
pub use hostname::SystemHostname;
pub use notifier::{MailNotification, TEST_BODY, TEST_SUBJECT};
pub use transport::LettreTransport;
