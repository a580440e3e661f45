//! notify-bootstrap - 邮件通知启动骨架
//!
//! 日志初始化以及 `MailNotification` 的组装

mod runtime;

pub use runtime::*;
