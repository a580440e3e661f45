//! notify-errors - 统一错误处理
//!
//! 两层错误：
//! - `ValidationError`: 输入校验失败，调用方可直接修正后重试
//! - `NotifyError`: 发送流程中的运行时错误（包含校验错误）

use thiserror::Error;

/// 字段校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email address is invalid.")]
    EmailInvalid,

    #[error("Subject is invalid.")]
    SubjectInvalid,

    #[error("Port is invalid.")]
    PortInvalid,

    #[error("Hostname is invalid.")]
    HostnameInvalid,

    #[error("SMTP encryption is invalid.")]
    EncryptionInvalid,

    #[error("SMTP username is invalid.")]
    UsernameInvalid,

    #[error("SMTP password is invalid.")]
    PasswordInvalid,

    #[error("Attachment is invalid.")]
    AttachmentInvalid,

    #[error("Attachment not found. - {0}")]
    AttachmentNotFound(String),

    #[error("Header is invalid: {0}")]
    HeaderInvalid(String),

    #[error("Configuration value for {0} contains a line break.")]
    ValueInvalid(String),
}

/// 错误严重级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// 邮件通知错误类型
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Recipient not set.")]
    RecipientNotSet,

    #[error("Recipient is invalid: {0}")]
    RecipientInvalid(String),

    #[error("SMTP connection failed: {0}")]
    Connection(String),

    #[error("Attachment could not be read: {0}")]
    Attachment(String),

    #[error("Failed to build message: {0}")]
    Compose(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NotifyError {
    pub fn recipient_invalid(msg: impl Into<String>) -> Self {
        Self::RecipientInvalid(msg.into())
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn attachment(msg: impl Into<String>) -> Self {
        Self::Attachment(msg.into())
    }

    pub fn compose(msg: impl Into<String>) -> Self {
        Self::Compose(msg.into())
    }

    pub fn send_failed(msg: impl Into<String>) -> Self {
        Self::SendFailed(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// 是否为校验错误
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// 错误严重级别
    ///
    /// 配置文件写入失败需要管理员介入，其余错误均可由调用方恢复。
    pub fn severity(&self) -> Severity {
        match self {
            Self::Config(_) => Severity::Error,
            _ => Severity::Warning,
        }
    }

    /// 稳定的错误代码，供前端映射文案
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::RecipientNotSet => "recipient_not_set",
            Self::RecipientInvalid(_) => "recipient_invalid",
            Self::Connection(_) => "connection",
            Self::Attachment(_) => "attachment",
            Self::Compose(_) => "compose",
            Self::SendFailed(_) => "send_failed",
            Self::Config(_) => "config",
        }
    }
}

/// Result 类型别名
pub type NotifyResult<T> = Result<T, NotifyError>;
