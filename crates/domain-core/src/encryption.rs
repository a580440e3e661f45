//! SMTP 加密方式

use crate::validate::validate_encryption;
use notify_errors::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// SMTP 连接加密方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encryption {
    /// 明文连接
    #[default]
    None,
    /// 隐式 TLS（通常为 465 端口）
    Ssl,
    /// STARTTLS（通常为 587 端口）
    Tls,
}

impl Encryption {
    /// 所有可选项，按展示顺序排列
    pub const ALL: [Encryption; 3] = [Encryption::None, Encryption::Ssl, Encryption::Tls];

    /// 解析配置文件中的取值
    ///
    /// 兼容旧版本写入的数字代码：`0`/`2` 表示不加密，`4` 为 SSL，`8` 为 TLS。
    pub fn parse_setting(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "off" | "0" | "2" => Some(Self::None),
            "ssl" | "4" => Some(Self::Ssl),
            "tls" | "starttls" | "8" => Some(Self::Tls),
            _ => None,
        }
    }

    /// 持久化使用的取值
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Ssl => "ssl",
            Self::Tls => "tls",
        }
    }

    /// 展示名称
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Ssl => "SSL",
            Self::Tls => "TLS",
        }
    }
}

impl fmt::Display for Encryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Encryption {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_encryption(s)?;
        Self::parse_setting(s).ok_or(ValidationError::EncryptionInvalid)
    }
}
