//! SMTP 设置

use notify_domain::Encryption;
use notify_domain::validate::validate_port;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// 默认 SMTP 主机
pub const DEFAULT_HOST: &str = "localhost";

/// 默认 SMTP 端口
pub const DEFAULT_PORT: u16 = 25;

/// 配置文件中的键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    Host,
    Port,
    Encryption,
    Username,
    Password,
    Sender,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 6] = [
        ConfigKey::Host,
        ConfigKey::Port,
        ConfigKey::Encryption,
        ConfigKey::Username,
        ConfigKey::Password,
        ConfigKey::Sender,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Port => "port",
            Self::Encryption => "encryption",
            Self::Username => "username",
            Self::Password => "password",
            Self::Sender => "sender",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown configuration key: {}", s))
    }
}

/// SMTP 配置
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub encryption: Encryption,
    pub username: String,
    pub password: Secret<String>,
    pub sender: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            encryption: Encryption::None,
            username: String::new(),
            password: Secret::new(String::new()),
            sender: String::new(),
        }
    }
}

impl SmtpConfig {
    /// 是否需要 SMTP 认证
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty()
    }

    /// 由文件中的原始字符串构建，缺失或无法解析的字段使用默认值
    pub(crate) fn from_raw(raw: RawSmtpConfig) -> Self {
        let defaults = Self::default();

        let port = match non_empty(raw.port) {
            None => defaults.port,
            Some(value) => match value.parse::<u32>() {
                Ok(port) if validate_port(port).is_ok() => port as u16,
                _ => {
                    warn!(value = %value, "Ignoring malformed SMTP port");
                    defaults.port
                }
            },
        };

        let encryption = match raw.encryption {
            None => defaults.encryption,
            Some(value) => Encryption::parse_setting(&value).unwrap_or_else(|| {
                warn!(value = %value, "Ignoring malformed SMTP encryption");
                defaults.encryption
            }),
        };

        Self {
            host: non_empty(raw.host).unwrap_or(defaults.host),
            port,
            encryption,
            username: raw.username.unwrap_or_default(),
            password: Secret::new(raw.password.unwrap_or_default()),
            sender: raw.sender.unwrap_or_default(),
        }
    }
}

impl PartialEq for SmtpConfig {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host
            && self.port == other.port
            && self.encryption == other.encryption
            && self.username == other.username
            && self.password.expose_secret() == other.password.expose_secret()
            && self.sender == other.sender
    }
}

/// 文件中读出的原始值
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawSmtpConfig {
    pub host: Option<String>,
    pub port: Option<String>,
    pub encryption: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub sender: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
