//! SMTP 配置存储
//!
//! 读取时懒加载并缓存；任何写入都会使缓存失效，下次读取重新从磁盘加载。

use crate::provider::KeyValueFile;
use crate::smtp::{ConfigKey, RawSmtpConfig, SmtpConfig};
use figment::Figment;
use notify_domain::validate::{
    validate_host, validate_password, validate_port, validate_username,
};
use notify_domain::{Address, Encryption, RawAddress};
use notify_errors::{NotifyError, NotifyResult, ValidationError};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 配置存储句柄
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    cached: Option<SmtpConfig>,
}

impl ConfigStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 缓存是否需要重新加载
    pub fn is_stale(&self) -> bool {
        self.cached.is_none()
    }

    /// 读取配置（必要时从磁盘加载）
    pub fn load(&mut self) -> &SmtpConfig {
        if self.cached.is_none() {
            self.cached = Some(self.read());
        }
        self.cached.get_or_insert_with(SmtpConfig::default)
    }

    /// 丢弃缓存并重新加载
    pub fn reload(&mut self) -> &SmtpConfig {
        self.cached = None;
        self.load()
    }

    pub fn set_host(&mut self, host: &str) -> NotifyResult<()> {
        validate_host(host)?;
        self.persist(ConfigKey::Host, host)
    }

    pub fn set_port(&mut self, port: u32) -> NotifyResult<()> {
        validate_port(port)?;
        self.persist(ConfigKey::Port, &port.to_string())
    }

    pub fn set_encryption(&mut self, encryption: Encryption) -> NotifyResult<()> {
        self.persist(ConfigKey::Encryption, encryption.as_str())
    }

    pub fn set_username(&mut self, username: &str) -> NotifyResult<()> {
        validate_username(username)?;
        self.persist(ConfigKey::Username, username)
    }

    pub fn set_password(&mut self, password: &str) -> NotifyResult<()> {
        validate_password(password)?;
        self.persist(ConfigKey::Password, password)
    }

    /// 设置发件人，保存为规范化的 `Name <addr>` 形式
    pub fn set_sender(&mut self, sender: impl Into<RawAddress>) -> NotifyResult<()> {
        let address = Address::parse(sender);
        address.validate()?;
        self.persist(ConfigKey::Sender, &address.to_string())
    }

    /// 按键名设置（值为字符串形式），先校验再写入
    pub fn set_field(&mut self, key: ConfigKey, value: &str) -> NotifyResult<()> {
        match key {
            ConfigKey::Host => self.set_host(value),
            ConfigKey::Port => {
                let port = value
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| ValidationError::PortInvalid)?;
                self.set_port(port)
            }
            ConfigKey::Encryption => {
                let encryption: Encryption = value.parse()?;
                self.set_encryption(encryption)
            }
            ConfigKey::Username => self.set_username(value),
            ConfigKey::Password => self.set_password(value),
            ConfigKey::Sender => self.set_sender(value),
        }
    }

    fn read(&self) -> SmtpConfig {
        match Figment::from(KeyValueFile::new(&self.path)).extract::<RawSmtpConfig>() {
            Ok(raw) => {
                debug!(path = %self.path.display(), "SMTP configuration loaded");
                SmtpConfig::from_raw(raw)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unreadable SMTP configuration, using defaults");
                SmtpConfig::default()
            }
        }
    }

    /// 写入单个键：存在则原地替换，否则追加
    fn persist(&mut self, key: ConfigKey, value: &str) -> NotifyResult<()> {
        if value.contains('\n') || value.contains('\r') {
            return Err(ValidationError::ValueInvalid(key.to_string()).into());
        }

        self.write_line(key.as_str(), value).map_err(|e| {
            NotifyError::config(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        self.cached = None;

        if key == ConfigKey::Password {
            info!(key = %key, "SMTP configuration updated");
        } else {
            info!(key = %key, value = %value, "SMTP configuration updated");
        }
        Ok(())
    }

    fn write_line(&self, key: &str, value: &str) -> std::io::Result<()> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e),
        };

        let line = format!("{}={}", key, value);
        let mut replaced = false;
        let mut lines: Vec<String> = contents
            .lines()
            .map(|existing| {
                if is_key_line(existing, key) {
                    replaced = true;
                    line.clone()
                } else {
                    existing.to_string()
                }
            })
            .collect();

        if !replaced {
            lines.push(line);
        }

        let mut output = lines.join("\n");
        output.push('\n');

        let mut file = open_owner_only(&self.path)?;
        file.write_all(output.as_bytes())?;
        file.sync_all()
    }
}

/// 匹配 `^key\s*=`
fn is_key_line(line: &str, key: &str) -> bool {
    line.strip_prefix(key)
        .is_some_and(|rest| rest.trim_start().starts_with('='))
}

// 配置文件保存明文密码，新建时仅所有者可读写
fn open_owner_only(path: &Path) -> std::io::Result<fs::File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    options.open(path)
}
