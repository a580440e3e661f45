//! 进程级运行配置

use crate::{ConfigError, ConfigStore};
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use std::path::PathBuf;

/// 默认 SMTP 配置文件位置
pub const DEFAULT_CONFIG_FILE: &str = "/etc/mail-notification/mail_notification.conf";

/// 运行配置
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    /// SMTP key=value 配置文件
    #[serde(default = "default_config_file")]
    pub config_file: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 使用 JSON 格式输出日志
    #[serde(default)]
    pub log_json: bool,
    /// SMTP 连接超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_config_file() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            config_file: default_config_file(),
            log_level: default_log_level(),
            log_json: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RuntimeConfig {
    /// 从 `<config_dir>/default.toml` 和 `MAIL_NOTIFICATION_*` 环境变量加载
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let config: Self = Figment::new()
            .merge(Toml::file(format!("{}/default.toml", config_dir)))
            .merge(Env::prefixed("MAIL_NOTIFICATION_"))
            .extract()?;

        Ok(config)
    }

    /// 打开 SMTP 配置存储
    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(&self.config_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "config_file = \"/tmp/notify.conf\"\nlog_level = \"debug\"\nlog_json = true\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = RuntimeConfig::load(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config.config_file, PathBuf::from("/tmp/notify.conf"));
        assert_eq!(config.log_level, "debug");
        assert!(config.log_json);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.store().path(), PathBuf::from("/tmp/notify.conf").as_path());
    }

    #[test]
    fn test_defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = RuntimeConfig::load(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert!(!config.log_json);
    }
}
