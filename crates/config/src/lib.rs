//! notify-config - 配置加载库
//!
//! - `ConfigStore`: SMTP 设置，保存在 key=value 平面文件中
//! - `RuntimeConfig`: 进程级设置（日志、超时、配置文件位置）

mod provider;
mod runtime;
mod smtp;
mod store;

pub use provider::{KeyValueFile, parse_key_values};
pub use runtime::RuntimeConfig;
pub use smtp::{ConfigKey, SmtpConfig};
pub use store::ConfigStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}
