//! 运行时组装

use notify_adapter_email::{LettreTransport, MailNotification};
use notify_config::RuntimeConfig;
use notify_telemetry::{init_tracing, init_tracing_json};
use std::time::Duration;
use tracing::info;

/// 初始化日志
pub fn init_runtime(config: &RuntimeConfig) {
    if config.log_json {
        init_tracing_json(&config.log_level);
    } else {
        init_tracing(&config.log_level);
    }

    info!(
        config_file = %config.config_file.display(),
        timeout_secs = config.timeout_secs,
        "Runtime initialized"
    );
}

/// 按运行配置组装邮件通知
pub fn build_notifier(config: &RuntimeConfig) -> MailNotification {
    let transport =
        LettreTransport::new().with_timeout(Duration::from_secs(config.timeout_secs));
    MailNotification::new(config.store(), transport)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_notifier_uses_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = RuntimeConfig {
            config_file: dir.path().join("mail_notification.conf"),
            ..RuntimeConfig::default()
        };

        let mut notifier = build_notifier(&config);
        assert_eq!(notifier.store().path(), config.config_file.as_path());
        assert_eq!(notifier.host(), "localhost");

        notifier.set_host("relay.example.com").unwrap();
        assert!(
            std::fs::read_to_string(&config.config_file)
                .unwrap()
                .contains("host=relay.example.com")
        );
    }
}
