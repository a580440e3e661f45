//! lettre SMTP 传输实现

use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use notify_config::SmtpConfig;
use notify_domain::Encryption;
use notify_errors::{NotifyError, NotifyResult};
use notify_ports::{MailConnection, MailTransport};
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::debug;

/// 默认超时（秒）
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// 基于 lettre 的 SMTP 传输
#[derive(Debug, Clone)]
pub struct LettreTransport {
    timeout: Duration,
}

impl LettreTransport {
    /// 创建新的传输
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// 设置连接超时
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 构建 SMTP 传输
    fn build_transport(&self, config: &SmtpConfig) -> NotifyResult<SmtpTransport> {
        let builder = match config.encryption {
            Encryption::None => SmtpTransport::builder_dangerous(config.host.as_str()),
            Encryption::Ssl => SmtpTransport::relay(&config.host).map_err(|e| {
                NotifyError::connection(format!("Failed to create SMTP transport: {}", e))
            })?,
            Encryption::Tls => SmtpTransport::starttls_relay(&config.host).map_err(|e| {
                NotifyError::connection(format!("Failed to create SMTP transport: {}", e))
            })?,
        };

        let mut builder = builder
            .port(config.port)
            .timeout(Some(self.timeout));

        if config.has_credentials() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.expose_secret().clone(),
            ));
        }

        Ok(builder.build())
    }
}

impl Default for LettreTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MailTransport for LettreTransport {
    fn connect(&self, config: &SmtpConfig) -> NotifyResult<Box<dyn MailConnection>> {
        let transport = self.build_transport(config)?;

        debug!(
            host = %config.host,
            port = config.port,
            encryption = %config.encryption,
            authenticated = config.has_credentials(),
            "SMTP transport ready"
        );

        Ok(Box::new(LettreConnection {
            transport: Some(transport),
        }))
    }
}

/// lettre 连接
struct LettreConnection {
    transport: Option<SmtpTransport>,
}

impl MailConnection for LettreConnection {
    fn deliver(&mut self, message: &Message) -> NotifyResult<()> {
        let transport = self
            .transport
            .as_ref()
            .ok_or_else(|| NotifyError::connection("SMTP connection already closed"))?;

        transport
            .send(message)
            .map(|_| ())
            .map_err(|e| NotifyError::send_failed(format!("Failed to send email: {}", e)))
    }

    fn disconnect(&mut self) {
        if self.transport.take().is_some() {
            debug!("SMTP connection closed");
        }
    }
}
