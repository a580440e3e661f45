//! 系统主机名

use notify_errors::{NotifyError, NotifyResult};
use notify_ports::HostnameResolver;

/// 通过操作系统获取主机名
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHostname;

impl HostnameResolver for SystemHostname {
    fn local_hostname(&self) -> NotifyResult<String> {
        let name = hostname::get()
            .map_err(|e| NotifyError::config(format!("Failed to read hostname: {}", e)))?;

        name.into_string()
            .map_err(|raw| NotifyError::config(format!("Hostname is not valid UTF-8: {:?}", raw)))
    }
}
