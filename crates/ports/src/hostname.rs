//! 主机名 trait 定义

use notify_errors::NotifyResult;

/// 本机主机名解析
pub trait HostnameResolver: Send + Sync {
    /// 获取本机主机名，用于构造默认发件人 `root@<hostname>`
    fn local_hostname(&self) -> NotifyResult<String>;
}
