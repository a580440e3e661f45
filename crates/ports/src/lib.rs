//! ports - 抽象 trait 层
//!
//! 定义邮件发送依赖的外部协作者接口

mod hostname;
mod mail_transport;

pub use hostname::*;
pub use mail_transport::*;
