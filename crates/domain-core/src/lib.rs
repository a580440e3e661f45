//! notify-domain - 邮件通知的领域核心类型
//!
//! 包含地址解析、字段校验以及待发送邮件草稿

mod address;
mod draft;
mod encryption;
mod part;
pub mod validate;

pub use address::*;
pub use draft::*;
pub use encryption::*;
pub use part::*;
