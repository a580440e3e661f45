//! 字段校验
//!
//! 每个函数在值合法时返回 `Ok(())`，否则返回具体的 `ValidationError`。

use crate::{Attachment, Encryption};
use notify_errors::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// 密码最大长度
pub const MAX_PASSWORD_LENGTH: usize = 100;

/// 主机名最大长度
const MAX_HOSTNAME_LENGTH: usize = 253;

// 域名部分至少两个字符，不要求包含点
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]+[A-Za-z0-9._-]*@[A-Za-z0-9_-]+[A-Za-z0-9._-]+$").unwrap()
});

static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[A-Z0-9._%+\-@]*$").unwrap());

static HOSTNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?(\.[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?)*$")
        .unwrap()
});

/// 校验邮箱地址
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::EmailInvalid);
    }
    Ok(())
}

/// 校验主题（禁止换行，防止头部注入）
pub fn validate_subject(subject: &str) -> Result<(), ValidationError> {
    if subject.contains('\n') {
        return Err(ValidationError::SubjectInvalid);
    }
    Ok(())
}

/// 校验 SMTP 端口
pub fn validate_port(port: u32) -> Result<(), ValidationError> {
    if !(1..=65535).contains(&port) {
        return Err(ValidationError::PortInvalid);
    }
    Ok(())
}

/// 校验 SMTP 主机名
pub fn validate_host(host: &str) -> Result<(), ValidationError> {
    if host.is_empty() || host.len() > MAX_HOSTNAME_LENGTH || !HOSTNAME_REGEX.is_match(host) {
        return Err(ValidationError::HostnameInvalid);
    }
    Ok(())
}

/// 校验加密方式
///
/// 布尔字面量（`true`/`false`）总是非法，其余取值交给 `Encryption` 解析。
pub fn validate_encryption(encryption: &str) -> Result<(), ValidationError> {
    let value = encryption.trim();
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
        return Err(ValidationError::EncryptionInvalid);
    }
    Encryption::parse_setting(value)
        .map(|_| ())
        .ok_or(ValidationError::EncryptionInvalid)
}

/// 校验 SMTP 用户名
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !USERNAME_REGEX.is_match(username) {
        return Err(ValidationError::UsernameInvalid);
    }
    Ok(())
}

/// 校验 SMTP 密码
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordInvalid);
    }
    Ok(())
}

/// 校验正文（目前不做限制）
pub fn validate_body(_body: &str) -> Result<(), ValidationError> {
    Ok(())
}

/// 校验 HTML 正文（目前不做限制）
pub fn validate_html_body(_html: &str) -> Result<(), ValidationError> {
    Ok(())
}

/// 校验附件
///
/// 带内联数据的附件直接通过；否则 `filename` 必须指向一个存在的文件。
pub fn validate_attachment(attachment: &Attachment) -> Result<(), ValidationError> {
    if attachment.data.is_some() {
        return Ok(());
    }

    let Some(filename) = attachment.filename.as_deref() else {
        return Err(ValidationError::AttachmentInvalid);
    };

    if !Path::new(filename).exists() {
        return Err(ValidationError::AttachmentNotFound(filename.to_string()));
    }

    Ok(())
}

/// 邮件头名称最大长度（与 lettre 的 `HeaderName` 限制一致）
pub const MAX_HEADER_NAME_LEN: usize = 76;

/// 校验自定义邮件头
pub fn validate_header(name: &str, value: &str) -> Result<(), ValidationError> {
    let name_ok = !name.is_empty()
        && name.len() <= MAX_HEADER_NAME_LEN
        && name.bytes().all(|b| b.is_ascii_graphic() && b != b':');
    if !name_ok {
        return Err(ValidationError::HeaderInvalid(name.to_string()));
    }

    if value.contains('\n') || value.contains('\r') {
        return Err(ValidationError::HeaderInvalid(name.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_valid_emails() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("first.last@mail.example.org").is_ok());
        assert!(validate_email("a_b-c@my-domain.co.uk").is_ok());
        assert!(validate_email("x@yz").is_ok());
    }

    #[test]
    fn test_invalid_emails() {
        // 缺少 @
        assert!(validate_email("userexample.com").is_err());
        // 本地部分为空
        assert!(validate_email("@example.com").is_err());
        // 域名只有一个字符
        assert!(validate_email("user@b").is_err());
        // 本地部分必须以字母或数字开头
        assert!(validate_email(".user@example.com").is_err());
        assert!(validate_email("user+tag@example.com").is_err());
        assert!(validate_email("Some Guy <user@example.com>").is_err());
        assert!(validate_email("").is_err());
    }

    #[test]
    fn test_subject() {
        assert!(validate_subject("Disk usage warning").is_ok());
        assert!(validate_subject("").is_ok());
        assert_eq!(
            validate_subject("hello\nBcc: victim@example.com"),
            Err(ValidationError::SubjectInvalid)
        );
    }

    #[test]
    fn test_port_range() {
        assert_eq!(validate_port(0), Err(ValidationError::PortInvalid));
        assert_eq!(validate_port(65536), Err(ValidationError::PortInvalid));
        assert!(validate_port(1).is_ok());
        assert!(validate_port(25).is_ok());
        assert!(validate_port(587).is_ok());
        assert!(validate_port(65535).is_ok());
    }

    #[test]
    fn test_host() {
        assert!(validate_host("localhost").is_ok());
        assert!(validate_host("mail.example.com").is_ok());
        assert!(validate_host("smtp-relay.example.com").is_ok());
        assert!(validate_host("192.168.1.10").is_ok());

        assert!(validate_host("").is_err());
        assert!(validate_host("-bad.example.com").is_err());
        assert!(validate_host("bad-.example.com").is_err());
        assert!(validate_host("under_score.example.com").is_err());
        assert!(validate_host("double..dot").is_err());
        assert!(validate_host(&"a".repeat(64)).is_err());
        assert!(validate_host(&"a".repeat(63)).is_ok());
    }

    #[test]
    fn test_encryption() {
        assert!(validate_encryption("none").is_ok());
        assert!(validate_encryption("ssl").is_ok());
        assert!(validate_encryption("TLS").is_ok());
        assert_eq!(validate_encryption("true"), Err(ValidationError::EncryptionInvalid));
        assert_eq!(validate_encryption("FALSE"), Err(ValidationError::EncryptionInvalid));
        assert_eq!(validate_encryption("rot13"), Err(ValidationError::EncryptionInvalid));
    }

    #[test]
    fn test_username() {
        assert!(validate_username("").is_ok());
        assert!(validate_username("relay-user").is_ok());
        assert!(validate_username("Alerts@Example.com").is_ok());
        assert!(validate_username("a.b_c%d+e").is_ok());
        assert!(validate_username("user name").is_err());
        assert!(validate_username("user;drop").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password(&"x".repeat(100)).is_ok());
        assert_eq!(
            validate_password(&"x".repeat(101)),
            Err(ValidationError::PasswordInvalid)
        );
        assert!(validate_password("").is_ok());
    }

    #[test]
    fn test_attachment_with_data_is_valid() {
        let attachment = Attachment::from_data("report.csv", b"a,b\n1,2\n".to_vec());
        assert!(validate_attachment(&attachment).is_ok());
    }

    #[test]
    fn test_attachment_without_source_is_invalid() {
        let attachment = Attachment::default();
        assert_eq!(
            validate_attachment(&attachment),
            Err(ValidationError::AttachmentInvalid)
        );
    }

    #[test]
    fn test_attachment_file_must_exist() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log line").unwrap();

        let present = Attachment::from_file(file.path());
        assert!(validate_attachment(&present).is_ok());

        let missing = Attachment::from_file("/nonexistent/dir/report.pdf");
        assert_eq!(
            validate_attachment(&missing),
            Err(ValidationError::AttachmentNotFound(
                "/nonexistent/dir/report.pdf".to_string()
            ))
        );
    }

    #[test]
    fn test_header() {
        assert!(validate_header("X-Priority", "1").is_ok());
        assert!(validate_header("clear-archive-ignore", "false").is_ok());
        assert!(validate_header("", "x").is_err());
        assert!(validate_header("Bad Name", "x").is_err());
        assert!(validate_header("Bad:Name", "x").is_err());
        assert!(validate_header("X-Test", "a\r\nBcc: x@y.com").is_err());

        let longest = format!("X-{}", "a".repeat(MAX_HEADER_NAME_LEN - 2));
        assert!(validate_header(&longest, "v").is_ok());
        let too_long = format!("X-{}", "a".repeat(MAX_HEADER_NAME_LEN - 1));
        assert_eq!(
            validate_header(&too_long, "v"),
            Err(ValidationError::HeaderInvalid(too_long.clone()))
        );
    }
}
