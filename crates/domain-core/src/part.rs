//! 邮件部件与附件

use std::path::{Path, PathBuf};

/// 附件默认 MIME 类型
pub const DEFAULT_ATTACHMENT_TYPE: &str = "application/octet-stream";

/// 附件默认传输编码
pub const DEFAULT_ATTACHMENT_ENCODING: &str = "base64";

/// 附件默认 Content-Disposition
pub const DEFAULT_ATTACHMENT_DISPOSITION: &str = "attachment";

/// 附件输入记录
///
/// 没有 `data` 时，`filename` 是磁盘上的文件路径；
/// 有 `data` 时，`filename` 只用作展示名称。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachment {
    pub filename: Option<String>,
    pub data: Option<Vec<u8>>,
    pub mime_type: Option<String>,
    pub encoding: Option<String>,
    pub disposition: Option<String>,
    pub content_id: Option<String>,
}

impl Attachment {
    /// 引用磁盘文件的附件
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self {
            filename: Some(path.as_ref().to_string_lossy().into_owned()),
            ..Self::default()
        }
    }

    /// 内存数据附件
    pub fn from_data(filename: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: Some(filename.into()),
            data: Some(data),
            ..Self::default()
        }
    }

    /// 内联部件（例如 HTML 中引用的图片）
    pub fn inline(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            mime_type: Some(mime_type.into()),
            disposition: Some("inline".to_string()),
            ..Self::default()
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    pub fn with_disposition(mut self, disposition: impl Into<String>) -> Self {
        self.disposition = Some(disposition.into());
        self
    }

    pub fn with_content_id(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }

    /// 填充缺省的类型、编码和 disposition
    pub fn with_defaults(mut self) -> Self {
        self.mime_type
            .get_or_insert_with(|| DEFAULT_ATTACHMENT_TYPE.to_string());
        self.encoding
            .get_or_insert_with(|| DEFAULT_ATTACHMENT_ENCODING.to_string());
        self.disposition
            .get_or_insert_with(|| DEFAULT_ATTACHMENT_DISPOSITION.to_string());
        self
    }
}

/// 附件内容来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentSource {
    /// 发送时读取的磁盘文件
    File(PathBuf),
    /// 内存数据
    Data(Vec<u8>),
}

/// 邮件部件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessagePart {
    /// 普通正文部件（例如 HTML 备选正文）
    Body {
        data: Vec<u8>,
        mime_type: String,
        encoding: Option<String>,
        charset: Option<String>,
        content_id: Option<String>,
    },
    /// 带文件名的附件
    Attachment {
        source: AttachmentSource,
        filename: String,
        mime_type: String,
        encoding: Option<String>,
        disposition: String,
        content_id: Option<String>,
    },
    /// 没有文件名的内联部件
    Inline {
        data: Vec<u8>,
        mime_type: String,
        encoding: Option<String>,
        content_id: Option<String>,
    },
}

impl MessagePart {
    /// HTML 备选正文
    pub fn html(html: impl Into<String>) -> Self {
        Self::Body {
            data: html.into().into_bytes(),
            mime_type: "text/html".to_string(),
            encoding: None,
            charset: Some("utf-8".to_string()),
            content_id: None,
        }
    }

    pub fn content_id(&self) -> Option<&str> {
        match self {
            Self::Body { content_id, .. }
            | Self::Attachment { content_id, .. }
            | Self::Inline { content_id, .. } => content_id.as_deref(),
        }
    }

    /// 是否为正文类部件（参与 multipart/alternative）
    pub fn is_body(&self) -> bool {
        matches!(self, Self::Body { .. })
    }
}

impl From<Attachment> for MessagePart {
    fn from(attachment: Attachment) -> Self {
        let attachment = attachment.with_defaults();
        let mime_type = attachment
            .mime_type
            .unwrap_or_else(|| DEFAULT_ATTACHMENT_TYPE.to_string());
        let disposition = attachment
            .disposition
            .unwrap_or_else(|| DEFAULT_ATTACHMENT_DISPOSITION.to_string());

        match (attachment.filename, attachment.data) {
            (Some(filename), Some(data)) => Self::Attachment {
                source: AttachmentSource::Data(data),
                filename: basename(&filename),
                mime_type,
                encoding: attachment.encoding,
                disposition,
                content_id: attachment.content_id,
            },
            (Some(filename), None) => Self::Attachment {
                filename: basename(&filename),
                source: AttachmentSource::File(PathBuf::from(filename)),
                mime_type,
                encoding: attachment.encoding,
                disposition,
                content_id: attachment.content_id,
            },
            (None, data) if disposition.eq_ignore_ascii_case("inline") => Self::Inline {
                data: data.unwrap_or_default(),
                mime_type,
                encoding: attachment.encoding,
                content_id: attachment.content_id,
            },
            (None, data) => Self::Body {
                data: data.unwrap_or_default(),
                mime_type,
                encoding: attachment.encoding,
                charset: None,
                content_id: attachment.content_id,
            },
        }
    }
}

fn basename(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string())
}
