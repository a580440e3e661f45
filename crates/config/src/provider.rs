//! key=value 平面文件的 figment Provider

use figment::value::{Dict, Map, Value};
use figment::{Error, Metadata, Profile, Provider, Source};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// 每行一个 `key=value` 的配置文件
///
/// 文件不存在时视为空配置。
#[derive(Debug, Clone)]
pub struct KeyValueFile {
    path: PathBuf,
}

impl KeyValueFile {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Provider for KeyValueFile {
    fn metadata(&self) -> Metadata {
        Metadata::named("key=value file").source(Source::File(self.path.clone()))
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(Error::from(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let dict: Dict = parse_key_values(&text)
            .into_iter()
            .map(|(key, value)| (key, Value::from(value)))
            .collect();

        Ok(Profile::Default.collect(dict))
    }
}

/// 解析 key=value 文本
///
/// 忽略空行、`#` 注释行以及不含 `=` 的行；键和值两端空白会被去掉。
pub fn parse_key_values(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}
