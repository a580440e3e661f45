//! 邮箱地址值对象与解析

use crate::validate::validate_email;
use notify_errors::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `Some Guy <someguy@domain.com>`
static NAME_FIRST_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(.*) +<(.*)>$").unwrap());

/// `<someguy@domain.com> Some Guy`
static ADDRESS_FIRST_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<(.*)> +(.*)$").unwrap());

/// 未解析的地址输入：单个字符串，或 (地址, 名称) 二元组
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawAddress {
    Single(String),
    Pair(String, String),
}

impl From<&str> for RawAddress {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for RawAddress {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<&String> for RawAddress {
    fn from(value: &String) -> Self {
        Self::Single(value.clone())
    }
}

impl From<(&str, &str)> for RawAddress {
    fn from((address, name): (&str, &str)) -> Self {
        Self::Pair(address.to_string(), name.to_string())
    }
}

impl From<(String, String)> for RawAddress {
    fn from((address, name): (String, String)) -> Self {
        Self::Pair(address, name)
    }
}

/// 邮箱地址（附带可选的显示名称）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
    pub address: String,
    pub name: Option<String>,
}

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 解析地址输入
    ///
    /// 支持 `Name <addr>`、`<addr> Name` 以及 (地址, 名称) 二元组。
    /// 若名称字段是合法邮箱而地址字段不是，则两者互换。
    /// 不带尖括号的 `Name addr@domain` 不会被拆分。
    pub fn parse(raw: impl Into<RawAddress>) -> Self {
        let (mut address, mut name) = match raw.into() {
            RawAddress::Single(address) => (address, None),
            RawAddress::Pair(address, name) => (address, Some(name)),
        };

        if let Some(caps) = NAME_FIRST_REGEX.captures(&address) {
            let (found_address, found_name) = (caps[2].to_string(), caps[1].to_string());
            address = found_address;
            name = Some(found_name);
        } else if let Some(caps) = ADDRESS_FIRST_REGEX.captures(&address) {
            let (found_address, found_name) = (caps[1].to_string(), caps[2].to_string());
            address = found_address;
            name = Some(found_name);
        }

        address = strip_delimiters(&address);
        name = name.map(|n| strip_delimiters(&n));

        if let Some(candidate) = name.take() {
            if validate_email(&candidate).is_ok() && validate_email(&address).is_err() {
                name = Some(std::mem::replace(&mut address, candidate));
            } else {
                name = Some(candidate);
            }
        }

        Self { address, name }
    }

    /// 校验地址部分
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.address)
    }

    /// 非空的显示名称
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_name() {
            Some(name) => write!(f, "{} <{}>", name, self.address),
            None => write!(f, "{}", self.address),
        }
    }
}

fn strip_delimiters(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, '<' | '>' | '|')).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_first() {
        let address = Address::parse("Some Guy <someguy@domain.com>");
        assert_eq!(address.address, "someguy@domain.com");
        assert_eq!(address.name.as_deref(), Some("Some Guy"));
    }

    #[test]
    fn test_parse_address_first() {
        let address = Address::parse("<someguy@domain.com> Some Guy");
        assert_eq!(address.address, "someguy@domain.com");
        assert_eq!(address.name.as_deref(), Some("Some Guy"));
    }

    #[test]
    fn test_parse_plain_address() {
        let address = Address::parse("someguy@domain.com");
        assert_eq!(address, Address::new("someguy@domain.com"));
    }

    #[test]
    fn test_parse_bracketed_address_only() {
        let address = Address::parse("<someguy@domain.com>");
        assert_eq!(address.address, "someguy@domain.com");
        assert_eq!(address.name, None);
    }

    #[test]
    fn test_parse_pair() {
        let address = Address::parse(("someguy@domain.com", "Some Guy"));
        assert_eq!(address.address, "someguy@domain.com");
        assert_eq!(address.name.as_deref(), Some("Some Guy"));
    }

    #[test]
    fn test_parse_swapped_pair() {
        let address = Address::parse(("Some Guy", "someguy@domain.com"));
        assert_eq!(address.address, "someguy@domain.com");
        assert_eq!(address.name.as_deref(), Some("Some Guy"));
    }

    #[test]
    fn test_no_swap_when_both_valid() {
        let address = Address::parse(("first@domain.com", "second@domain.com"));
        assert_eq!(address.address, "first@domain.com");
        assert_eq!(address.name.as_deref(), Some("second@domain.com"));
    }

    #[test]
    fn test_no_swap_when_neither_valid() {
        let address = Address::parse(("Some Guy", "Another Guy"));
        assert_eq!(address.address, "Some Guy");
        assert_eq!(address.name.as_deref(), Some("Another Guy"));
    }

    #[test]
    fn test_pipes_are_stripped() {
        let address = Address::parse(("some|guy@domain.com", "Some |Guy"));
        assert_eq!(address.address, "someguy@domain.com");
        assert_eq!(address.name.as_deref(), Some("Some Guy"));
    }

    #[test]
    fn test_unbracketed_name_is_not_split() {
        let address = Address::parse("Some Guy someguy@domain.com");
        assert_eq!(address.address, "Some Guy someguy@domain.com");
        assert_eq!(address.name, None);
        assert!(address.validate().is_err());

        let address = Address::parse("someguy@domain.com Some Guy");
        assert!(address.validate().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Address::new("a@example.com").with_name("Alerts").to_string(),
            "Alerts <a@example.com>"
        );
        assert_eq!(Address::new("a@example.com").to_string(), "a@example.com");
        assert_eq!(
            Address::new("a@example.com").with_name("").to_string(),
            "a@example.com"
        );
    }
}
