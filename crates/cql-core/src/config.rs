//! TOML 配置加载。
//!
//! 各 crate 自行定义带 `serde::Deserialize` 的配置段（如组合别名表、重试策略），
//! 本模块只负责读取与错误归一：任何解析失败都映射为 [`CqlError::Config`]。

use std::{fs, path::Path};

use serde::de::DeserializeOwned;

use crate::error::{CqlError, Result};

/// 从 TOML 文本反序列化配置段。
pub fn from_toml_str<T: DeserializeOwned>(source: &str) -> Result<T> {
    toml::from_str(source).map_err(|err| CqlError::config(err.to_string()))
}

/// 从 TOML 文件反序列化配置段。
pub fn from_toml_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)
        .map_err(|err| CqlError::config(format!("cannot read `{}`: {err}", path.display())))?;
    from_toml_str(&source)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Section {
        name: String,
        #[serde(default)]
        enabled: bool,
    }

    #[test]
    fn parses_sections_with_defaults() {
        let section: Section = from_toml_str("name = \"composite\"").unwrap();
        assert_eq!(
            section,
            Section {
                name: "composite".into(),
                enabled: false
            }
        );
    }

    #[test]
    fn malformed_toml_becomes_config_error() {
        let err = from_toml_str::<Section>("name = ").unwrap_err();
        assert_eq!(err.code(), "cql.config.invalid");
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let err = from_toml_file::<Section>("/nonexistent/cql.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/cql.toml"));
    }
}
