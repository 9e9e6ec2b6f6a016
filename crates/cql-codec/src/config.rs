//! `[composite]` 配置段。
//!
//! ```toml
//! [composite.aliases]
//! s = "UTF8Type"
//! i = "org.apache.cassandra.db.marshal.Int32Type"
//! ```

use std::collections::BTreeMap;

use cql_core::{CqlError, Result};
use serde::Deserialize;

use crate::composite::{AliasTable, ComponentKind};

/// 动态组合别名配置。
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CompositeConfig {
    /// 别名 → 比较器名。
    #[serde(default)]
    pub aliases: BTreeMap<char, String>,
}

impl CompositeConfig {
    /// 转换为别名表；未知比较器或非法别名报 [`CqlError::Config`]。
    pub fn alias_table(&self) -> Result<AliasTable> {
        let mut table = AliasTable::new();
        for (alias, comparator) in &self.aliases {
            let kind = ComponentKind::from_comparator(comparator).ok_or_else(|| {
                CqlError::config(format!(
                    "alias `{alias}` maps to unsupported comparator `{comparator}`"
                ))
            })?;
            table
                .insert(*alias, kind)
                .map_err(|err| CqlError::config(err.to_string()))?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use cql_core::config::from_toml_str;

    use super::*;

    #[derive(Deserialize)]
    struct Root {
        composite: CompositeConfig,
    }

    #[test]
    fn toml_section_builds_alias_table() {
        let root: Root = from_toml_str(
            r#"
            [composite.aliases]
            s = "UTF8Type"
            i = "org.apache.cassandra.db.marshal.Int32Type"
            "#,
        )
        .unwrap();
        let table = root.composite.alias_table().unwrap();
        assert_eq!(table.kind_for('s').unwrap(), ComponentKind::Utf8);
        assert_eq!(table.kind_for('i').unwrap(), ComponentKind::Int32);
    }

    #[test]
    fn unknown_comparator_is_a_config_error() {
        let config = CompositeConfig {
            aliases: BTreeMap::from([('d', "DoubleType".to_owned())]),
        };
        let err = config.alias_table().unwrap_err();
        assert_eq!(err.code(), "cql.config.invalid");
    }

    #[test]
    fn multi_character_keys_fail_to_deserialize() {
        let err = from_toml_str::<CompositeConfig>("[aliases]\nss = \"UTF8Type\"").unwrap_err();
        assert_eq!(err.code(), "cql.config.invalid");
    }
}
