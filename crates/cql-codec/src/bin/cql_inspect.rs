//! `cql-inspect`：把十六进制单元格值按列类型解码并打印。
//!
//! # 教案式说明
//! - **意图（Why）**：排查线上数据时，常常只有抓包或日志里的一段十六进制字节与列类型；
//!   本工具直接复用进程级注册表给出解码结果，避免手工拆字节。
//! - **用法（What）**：
//!   - `cql-inspect int 00000020`
//!   - `cql-inspect 'map<text, list<int>>' 0001...`
//!   - `cql-inspect 'DynamicCompositeType(s=>UTF8Type,i=>Int32Type)' 80730003666f6f00`
//!   - `--config cql.toml` 读取 `[composite.aliases]`，当类型串本身不带别名时使用。
//! - **实现（How）**：类型表达式按 CQL 书写习惯递归解析为 [`TypeSpec`]；无法识别的名字按自定义类名处理。

use std::{env, path::PathBuf};

use anyhow::{Context, Result, bail};
use bytes::Bytes;
use cql_codec::{AliasTable, CodecRegistry, CodecTable, CompositeConfig, DynamicCompositeCodec};
use cql_core::config::from_toml_file;
use cql_core::telemetry::install_fmt_subscriber;
use cql_core::{ColumnInfo, ColumnTypeCode, TypeSpec};
use serde::Deserialize;
use tracing::{debug, warn};

const USAGE: &str = "usage: cql-inspect <type> <hex> [--config <file.toml>]";

#[derive(Debug, Default, Deserialize)]
struct InspectConfig {
    #[serde(default)]
    composite: CompositeConfig,
}

struct Args {
    type_expr: String,
    hex: String,
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    if let Err(err) = install_fmt_subscriber() {
        eprintln!("cql-inspect: logging disabled: {err}");
    }

    let args = parse_args(env::args().skip(1))?;
    let spec = parse_type(&args.type_expr)?;
    let raw = hex::decode(args.hex.trim()).context("value is not valid hex")?;
    let bytes = Bytes::from(raw);
    debug!(target: "cql_inspect", %spec, len = bytes.len(), "decoding cell");

    if spec.info.is_dynamic_composite() {
        let aliases = composite_aliases(&spec.info, args.config.as_ref())?;
        let codec = DynamicCompositeCodec::new(aliases);
        for (index, entry) in codec.decode(&bytes)?.iter().enumerate() {
            println!("[{index}] {:?} {}: {:?}", entry.header, entry.kind, entry.value);
        }
        return Ok(());
    }

    let table = CodecTable::global();
    let value = table.decode_spec(&bytes, &spec)?;
    println!("{spec} -> {}", table.resolve_native_type(spec.code, &spec.info));
    println!("{value:?}");
    Ok(())
}

fn parse_args(mut argv: impl Iterator<Item = String>) -> Result<Args> {
    let mut positional = Vec::new();
    let mut config = None;
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--config" => {
                let path = argv.next().context("--config needs a file path")?;
                config = Some(PathBuf::from(path));
            }
            "-h" | "--help" => bail!(USAGE),
            _ => positional.push(arg),
        }
    }
    let [type_expr, hex]: [String; 2] = positional
        .try_into()
        .map_err(|_| anyhow::anyhow!(USAGE))?;
    Ok(Args {
        type_expr,
        hex,
        config,
    })
}

fn composite_aliases(info: &ColumnInfo, config: Option<&PathBuf>) -> Result<AliasTable> {
    let from_type = AliasTable::from_column_info(info)?.unwrap_or_default();
    if !from_type.is_empty() {
        return Ok(from_type);
    }
    match config {
        Some(path) => {
            let config: InspectConfig = from_toml_file(path)?;
            Ok(config.composite.alias_table()?)
        }
        None => {
            warn!(target: "cql_inspect", "composite type carries no aliases and no --config was given");
            Ok(from_type)
        }
    }
}

/// 解析 `int`、`list<text>`、`map<text, set<uuid>>` 这类类型表达式。
fn parse_type(expr: &str) -> Result<TypeSpec> {
    let expr = expr.trim();
    if let Some(quoted) = expr.strip_prefix('\'').and_then(|e| e.strip_suffix('\'')) {
        return Ok(TypeSpec::custom(quoted));
    }
    let Some((head, rest)) = expr.split_once('<') else {
        return Ok(simple_or_custom(expr));
    };
    let inner = rest
        .strip_suffix('>')
        .with_context(|| format!("unbalanced `<` in `{expr}`"))?;
    match head.trim() {
        "list" => Ok(TypeSpec::list(parse_type(inner)?)),
        "set" => Ok(TypeSpec::set(parse_type(inner)?)),
        "map" => {
            let (key, value) = split_top_level(inner)
                .with_context(|| format!("map needs `key, value` in `{expr}`"))?;
            Ok(TypeSpec::map(parse_type(key)?, parse_type(value)?))
        }
        other => bail!("`{other}` is not a collection type"),
    }
}

fn simple_or_custom(name: &str) -> TypeSpec {
    ColumnTypeCode::ALL
        .iter()
        .copied()
        .filter(|code| !code.is_collection() && *code != ColumnTypeCode::Custom)
        .find(|code| code.cql_name().eq_ignore_ascii_case(name))
        .map(TypeSpec::simple)
        .unwrap_or_else(|| TypeSpec::custom(name))
}

/// 在最外层的逗号处切分，忽略尖括号与圆括号内部的逗号。
fn split_top_level(inner: &str) -> Option<(&str, &str)> {
    let mut depth = 0_i32;
    for (index, ch) in inner.char_indices() {
        match ch {
            '<' | '(' => depth += 1,
            '>' | ')' => depth -= 1,
            ',' if depth == 0 => return Some((&inner[..index], &inner[index + 1..])),
            _ => {}
        }
    }
    None
}
