//! 动态组合值（DynamicCompositeType）的编解码。
//!
//! # 教案式说明
//! - **意图（Why）**：动态组合列把多个异构、有序的分量打包进同一个列值，常见于多段主键。
//!   分量的类型不由列本身固定，而由每个分量头部的别名字节或比较器类名决定。
//! - **契约（What）**：
//!   - 每个分量依次写出 `marker(2B) | [u16 len][payload] | eoc(1B)`，分量之间无分隔符；
//!   - 别名形式的 marker 为 `0x8000 | alias`，别名必须是单个 ASCII 字符；
//!   - 非别名形式的 marker 高位清零，数值为随后比较器类名的字节长度；
//!   - 编码只产出 `0x00` 作为 end-of-component，解码遇到其他值一律拒绝；
//!   - 零个分量对应空字节序列；分量顺序原样保留，不重排、不去重。
//! - **实现（How）**：分量载荷复用注册表中对应类型码的编解码器（如 `i => Int32Type` 走 `int`），
//!   因此载荷格式与同类型的独立列值完全一致。

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use cql_core::types::{DYNAMIC_COMPOSITE_TYPE, comparator_short_name};
use cql_core::{BeReader, BeWriter, ColumnInfo, ColumnTypeCode, CqlError, CqlValue, Result};
use tracing::trace;

use crate::registry::{CodecRegistry, CodecTable};

const ALIAS_FLAG: u16 = 0x8000;
const END_OF_COMPONENT: u8 = 0x00;

/// 分量的比较器类别。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// `UTF8Type`。
    Utf8,
    /// `AsciiType`。
    Ascii,
    /// `Int32Type`。
    Int32,
    /// `LongType`。
    Long,
    /// `BytesType`。
    Bytes,
    /// `UUIDType` 或 `TimeUUIDType`。
    Uuid,
}

impl ComponentKind {
    /// 按比较器名解析，接受短名或带包名前缀的全名。
    #[must_use]
    pub fn from_comparator(name: &str) -> Option<Self> {
        match comparator_short_name(name.trim()) {
            "UTF8Type" => Some(Self::Utf8),
            "AsciiType" => Some(Self::Ascii),
            "Int32Type" => Some(Self::Int32),
            "LongType" => Some(Self::Long),
            "BytesType" => Some(Self::Bytes),
            "UUIDType" | "TimeUUIDType" => Some(Self::Uuid),
            _ => None,
        }
    }

    /// 比较器短名。
    #[must_use]
    pub const fn comparator_name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF8Type",
            Self::Ascii => "AsciiType",
            Self::Int32 => "Int32Type",
            Self::Long => "LongType",
            Self::Bytes => "BytesType",
            Self::Uuid => "UUIDType",
        }
    }

    /// 载荷复用的列类型码。
    #[must_use]
    pub const fn type_code(self) -> ColumnTypeCode {
        match self {
            Self::Utf8 => ColumnTypeCode::Text,
            Self::Ascii => ColumnTypeCode::Ascii,
            Self::Int32 => ColumnTypeCode::Int,
            Self::Long => ColumnTypeCode::Bigint,
            Self::Bytes => ColumnTypeCode::Blob,
            Self::Uuid => ColumnTypeCode::Uuid,
        }
    }

    /// 该类别能否承载给定原生值。
    #[must_use]
    pub fn accepts(self, value: &CqlValue) -> bool {
        matches!(
            (self, value),
            (Self::Utf8 | Self::Ascii, CqlValue::Text(_))
                | (Self::Int32, CqlValue::Int(_))
                | (Self::Long, CqlValue::BigInt(_))
                | (Self::Bytes, CqlValue::Blob(_))
                | (Self::Uuid, CqlValue::Uuid(_))
        )
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.comparator_name())
    }
}

/// 别名 → 分量类别的映射表。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: BTreeMap<char, ComponentKind>,
}

impl AliasTable {
    /// 空表。
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记别名；同一别名重复登记时后者覆盖前者。
    pub fn insert(&mut self, alias: char, kind: ComponentKind) -> Result<&mut Self> {
        if !alias.is_ascii() || alias == '\0' {
            return Err(CqlError::invalid_value(
                "composite alias",
                format!("alias {alias:?} must be a single non-nul ASCII character"),
            ));
        }
        self.entries.insert(alias, kind);
        Ok(self)
    }

    /// 链式构造。
    pub fn with(mut self, alias: char, kind: ComponentKind) -> Result<Self> {
        self.insert(alias, kind)?;
        Ok(self)
    }

    /// 查询别名对应的类别。
    pub fn kind_for(&self, alias: char) -> Result<ComponentKind> {
        self.entries
            .get(&alias)
            .copied()
            .ok_or(CqlError::UnknownCompositeAlias { alias })
    }

    /// 为原生值挑选别名：按别名字符序取第一个能承载该值的类别。
    #[must_use]
    pub fn alias_for(&self, value: &CqlValue) -> Option<char> {
        self.entries
            .iter()
            .find(|(_, kind)| kind.accepts(value))
            .map(|(alias, _)| *alias)
    }

    /// 已登记的别名数。
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空表。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按别名字符序遍历。
    pub fn iter(&self) -> impl Iterator<Item = (char, ComponentKind)> + '_ {
        self.entries.iter().map(|(alias, kind)| (*alias, *kind))
    }

    /// 解析服务端给出的 `DynamicCompositeType(s=>UTF8Type, i=>Int32Type)` 类名。
    ///
    /// # 契约说明
    /// - 外层类名可带包名前缀，括号内条目以逗号分隔，`=>` 两侧允许空白；
    /// - 比较器可写短名或全名；未知比较器、多字符别名或非动态组合类名均为协议违例；
    /// - 不带括号的 `DynamicCompositeType` 得到空表。
    pub fn parse_comparator(class_name: &str) -> Result<Self> {
        const CONTEXT: &str = "dynamic composite comparator";
        let class_name = class_name.trim();
        let short = comparator_short_name(class_name);
        let Some(params) = short.strip_prefix(DYNAMIC_COMPOSITE_TYPE) else {
            return Err(CqlError::protocol(
                CONTEXT,
                format!("`{class_name}` is not a {DYNAMIC_COMPOSITE_TYPE}"),
            ));
        };
        let params = params.trim();
        if params.is_empty() {
            return Ok(Self::new());
        }
        let inner = params
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| {
                CqlError::protocol(CONTEXT, format!("unbalanced parameter list `{params}`"))
            })?;

        let mut table = Self::new();
        for entry in inner.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (alias, comparator) = entry.split_once("=>").ok_or_else(|| {
                CqlError::protocol(CONTEXT, format!("entry `{entry}` lacks `=>`"))
            })?;
            let mut chars = alias.trim().chars();
            let (Some(alias), None) = (chars.next(), chars.next()) else {
                return Err(CqlError::protocol(
                    CONTEXT,
                    format!("alias `{}` must be a single character", alias.trim()),
                ));
            };
            let kind = ComponentKind::from_comparator(comparator).ok_or_else(|| {
                CqlError::protocol(
                    CONTEXT,
                    format!("unsupported component comparator `{}`", comparator.trim()),
                )
            })?;
            table
                .insert(alias, kind)
                .map_err(|err| CqlError::protocol(CONTEXT, err.to_string()))?;
        }
        Ok(table)
    }

    /// 从列元数据提取别名表；非动态组合列返回 `Ok(None)`。
    pub fn from_column_info(info: &ColumnInfo) -> Result<Option<Self>> {
        if !info.is_dynamic_composite() {
            return Ok(None);
        }
        info.custom_class_name()
            .map(Self::parse_comparator)
            .transpose()
    }
}

/// 分量头部：别名或比较器类名。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComponentHeader {
    /// `0x8000 | alias` 形式。
    Alias(char),
    /// 长度 + 比较器类名形式，原样保留类名以便重新编码。
    Comparator(String),
}

/// 解码得到的单个分量。
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeEntry {
    /// 线上头部。
    pub header: ComponentHeader,
    /// 分量类别。
    pub kind: ComponentKind,
    /// 分量值。
    pub value: CqlValue,
}

/// 基于别名表的动态组合值编解码器。
pub struct DynamicCompositeCodec {
    aliases: AliasTable,
    registry: &'static dyn CodecRegistry,
}

impl DynamicCompositeCodec {
    /// 使用进程级注册表。
    #[must_use]
    pub fn new(aliases: AliasTable) -> Self {
        Self::with_registry(aliases, CodecTable::global())
    }

    /// 指定载荷派发所用的注册表。
    #[must_use]
    pub fn with_registry(aliases: AliasTable, registry: &'static dyn CodecRegistry) -> Self {
        Self { aliases, registry }
    }

    /// 按列元数据构造；非动态组合列返回 `Ok(None)`。
    pub fn for_column(info: &ColumnInfo) -> Result<Option<Self>> {
        Ok(AliasTable::from_column_info(info)?.map(Self::new))
    }

    /// 当前别名表。
    #[must_use]
    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// 编码一组分量，别名由 [`AliasTable::alias_for`] 自动挑选。
    pub fn encode(&self, components: &[CqlValue]) -> Result<Bytes> {
        let mut writer = BeWriter::new();
        for value in components {
            let alias = self
                .aliases
                .alias_for(value)
                .ok_or_else(|| CqlError::unmapped_component(value.type_name()))?;
            self.write_aliased(&mut writer, alias, value)?;
        }
        Ok(writer.freeze())
    }

    /// 以显式别名编码一组分量。
    pub fn encode_aliased(&self, components: &[(char, CqlValue)]) -> Result<Bytes> {
        let mut writer = BeWriter::new();
        for (alias, value) in components {
            self.write_aliased(&mut writer, *alias, value)?;
        }
        Ok(writer.freeze())
    }

    /// 按解码结果原样重新编码，保留每个分量的头部形式。
    pub fn encode_entries(&self, entries: &[CompositeEntry]) -> Result<Bytes> {
        let mut writer = BeWriter::new();
        for entry in entries {
            match &entry.header {
                ComponentHeader::Alias(alias) => {
                    self.write_aliased(&mut writer, *alias, &entry.value)?;
                }
                ComponentHeader::Comparator(name) => {
                    let len = u16::try_from(name.len())
                        .ok()
                        .filter(|len| len & ALIAS_FLAG == 0)
                        .ok_or_else(|| {
                            CqlError::invalid_value(
                                "composite comparator header",
                                format!("comparator name of {} bytes is too long", name.len()),
                            )
                        })?;
                    writer.write_u16(len);
                    writer.write_raw(name.as_bytes());
                    self.write_payload(&mut writer, entry.kind, &entry.value)?;
                }
            }
        }
        Ok(writer.freeze())
    }

    /// 解码完整的组合列值。
    pub fn decode(&self, bytes: &Bytes) -> Result<Vec<CompositeEntry>> {
        let mut reader = BeReader::new(bytes.clone());
        let mut entries = Vec::new();
        while !reader.is_empty() {
            let marker = reader.read_u16("composite component header")?;
            let (header, kind) = if marker & ALIAS_FLAG != 0 {
                let alias = char::from((marker & 0x00ff) as u8);
                (ComponentHeader::Alias(alias), self.aliases.kind_for(alias)?)
            } else {
                let raw = reader.read_bytes(usize::from(marker), "composite comparator header")?;
                let name = String::from_utf8(raw.to_vec()).map_err(|err| {
                    CqlError::protocol("composite comparator header", err.to_string())
                })?;
                let kind = ComponentKind::from_comparator(&name).ok_or_else(|| {
                    CqlError::protocol(
                        "composite comparator header",
                        format!("unsupported component comparator `{name}`"),
                    )
                })?;
                (ComponentHeader::Comparator(name), kind)
            };

            let len = usize::from(reader.read_u16("composite component length")?);
            let payload = reader.read_bytes(len, "composite component payload")?;
            let value = self
                .registry
                .decode(&payload, kind.type_code(), &ColumnInfo::None)?;

            let eoc = reader.read_u8("composite end-of-component")?;
            if eoc != END_OF_COMPONENT {
                return Err(CqlError::protocol(
                    "composite end-of-component",
                    format!("expected 0x00, got 0x{eoc:02x}"),
                ));
            }
            entries.push(CompositeEntry {
                header,
                kind,
                value,
            });
        }
        trace!(
            target: "cql_codec::composite",
            components = entries.len(),
            "decoded dynamic composite value"
        );
        Ok(entries)
    }

    /// 只取分量值的解码便捷入口。
    pub fn decode_values(&self, bytes: &Bytes) -> Result<Vec<CqlValue>> {
        Ok(self
            .decode(bytes)?
            .into_iter()
            .map(|entry| entry.value)
            .collect())
    }

    fn write_aliased(&self, writer: &mut BeWriter, alias: char, value: &CqlValue) -> Result<()> {
        let kind = self.aliases.kind_for(alias)?;
        // 别名在登记时已保证是 ASCII，必落在低字节。
        writer.write_u16(ALIAS_FLAG | alias as u16);
        self.write_payload(writer, kind, value)
    }

    fn write_payload(
        &self,
        writer: &mut BeWriter,
        kind: ComponentKind,
        value: &CqlValue,
    ) -> Result<()> {
        let payload = self
            .registry
            .encode(value, kind.type_code(), &ColumnInfo::None)?;
        writer.write_short_bytes(&payload, "composite component payload")?;
        writer.write_u8(END_OF_COMPONENT);
        Ok(())
    }
}

impl fmt::Debug for DynamicCompositeCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicCompositeCodec")
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPARATOR: &str = "org.apache.cassandra.db.marshal.DynamicCompositeType(\
        s=>org.apache.cassandra.db.marshal.UTF8Type, i => Int32Type)";

    fn codec() -> DynamicCompositeCodec {
        DynamicCompositeCodec::new(AliasTable::parse_comparator(COMPARATOR).unwrap())
    }

    #[test]
    fn parses_short_and_qualified_comparators() {
        let table = AliasTable::parse_comparator(COMPARATOR).unwrap();
        assert_eq!(table.kind_for('s').unwrap(), ComponentKind::Utf8);
        assert_eq!(table.kind_for('i').unwrap(), ComponentKind::Int32);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn bare_type_name_has_no_aliases() {
        let table = AliasTable::parse_comparator("DynamicCompositeType").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn rejects_foreign_class_names() {
        let err = AliasTable::parse_comparator("CompositeType(UTF8Type)").unwrap_err();
        assert!(err.is_protocol_violation());
    }

    #[test]
    fn rejects_multi_character_aliases() {
        let err = AliasTable::parse_comparator("DynamicCompositeType(ss=>UTF8Type)").unwrap_err();
        assert!(err.to_string().contains("single character"));
    }

    #[test]
    fn text_then_int_is_byte_exact() {
        let bytes = codec()
            .encode(&[CqlValue::from("foo"), CqlValue::Int(32)])
            .unwrap();
        assert_eq!(
            hex::encode(&bytes),
            "8073000366\
             6f6f00\
             8069000400000020\
             00"
        );
    }

    #[test]
    fn zero_components_encode_to_nothing() {
        assert!(codec().encode(&[]).unwrap().is_empty());
        assert!(codec().decode(&Bytes::new()).unwrap().is_empty());
    }

    #[test]
    fn unknown_alias_is_reported() {
        let bytes = Bytes::from(hex::decode("807a00040000000100").unwrap());
        let err = codec().decode(&bytes).unwrap_err();
        assert_eq!(err, CqlError::UnknownCompositeAlias { alias: 'z' });
    }

    #[test]
    fn non_zero_terminator_is_rejected() {
        let bytes = Bytes::from(hex::decode("806900040000000101").unwrap());
        let err = codec().decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("expected 0x00, got 0x01"));
    }

    #[test]
    fn comparator_headers_decode_and_reencode() {
        let name = "Int32Type";
        let mut raw = Vec::new();
        raw.extend_from_slice(&(name.len() as u16).to_be_bytes());
        raw.extend_from_slice(name.as_bytes());
        raw.extend_from_slice(&hex::decode("00040000002a00").unwrap());
        let bytes = Bytes::from(raw);

        let codec = codec();
        let entries = codec.decode(&bytes).unwrap();
        assert_eq!(
            entries,
            vec![CompositeEntry {
                header: ComponentHeader::Comparator(name.to_owned()),
                kind: ComponentKind::Int32,
                value: CqlValue::Int(42),
            }]
        );
        assert_eq!(codec.encode_entries(&entries).unwrap(), bytes);
    }

    #[test]
    fn explicit_alias_must_match_value_type() {
        let err = codec()
            .encode_aliased(&[('i', CqlValue::from("foo"))])
            .unwrap_err();
        assert_eq!(err.code(), "cql.codec.type_mismatch");
    }

    #[test]
    fn column_info_yields_alias_table() {
        let info = ColumnInfo::Custom {
            class_name: COMPARATOR.into(),
        };
        let table = AliasTable::from_column_info(&info).unwrap().unwrap();
        assert_eq!(table.alias_for(&CqlValue::Int(1)), Some('i'));
        assert!(AliasTable::from_column_info(&ColumnInfo::None).unwrap().is_none());
    }
}
