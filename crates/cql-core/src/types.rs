//! 列类型码与列元数据。
//!
//! - [`ColumnTypeCode`]：线上类型判别码，封闭枚举；
//! - [`ColumnInfo`]：类型码的附加元数据（集合元素类型、自定义类型类名）；
//! - [`TypeSpec`]：二者的组合，对应协议中的 `[option]`。

use std::{fmt, sync::Arc};

use crate::{
    error::{CqlError, Result},
    wire::{BeReader, BeWriter},
};

/// 自定义类型中动态组合比较器的类名（短名）。
pub const DYNAMIC_COMPOSITE_TYPE: &str = "DynamicCompositeType";

/// `[option]` 中集合类型允许的最大嵌套层数。
pub const MAX_TYPE_DEPTH: usize = 16;

/// 列的线上类型码。
///
/// # 契约说明（What）
/// - 判别值即协议 `[option]` 中的 id，取值全部落在 `0..=0xff` 内，注册表可据此直接按下标派发；
/// - `Decimal`/`Varint` 仅在 `arbitrary-precision` Feature 开启时存在；
/// - 从线上整数转换请使用 [`ColumnTypeCode::from_wire`]，未知 id 属于协议违例。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum ColumnTypeCode {
    /// 服务端自定义类型，值为不透明字节。
    Custom = 0x0000,
    /// ASCII 字符串。
    Ascii = 0x0001,
    /// 64 位有符号整数。
    Bigint = 0x0002,
    /// 任意字节。
    Blob = 0x0003,
    /// 布尔。
    Boolean = 0x0004,
    /// 计数器（64 位）。
    Counter = 0x0005,
    /// 任意精度小数。
    #[cfg(feature = "arbitrary-precision")]
    Decimal = 0x0006,
    /// IEEE-754 双精度。
    Double = 0x0007,
    /// IEEE-754 单精度。
    Float = 0x0008,
    /// 32 位有符号整数。
    Int = 0x0009,
    /// UTF-8 文本。
    Text = 0x000A,
    /// 毫秒时间戳。
    Timestamp = 0x000B,
    /// UUID。
    Uuid = 0x000C,
    /// UTF-8 文本（`varchar` 别名）。
    Varchar = 0x000D,
    /// 任意精度整数。
    #[cfg(feature = "arbitrary-precision")]
    Varint = 0x000E,
    /// 基于时间的 UUID（版本 1）。
    Timeuuid = 0x000F,
    /// IPv4/IPv6 地址。
    Inet = 0x0010,
    /// 列表。
    List = 0x0020,
    /// 映射。
    Map = 0x0021,
    /// 集合。
    Set = 0x0022,
}

impl ColumnTypeCode {
    /// 全部可用的类型码，按线上 id 升序排列。
    pub const ALL: &'static [ColumnTypeCode] = &[
        ColumnTypeCode::Custom,
        ColumnTypeCode::Ascii,
        ColumnTypeCode::Bigint,
        ColumnTypeCode::Blob,
        ColumnTypeCode::Boolean,
        ColumnTypeCode::Counter,
        #[cfg(feature = "arbitrary-precision")]
        ColumnTypeCode::Decimal,
        ColumnTypeCode::Double,
        ColumnTypeCode::Float,
        ColumnTypeCode::Int,
        ColumnTypeCode::Text,
        ColumnTypeCode::Timestamp,
        ColumnTypeCode::Uuid,
        ColumnTypeCode::Varchar,
        #[cfg(feature = "arbitrary-precision")]
        ColumnTypeCode::Varint,
        ColumnTypeCode::Timeuuid,
        ColumnTypeCode::Inet,
        ColumnTypeCode::List,
        ColumnTypeCode::Map,
        ColumnTypeCode::Set,
    ];

    /// 线上 id。
    #[must_use]
    pub const fn wire_id(self) -> u16 {
        self as u16
    }

    /// 派发表下标。
    #[must_use]
    pub const fn index(self) -> usize {
        self as u16 as usize
    }

    /// 从线上 id 解析类型码。
    pub fn from_wire(id: u16) -> Result<Self> {
        ColumnTypeCode::ALL
            .iter()
            .copied()
            .find(|code| code.wire_id() == id)
            .ok_or_else(|| {
                CqlError::protocol("type option id", format!("unknown column type id 0x{id:04x}"))
            })
    }

    /// 是否为集合类型。
    #[must_use]
    pub const fn is_collection(self) -> bool {
        matches!(
            self,
            ColumnTypeCode::List | ColumnTypeCode::Map | ColumnTypeCode::Set
        )
    }

    /// CQL 名称。
    #[must_use]
    pub const fn cql_name(self) -> &'static str {
        match self {
            ColumnTypeCode::Custom => "custom",
            ColumnTypeCode::Ascii => "ascii",
            ColumnTypeCode::Bigint => "bigint",
            ColumnTypeCode::Blob => "blob",
            ColumnTypeCode::Boolean => "boolean",
            ColumnTypeCode::Counter => "counter",
            #[cfg(feature = "arbitrary-precision")]
            ColumnTypeCode::Decimal => "decimal",
            ColumnTypeCode::Double => "double",
            ColumnTypeCode::Float => "float",
            ColumnTypeCode::Int => "int",
            ColumnTypeCode::Text => "text",
            ColumnTypeCode::Timestamp => "timestamp",
            ColumnTypeCode::Uuid => "uuid",
            ColumnTypeCode::Varchar => "varchar",
            #[cfg(feature = "arbitrary-precision")]
            ColumnTypeCode::Varint => "varint",
            ColumnTypeCode::Timeuuid => "timeuuid",
            ColumnTypeCode::Inet => "inet",
            ColumnTypeCode::List => "list",
            ColumnTypeCode::Map => "map",
            ColumnTypeCode::Set => "set",
        }
    }
}

impl fmt::Display for ColumnTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cql_name())
    }
}

/// 类型码的附加元数据，解析后不可变。
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ColumnInfo {
    /// 无附加信息的标量类型。
    #[default]
    None,
    /// 自定义类型，携带服务端给出的全限定类名。
    Custom {
        /// 例如 `org.apache.cassandra.db.marshal.DynamicCompositeType(s=>...)`。
        class_name: Arc<str>,
    },
    /// 列表元素类型。
    List {
        /// 元素类型。
        element: Box<TypeSpec>,
    },
    /// 集合元素类型。
    Set {
        /// 元素类型。
        element: Box<TypeSpec>,
    },
    /// 映射键值类型。
    Map {
        /// 键类型。
        key: Box<TypeSpec>,
        /// 值类型。
        value: Box<TypeSpec>,
    },
}

impl ColumnInfo {
    /// 自定义类型的类名。
    #[must_use]
    pub fn custom_class_name(&self) -> Option<&str> {
        match self {
            ColumnInfo::Custom { class_name } => Some(&**class_name),
            _ => None,
        }
    }

    /// 是否为动态组合类型。
    #[must_use]
    pub fn is_dynamic_composite(&self) -> bool {
        self.custom_class_name()
            .map(|name| comparator_short_name(name).starts_with(DYNAMIC_COMPOSITE_TYPE))
            .unwrap_or(false)
    }
}

/// 去掉 `org.apache.cassandra.db.marshal.` 这类包名前缀，仅保留比较器短名（含参数部分）。
#[must_use]
pub fn comparator_short_name(class_name: &str) -> &str {
    let head_end = class_name.find('(').unwrap_or(class_name.len());
    match class_name[..head_end].rfind('.') {
        Some(dot) => &class_name[dot + 1..],
        None => class_name,
    }
}

/// 完整的列类型描述：类型码 + 附加元数据。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeSpec {
    /// 类型码。
    pub code: ColumnTypeCode,
    /// 附加元数据。
    pub info: ColumnInfo,
}

impl TypeSpec {
    /// 标量类型。
    #[must_use]
    pub fn simple(code: ColumnTypeCode) -> Self {
        Self {
            code,
            info: ColumnInfo::None,
        }
    }

    /// 自定义类型。
    #[must_use]
    pub fn custom(class_name: impl Into<Arc<str>>) -> Self {
        Self {
            code: ColumnTypeCode::Custom,
            info: ColumnInfo::Custom {
                class_name: class_name.into(),
            },
        }
    }

    /// `list<element>`。
    #[must_use]
    pub fn list(element: TypeSpec) -> Self {
        Self {
            code: ColumnTypeCode::List,
            info: ColumnInfo::List {
                element: Box::new(element),
            },
        }
    }

    /// `set<element>`。
    #[must_use]
    pub fn set(element: TypeSpec) -> Self {
        Self {
            code: ColumnTypeCode::Set,
            info: ColumnInfo::Set {
                element: Box::new(element),
            },
        }
    }

    /// `map<key, value>`。
    #[must_use]
    pub fn map(key: TypeSpec, value: TypeSpec) -> Self {
        Self {
            code: ColumnTypeCode::Map,
            info: ColumnInfo::Map {
                key: Box::new(key),
                value: Box::new(value),
            },
        }
    }

    /// 解析协议中的 `[option]`。
    ///
    /// # 契约说明
    /// - Custom 后随 `[string]` 类名；List/Set 后随一个嵌套 `[option]`；Map 后随两个；
    /// - 集合类型码与附加信息必须同时出现，未知 id 返回协议违例；
    /// - 集合嵌套超过 [`MAX_TYPE_DEPTH`] 层返回协议违例，不会耗尽调用栈。
    pub fn read_option(reader: &mut BeReader) -> Result<Self> {
        Self::read_option_at(reader, 0)
    }

    fn read_option_at(reader: &mut BeReader, depth: usize) -> Result<Self> {
        if depth > MAX_TYPE_DEPTH {
            return Err(CqlError::protocol(
                "type option",
                format!("nesting exceeds {MAX_TYPE_DEPTH} levels"),
            ));
        }
        let code = ColumnTypeCode::from_wire(reader.read_u16("type option id")?)?;
        let info = match code {
            ColumnTypeCode::Custom => ColumnInfo::Custom {
                class_name: Arc::from(reader.read_string("custom type class")?),
            },
            ColumnTypeCode::List => ColumnInfo::List {
                element: Box::new(TypeSpec::read_option_at(reader, depth + 1)?),
            },
            ColumnTypeCode::Set => ColumnInfo::Set {
                element: Box::new(TypeSpec::read_option_at(reader, depth + 1)?),
            },
            ColumnTypeCode::Map => {
                let key = TypeSpec::read_option_at(reader, depth + 1)?;
                let value = TypeSpec::read_option_at(reader, depth + 1)?;
                ColumnInfo::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                }
            }
            _ => ColumnInfo::None,
        };
        Ok(Self { code, info })
    }

    /// 写出 `[option]`，与 [`TypeSpec::read_option`] 对称。
    pub fn write_option(&self, writer: &mut BeWriter) -> Result<()> {
        writer.write_u16(self.code.wire_id());
        match &self.info {
            ColumnInfo::None => Ok(()),
            ColumnInfo::Custom { class_name } => writer.write_string(class_name, "custom type class"),
            ColumnInfo::List { element } | ColumnInfo::Set { element } => {
                element.write_option(writer)
            }
            ColumnInfo::Map { key, value } => {
                key.write_option(writer)?;
                value.write_option(writer)
            }
        }
    }
}

impl From<ColumnTypeCode> for TypeSpec {
    fn from(code: ColumnTypeCode) -> Self {
        TypeSpec::simple(code)
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.info {
            ColumnInfo::Custom { class_name } => write!(f, "'{class_name}'"),
            ColumnInfo::List { element } => write!(f, "list<{element}>"),
            ColumnInfo::Set { element } => write!(f, "set<{element}>"),
            ColumnInfo::Map { key, value } => write!(f, "map<{key}, {value}>"),
            ColumnInfo::None => f.write_str(self.code.cql_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_wire_id_is_a_protocol_violation() {
        assert!(ColumnTypeCode::from_wire(0x0030).unwrap_err().is_protocol_violation());
        assert_eq!(ColumnTypeCode::from_wire(0x000B).unwrap(), ColumnTypeCode::Timestamp);
    }

    #[test]
    fn every_code_fits_the_dispatch_table() {
        for code in ColumnTypeCode::ALL {
            assert!(code.index() <= usize::from(u8::MAX));
        }
    }

    #[test]
    fn option_round_trips_nested_collections() {
        let spec = TypeSpec::map(
            TypeSpec::simple(ColumnTypeCode::Text),
            TypeSpec::list(TypeSpec::custom("org.apache.cassandra.db.marshal.BytesType")),
        );
        let mut writer = BeWriter::new();
        spec.write_option(&mut writer).unwrap();
        let mut reader = BeReader::new(writer.freeze());
        assert_eq!(TypeSpec::read_option(&mut reader).unwrap(), spec);
        assert!(reader.is_empty());
        assert_eq!(
            spec.to_string(),
            "map<text, list<'org.apache.cassandra.db.marshal.BytesType'>>"
        );
    }

    #[test]
    fn nesting_is_bounded() {
        let nested = |levels: usize| {
            (0..levels).fold(TypeSpec::simple(ColumnTypeCode::Int), |inner, _| TypeSpec::list(inner))
        };
        let mut writer = BeWriter::new();
        nested(MAX_TYPE_DEPTH).write_option(&mut writer).unwrap();
        let mut reader = BeReader::new(writer.freeze());
        assert_eq!(TypeSpec::read_option(&mut reader).unwrap(), nested(MAX_TYPE_DEPTH));

        let mut writer = BeWriter::new();
        nested(MAX_TYPE_DEPTH + 1).write_option(&mut writer).unwrap();
        let mut reader = BeReader::new(writer.freeze());
        let err = TypeSpec::read_option(&mut reader).unwrap_err();
        assert!(err.is_protocol_violation(), "{err}");
    }

    #[test]
    fn dynamic_composite_is_recognised_by_short_name() {
        let spec = TypeSpec::custom(
            "org.apache.cassandra.db.marshal.DynamicCompositeType(s=>org.apache.cassandra.db.marshal.UTF8Type)",
        );
        assert!(spec.info.is_dynamic_composite());
        assert!(!TypeSpec::custom("BytesType").info.is_dynamic_composite());
        assert!(!ColumnInfo::None.is_dynamic_composite());
    }
}
