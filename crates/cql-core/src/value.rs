//! 原生值模型与原生类型描述符。
//!
//! # 教案式说明
//! - **意图 (Why)**：编解码器在"线上字节"与"调用方可直接使用的 Rust 值"之间转换，
//!   [`CqlValue`] 即后者的封闭集合；[`NativeType`] 是 `resolve_native_type` 的返回值，
//!   描述某列解码后会得到哪一种 [`CqlValue`]。
//! - **契约 (What)**：
//!   - 每个 [`CqlValue`] 变体都有唯一的 [`CqlValue::type_name`]，编码端据此报告类型不符；
//!   - `Text` 同时承载 ascii/text/varchar 三种列，`BigInt` 同时承载 bigint/counter；
//!   - `List` 与 `Set` 是不同的原生类型，不会互相隐式转换。

use std::{fmt, net::IpAddr};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[cfg(feature = "arbitrary-precision")]
use bigdecimal::BigDecimal;
#[cfg(feature = "arbitrary-precision")]
use num_bigint::BigInt;

/// 解码后的原生值。
#[derive(Clone, Debug, PartialEq)]
pub enum CqlValue {
    /// ascii / text / varchar。
    Text(String),
    /// bigint / counter。
    BigInt(i64),
    /// int。
    Int(i32),
    /// float。
    Float(f32),
    /// double。
    Double(f64),
    /// boolean。
    Boolean(bool),
    /// blob / custom。
    Blob(Bytes),
    /// timestamp，带时区的时刻。
    Timestamp(DateTime<Utc>),
    /// uuid / timeuuid。
    Uuid(Uuid),
    /// inet。
    Inet(IpAddr),
    /// list。
    List(Vec<CqlValue>),
    /// set，保持线上顺序。
    Set(Vec<CqlValue>),
    /// map，保持线上顺序。
    Map(Vec<(CqlValue, CqlValue)>),
    /// decimal。
    #[cfg(feature = "arbitrary-precision")]
    Decimal(BigDecimal),
    /// varint。
    #[cfg(feature = "arbitrary-precision")]
    Varint(BigInt),
}

impl CqlValue {
    /// 原生类型名，用于类型不符诊断。
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            CqlValue::Text(_) => "String",
            CqlValue::BigInt(_) => "i64",
            CqlValue::Int(_) => "i32",
            CqlValue::Float(_) => "f32",
            CqlValue::Double(_) => "f64",
            CqlValue::Boolean(_) => "bool",
            CqlValue::Blob(_) => "Bytes",
            CqlValue::Timestamp(_) => "DateTime<Utc>",
            CqlValue::Uuid(_) => "Uuid",
            CqlValue::Inet(_) => "IpAddr",
            CqlValue::List(_) => "List",
            CqlValue::Set(_) => "Set",
            CqlValue::Map(_) => "Map",
            #[cfg(feature = "arbitrary-precision")]
            CqlValue::Decimal(_) => "BigDecimal",
            #[cfg(feature = "arbitrary-precision")]
            CqlValue::Varint(_) => "BigInt",
        }
    }

    /// 文本视图。
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CqlValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// 32 位整数视图。
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        match self {
            CqlValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// 64 位整数视图。
    #[must_use]
    pub fn as_bigint(&self) -> Option<i64> {
        match self {
            CqlValue::BigInt(value) => Some(*value),
            _ => None,
        }
    }

    /// 字节视图。
    #[must_use]
    pub fn as_blob(&self) -> Option<&Bytes> {
        match self {
            CqlValue::Blob(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// 时间戳视图。
    #[must_use]
    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            CqlValue::Timestamp(instant) => Some(*instant),
            _ => None,
        }
    }
}

impl From<&str> for CqlValue {
    fn from(value: &str) -> Self {
        CqlValue::Text(value.to_owned())
    }
}

impl From<String> for CqlValue {
    fn from(value: String) -> Self {
        CqlValue::Text(value)
    }
}

impl From<i32> for CqlValue {
    fn from(value: i32) -> Self {
        CqlValue::Int(value)
    }
}

impl From<i64> for CqlValue {
    fn from(value: i64) -> Self {
        CqlValue::BigInt(value)
    }
}

impl From<bool> for CqlValue {
    fn from(value: bool) -> Self {
        CqlValue::Boolean(value)
    }
}

impl From<Bytes> for CqlValue {
    fn from(value: Bytes) -> Self {
        CqlValue::Blob(value)
    }
}

impl From<Vec<u8>> for CqlValue {
    fn from(value: Vec<u8>) -> Self {
        CqlValue::Blob(Bytes::from(value))
    }
}

impl From<DateTime<Utc>> for CqlValue {
    fn from(value: DateTime<Utc>) -> Self {
        CqlValue::Timestamp(value)
    }
}

impl From<Uuid> for CqlValue {
    fn from(value: Uuid) -> Self {
        CqlValue::Uuid(value)
    }
}

impl From<IpAddr> for CqlValue {
    fn from(value: IpAddr) -> Self {
        CqlValue::Inet(value)
    }
}

/// 原生类型描述符，`resolve_native_type` 的返回值。
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NativeType {
    /// [`CqlValue::Text`]。
    String,
    /// [`CqlValue::BigInt`]。
    I64,
    /// [`CqlValue::Int`]。
    I32,
    /// [`CqlValue::Float`]。
    F32,
    /// [`CqlValue::Double`]。
    F64,
    /// [`CqlValue::Boolean`]。
    Bool,
    /// [`CqlValue::Blob`]。
    Bytes,
    /// [`CqlValue::Timestamp`]。
    Timestamp,
    /// [`CqlValue::Uuid`]。
    Uuid,
    /// [`CqlValue::Inet`]。
    Inet,
    /// [`CqlValue::List`]。
    List(Box<NativeType>),
    /// [`CqlValue::Set`]。
    Set(Box<NativeType>),
    /// [`CqlValue::Map`]。
    Map(Box<NativeType>, Box<NativeType>),
    /// [`CqlValue::Decimal`]。
    #[cfg(feature = "arbitrary-precision")]
    Decimal,
    /// [`CqlValue::Varint`]。
    #[cfg(feature = "arbitrary-precision")]
    Varint,
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeType::String => f.write_str("String"),
            NativeType::I64 => f.write_str("i64"),
            NativeType::I32 => f.write_str("i32"),
            NativeType::F32 => f.write_str("f32"),
            NativeType::F64 => f.write_str("f64"),
            NativeType::Bool => f.write_str("bool"),
            NativeType::Bytes => f.write_str("Bytes"),
            NativeType::Timestamp => f.write_str("DateTime<Utc>"),
            NativeType::Uuid => f.write_str("Uuid"),
            NativeType::Inet => f.write_str("IpAddr"),
            NativeType::List(element) => write!(f, "List<{element}>"),
            NativeType::Set(element) => write!(f, "Set<{element}>"),
            NativeType::Map(key, value) => write!(f, "Map<{key}, {value}>"),
            #[cfg(feature = "arbitrary-precision")]
            NativeType::Decimal => f.write_str("BigDecimal"),
            #[cfg(feature = "arbitrary-precision")]
            NativeType::Varint => f.write_str("BigInt"),
        }
    }
}
