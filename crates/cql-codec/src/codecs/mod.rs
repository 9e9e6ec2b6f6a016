//! 内置的逐类型编解码器。
//!
//! 每个子模块只包含无状态单元结构体，线上约定统一为大端；变长类型（文本、blob）
//! 不带值级长度前缀，长度由外层帧给出。

use bytes::Bytes;
use cql_core::{ColumnTypeCode, CqlError, CqlValue, NativeType, Result};

use crate::registry::ColumnCodec;

pub mod blob;
pub mod collection;
#[cfg(feature = "arbitrary-precision")]
pub mod decimal;
pub mod identifier;
pub mod inet;
pub mod numeric;
pub mod text;
pub mod timestamp;

/// 内置注册清单：每个类型码恰好一条。
pub(crate) static STANDARD: &[(ColumnTypeCode, &'static dyn ColumnCodec)] = &[
    (ColumnTypeCode::Custom, &blob::CustomCodec),
    (ColumnTypeCode::Ascii, &text::AsciiCodec),
    (ColumnTypeCode::Bigint, &numeric::BigintCodec),
    (ColumnTypeCode::Blob, &blob::BlobCodec),
    (ColumnTypeCode::Boolean, &numeric::BooleanCodec),
    (ColumnTypeCode::Counter, &numeric::BigintCodec),
    #[cfg(feature = "arbitrary-precision")]
    (ColumnTypeCode::Decimal, &decimal::DecimalCodec),
    (ColumnTypeCode::Double, &numeric::DoubleCodec),
    (ColumnTypeCode::Float, &numeric::FloatCodec),
    (ColumnTypeCode::Int, &numeric::IntCodec),
    (ColumnTypeCode::Text, &text::Utf8Codec),
    (ColumnTypeCode::Timestamp, &timestamp::TimestampCodec),
    (ColumnTypeCode::Uuid, &identifier::UuidCodec),
    (ColumnTypeCode::Varchar, &text::Utf8Codec),
    #[cfg(feature = "arbitrary-precision")]
    (ColumnTypeCode::Varint, &decimal::VarintCodec),
    (ColumnTypeCode::Timeuuid, &identifier::TimeuuidCodec),
    (ColumnTypeCode::Inet, &inet::InetCodec),
    (ColumnTypeCode::List, &collection::ListCodec),
    (ColumnTypeCode::Map, &collection::MapCodec),
    (ColumnTypeCode::Set, &collection::SetCodec),
];

/// 定长类型的长度校验，返回定长数组。
pub(crate) fn fixed<const N: usize>(bytes: &Bytes, context: &'static str) -> Result<[u8; N]> {
    <[u8; N]>::try_from(bytes.as_ref()).map_err(|_| {
        CqlError::protocol(
            context,
            format!("expected exactly {N} bytes, got {}", bytes.len()),
        )
    })
}

/// 类型不符错误的简写。
pub(crate) fn mismatch(expected: NativeType, value: &CqlValue) -> CqlError {
    CqlError::type_mismatch(expected, value.type_name())
}
