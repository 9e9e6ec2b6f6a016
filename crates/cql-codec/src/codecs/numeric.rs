//! 定长数值与布尔编解码器。

use bytes::Bytes;
use cql_core::{ColumnInfo, CqlError, CqlValue, NativeType, Result};

use super::{fixed, mismatch};
use crate::registry::{CodecRegistry, ColumnCodec};

/// bigint / counter：8 字节有符号大端。
#[derive(Clone, Copy, Debug, Default)]
pub struct BigintCodec;

impl ColumnCodec for BigintCodec {
    fn decode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        let raw = fixed::<8>(bytes, "bigint value")?;
        Ok(CqlValue::BigInt(i64::from_be_bytes(raw)))
    }

    fn native_type(&self, _registry: &dyn CodecRegistry, _info: &ColumnInfo) -> NativeType {
        NativeType::I64
    }

    fn encode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        match value {
            CqlValue::BigInt(v) => Ok(Bytes::copy_from_slice(&v.to_be_bytes())),
            other => Err(mismatch(NativeType::I64, other)),
        }
    }
}

/// int：4 字节有符号大端。
#[derive(Clone, Copy, Debug, Default)]
pub struct IntCodec;

impl ColumnCodec for IntCodec {
    fn decode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        let raw = fixed::<4>(bytes, "int value")?;
        Ok(CqlValue::Int(i32::from_be_bytes(raw)))
    }

    fn native_type(&self, _registry: &dyn CodecRegistry, _info: &ColumnInfo) -> NativeType {
        NativeType::I32
    }

    fn encode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        match value {
            CqlValue::Int(v) => Ok(Bytes::copy_from_slice(&v.to_be_bytes())),
            other => Err(mismatch(NativeType::I32, other)),
        }
    }
}

/// float：IEEE-754 单精度，大端位模式。
#[derive(Clone, Copy, Debug, Default)]
pub struct FloatCodec;

impl ColumnCodec for FloatCodec {
    fn decode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        let raw = fixed::<4>(bytes, "float value")?;
        Ok(CqlValue::Float(f32::from_be_bytes(raw)))
    }

    fn native_type(&self, _registry: &dyn CodecRegistry, _info: &ColumnInfo) -> NativeType {
        NativeType::F32
    }

    fn encode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        match value {
            CqlValue::Float(v) => Ok(Bytes::copy_from_slice(&v.to_be_bytes())),
            other => Err(mismatch(NativeType::F32, other)),
        }
    }
}

/// double：IEEE-754 双精度，大端位模式。
#[derive(Clone, Copy, Debug, Default)]
pub struct DoubleCodec;

impl ColumnCodec for DoubleCodec {
    fn decode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        let raw = fixed::<8>(bytes, "double value")?;
        Ok(CqlValue::Double(f64::from_be_bytes(raw)))
    }

    fn native_type(&self, _registry: &dyn CodecRegistry, _info: &ColumnInfo) -> NativeType {
        NativeType::F64
    }

    fn encode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        match value {
            CqlValue::Double(v) => Ok(Bytes::copy_from_slice(&v.to_be_bytes())),
            other => Err(mismatch(NativeType::F64, other)),
        }
    }
}

/// boolean：单字节，只接受 `0x00` 与 `0x01`，保证重新编码逐字节一致。
#[derive(Clone, Copy, Debug, Default)]
pub struct BooleanCodec;

impl ColumnCodec for BooleanCodec {
    fn decode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        match fixed::<1>(bytes, "boolean value")? {
            [0x00] => Ok(CqlValue::Boolean(false)),
            [0x01] => Ok(CqlValue::Boolean(true)),
            [other] => Err(CqlError::protocol(
                "boolean value",
                format!("expected 0x00 or 0x01, got 0x{other:02x}"),
            )),
        }
    }

    fn native_type(&self, _registry: &dyn CodecRegistry, _info: &ColumnInfo) -> NativeType {
        NativeType::Bool
    }

    fn encode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        match value {
            CqlValue::Boolean(v) => Ok(Bytes::from_static(if *v { &[0x01] } else { &[0x00] })),
            other => Err(mismatch(NativeType::Bool, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CodecTable;

    fn table() -> &'static CodecTable {
        CodecTable::global()
    }

    #[test]
    fn bigint_is_big_endian() {
        let bytes = BigintCodec
            .encode(table(), &ColumnInfo::None, &CqlValue::BigInt(0x0102))
            .unwrap();
        assert_eq!(bytes.as_ref(), &[0, 0, 0, 0, 0, 0, 0x01, 0x02]);
        assert_eq!(
            BigintCodec
                .decode(table(), &ColumnInfo::None, &bytes)
                .unwrap(),
            CqlValue::BigInt(0x0102)
        );
    }

    #[test]
    fn short_int_is_a_protocol_violation() {
        let err = IntCodec
            .decode(table(), &ColumnInfo::None, &Bytes::from_static(&[0, 1]))
            .unwrap_err();
        assert!(err.is_protocol_violation());
        assert!(err.to_string().contains("expected exactly 4 bytes, got 2"));
    }

    #[test]
    fn float_keeps_bit_pattern() {
        let bytes = FloatCodec
            .encode(table(), &ColumnInfo::None, &CqlValue::Float(1.5))
            .unwrap();
        assert_eq!(bytes.as_ref(), &[0x3f, 0xc0, 0x00, 0x00]);
    }

    #[test]
    fn boolean_accepts_only_canonical_bytes() {
        let value = BooleanCodec
            .decode(table(), &ColumnInfo::None, &Bytes::from_static(&[0x01]))
            .unwrap();
        assert_eq!(value, CqlValue::Boolean(true));
        let err = BooleanCodec
            .decode(table(), &ColumnInfo::None, &Bytes::from_static(&[0x7f]))
            .unwrap_err();
        assert!(err.to_string().contains("got 0x7f"));
        let err = BooleanCodec
            .decode(table(), &ColumnInfo::None, &Bytes::new())
            .unwrap_err();
        assert!(err.is_protocol_violation());
    }

    #[test]
    fn wrong_variant_reports_both_types() {
        let err = IntCodec
            .encode(table(), &ColumnInfo::None, &CqlValue::from("32"))
            .unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: expected i32, got String");
    }
}
