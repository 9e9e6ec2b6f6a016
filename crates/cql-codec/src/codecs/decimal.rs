//! 任意精度数值：varint 与 decimal。
//!
//! varint 是最短二进制补码大端；decimal 为 `[i32 scale]` 后跟 varint 形式的未缩放值，
//! 数值等于 `unscaled × 10^(-scale)`。

use bigdecimal::BigDecimal;
use bytes::{BufMut, Bytes, BytesMut};
use cql_core::{ColumnInfo, CqlError, CqlValue, NativeType, Result};
use num_bigint::BigInt;

use super::mismatch;
use crate::registry::{CodecRegistry, ColumnCodec};

/// varint：零长度解码为 0。
#[derive(Clone, Copy, Debug, Default)]
pub struct VarintCodec;

impl ColumnCodec for VarintCodec {
    fn decode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        Ok(CqlValue::Varint(BigInt::from_signed_bytes_be(bytes)))
    }

    fn native_type(&self, _registry: &dyn CodecRegistry, _info: &ColumnInfo) -> NativeType {
        NativeType::Varint
    }

    fn encode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        match value {
            CqlValue::Varint(number) => Ok(Bytes::from(number.to_signed_bytes_be())),
            other => Err(mismatch(NativeType::Varint, other)),
        }
    }
}

/// decimal：scale 必须落在 `i32` 范围内。
#[derive(Clone, Copy, Debug, Default)]
pub struct DecimalCodec;

impl ColumnCodec for DecimalCodec {
    fn decode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        if bytes.len() < 4 {
            return Err(CqlError::protocol(
                "decimal value",
                format!("needs at least 4 bytes for the scale, got {}", bytes.len()),
            ));
        }
        let scale = i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let unscaled = BigInt::from_signed_bytes_be(&bytes[4..]);
        Ok(CqlValue::Decimal(BigDecimal::new(unscaled, i64::from(scale))))
    }

    fn native_type(&self, _registry: &dyn CodecRegistry, _info: &ColumnInfo) -> NativeType {
        NativeType::Decimal
    }

    fn encode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        let CqlValue::Decimal(number) = value else {
            return Err(mismatch(NativeType::Decimal, value));
        };
        let (unscaled, scale) = number.as_bigint_and_exponent();
        let scale = i32::try_from(scale).map_err(|_| {
            CqlError::invalid_value("decimal value", format!("scale {scale} does not fit in i32"))
        })?;
        let digits = unscaled.to_signed_bytes_be();
        let mut buf = BytesMut::with_capacity(4 + digits.len());
        buf.put_i32(scale);
        buf.put_slice(&digits);
        Ok(buf.freeze())
    }
}
