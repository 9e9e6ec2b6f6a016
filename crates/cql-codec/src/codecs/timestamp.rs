//! timestamp：自 Unix 纪元起的毫秒数，8 字节有符号大端。

use bytes::Bytes;
use chrono::{DateTime, Utc};
use cql_core::{ColumnInfo, CqlError, CqlValue, NativeType, Result};

use super::{fixed, mismatch};
use crate::registry::{CodecRegistry, ColumnCodec};

/// 毫秒精度的时间戳编解码器。
///
/// 编码时截断到毫秒；超出 `chrono` 可表示范围的毫秒值解码为协议违例。
#[derive(Clone, Copy, Debug, Default)]
pub struct TimestampCodec;

impl ColumnCodec for TimestampCodec {
    fn decode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        let millis = i64::from_be_bytes(fixed::<8>(bytes, "timestamp value")?);
        let instant = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
            CqlError::protocol(
                "timestamp value",
                format!("{millis} ms is outside the representable range"),
            )
        })?;
        Ok(CqlValue::Timestamp(instant))
    }

    fn native_type(&self, _registry: &dyn CodecRegistry, _info: &ColumnInfo) -> NativeType {
        NativeType::Timestamp
    }

    fn encode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        match value {
            CqlValue::Timestamp(instant) => Ok(Bytes::copy_from_slice(
                &instant.timestamp_millis().to_be_bytes(),
            )),
            other => Err(mismatch(NativeType::Timestamp, other)),
        }
    }
}
