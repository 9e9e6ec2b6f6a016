//! uuid 与 timeuuid：16 字节，RFC 4122 字节序。

use bytes::Bytes;
use cql_core::{ColumnInfo, CqlError, CqlValue, NativeType, Result};
use uuid::Uuid;

use super::{fixed, mismatch};
use crate::registry::{CodecRegistry, ColumnCodec};

/// 任意版本的 uuid。
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidCodec;

impl ColumnCodec for UuidCodec {
    fn decode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        Ok(CqlValue::Uuid(Uuid::from_bytes(fixed::<16>(
            bytes,
            "uuid value",
        )?)))
    }

    fn native_type(&self, _registry: &dyn CodecRegistry, _info: &ColumnInfo) -> NativeType {
        NativeType::Uuid
    }

    fn encode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        match value {
            CqlValue::Uuid(id) => Ok(Bytes::copy_from_slice(id.as_bytes())),
            other => Err(mismatch(NativeType::Uuid, other)),
        }
    }
}

/// timeuuid：解码不校验版本，编码只接受版本 1。
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeuuidCodec;

impl ColumnCodec for TimeuuidCodec {
    fn decode(
        &self,
        registry: &dyn CodecRegistry,
        info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        UuidCodec.decode(registry, info, bytes)
    }

    fn native_type(&self, _registry: &dyn CodecRegistry, _info: &ColumnInfo) -> NativeType {
        NativeType::Uuid
    }

    fn encode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        match value {
            CqlValue::Uuid(id) if id.get_version_num() == 1 => {
                Ok(Bytes::copy_from_slice(id.as_bytes()))
            }
            CqlValue::Uuid(id) => Err(CqlError::invalid_value(
                "timeuuid value",
                format!("expected a version 1 uuid, got version {}", id.get_version_num()),
            )),
            other => Err(mismatch(NativeType::Uuid, other)),
        }
    }
}
