//! 不透明字节：blob 与未知自定义类型。

use bytes::Bytes;
use cql_core::{ColumnInfo, CqlValue, NativeType, Result};

use super::mismatch;
use crate::registry::{CodecRegistry, ColumnCodec};

/// blob：原样透传，解码结果与输入共享底层缓冲。
#[derive(Clone, Copy, Debug, Default)]
pub struct BlobCodec;

impl ColumnCodec for BlobCodec {
    fn decode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        Ok(CqlValue::Blob(bytes.clone()))
    }

    fn native_type(&self, _registry: &dyn CodecRegistry, _info: &ColumnInfo) -> NativeType {
        NativeType::Bytes
    }

    fn encode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        match value {
            CqlValue::Blob(bytes) => Ok(bytes.clone()),
            other => Err(mismatch(NativeType::Bytes, other)),
        }
    }
}

/// custom：类名仅作元数据，值按 blob 处理。
///
/// 动态组合类型也登记在 `Custom` 类型码下，需要结构化访问时由调用方改用
/// [`crate::composite::DynamicCompositeCodec`]。
#[derive(Clone, Copy, Debug, Default)]
pub struct CustomCodec;

impl ColumnCodec for CustomCodec {
    fn decode(
        &self,
        registry: &dyn CodecRegistry,
        info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        BlobCodec.decode(registry, info, bytes)
    }

    fn native_type(&self, _registry: &dyn CodecRegistry, _info: &ColumnInfo) -> NativeType {
        NativeType::Bytes
    }

    fn encode(
        &self,
        registry: &dyn CodecRegistry,
        info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        BlobCodec.encode(registry, info, value)
    }
}
