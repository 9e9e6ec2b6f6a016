//! list / set / map 编解码器。
//!
//! # 教案式说明
//! - **意图（Why）**：集合列的元素类型在运行期才由 [`ColumnInfo`] 给出，因此编解码器本身不持有元素
//!   编解码器，而是每次经由传入的 [`CodecRegistry`] 递归派发。
//! - **契约（What）**：
//!   - 线上格式：`[u16 n]` 后跟 n 个 `[u16 len][bytes]`，map 的键与值交替出现；
//!   - 零长度输入解码为空集合；解码后仍有剩余字节视为协议违例；
//!   - 元素数或单个元素长度超过 `u16::MAX` 时编码报 [`CqlError::InvalidValue`]；
//!   - `info` 缺少元素类型属于调用方编程错误，直接 panic。

use bytes::Bytes;
use cql_core::{
    BeReader, BeWriter, ColumnInfo, ColumnTypeCode, CqlError, CqlValue, NativeType, Result,
    TypeSpec,
};

use super::mismatch;
use crate::registry::{CodecRegistry, ColumnCodec};

#[track_caller]
fn element_spec(code: ColumnTypeCode, info: &ColumnInfo) -> &TypeSpec {
    match info {
        ColumnInfo::List { element } | ColumnInfo::Set { element } => &**element,
        other => panic!("{code} column requires element type info, got {other:?}"),
    }
}

#[track_caller]
fn map_specs(info: &ColumnInfo) -> (&TypeSpec, &TypeSpec) {
    match info {
        ColumnInfo::Map { key, value } => (&**key, &**value),
        other => panic!("map column requires key and value type info, got {other:?}"),
    }
}

fn read_count(reader: &mut BeReader, context: &'static str) -> Result<usize> {
    if reader.is_empty() {
        return Ok(0);
    }
    Ok(usize::from(reader.read_u16(context)?))
}

fn read_element(
    registry: &dyn CodecRegistry,
    reader: &mut BeReader,
    spec: &TypeSpec,
    context: &'static str,
) -> Result<CqlValue> {
    let len = usize::from(reader.read_u16(context)?);
    let raw = reader.read_bytes(len, context)?;
    registry.decode_spec(&raw, spec)
}

fn write_count(writer: &mut BeWriter, count: usize, context: &'static str) -> Result<()> {
    let count = u16::try_from(count).map_err(|_| {
        CqlError::invalid_value(
            context,
            format!("{count} elements exceed the 65535 element limit"),
        )
    })?;
    writer.write_u16(count);
    Ok(())
}

fn write_element(
    registry: &dyn CodecRegistry,
    writer: &mut BeWriter,
    value: &CqlValue,
    spec: &TypeSpec,
    context: &'static str,
) -> Result<()> {
    let raw = registry.encode_spec(value, spec)?;
    writer.write_short_bytes(&raw, context)
}

fn ensure_consumed(reader: &BeReader, context: &'static str) -> Result<()> {
    if reader.is_empty() {
        Ok(())
    } else {
        Err(CqlError::protocol(
            context,
            format!("{} trailing bytes after the last element", reader.remaining()),
        ))
    }
}

fn decode_sequence(
    registry: &dyn CodecRegistry,
    element: &TypeSpec,
    bytes: &Bytes,
    context: &'static str,
) -> Result<Vec<CqlValue>> {
    let mut reader = BeReader::new(bytes.clone());
    let count = read_count(&mut reader, context)?;
    let mut items = Vec::with_capacity(count.min(reader.remaining() / 2));
    for _ in 0..count {
        items.push(read_element(registry, &mut reader, element, context)?);
    }
    ensure_consumed(&reader, context)?;
    Ok(items)
}

fn encode_sequence(
    registry: &dyn CodecRegistry,
    element: &TypeSpec,
    items: &[CqlValue],
    context: &'static str,
) -> Result<Bytes> {
    let mut writer = BeWriter::new();
    write_count(&mut writer, items.len(), context)?;
    for item in items {
        write_element(registry, &mut writer, item, element, context)?;
    }
    Ok(writer.freeze())
}

/// list：保持元素顺序。
#[derive(Clone, Copy, Debug, Default)]
pub struct ListCodec;

impl ColumnCodec for ListCodec {
    fn decode(
        &self,
        registry: &dyn CodecRegistry,
        info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        let element = element_spec(ColumnTypeCode::List, info);
        decode_sequence(registry, element, bytes, "list value").map(CqlValue::List)
    }

    fn native_type(&self, registry: &dyn CodecRegistry, info: &ColumnInfo) -> NativeType {
        let element = element_spec(ColumnTypeCode::List, info);
        NativeType::List(Box::new(
            registry.resolve_native_type(element.code, &element.info),
        ))
    }

    fn encode(
        &self,
        registry: &dyn CodecRegistry,
        info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        match value {
            CqlValue::List(items) => {
                let element = element_spec(ColumnTypeCode::List, info);
                encode_sequence(registry, element, items, "list value")
            }
            other => Err(mismatch(self.native_type(registry, info), other)),
        }
    }
}

/// set：按线上顺序保留，不去重。
#[derive(Clone, Copy, Debug, Default)]
pub struct SetCodec;

impl ColumnCodec for SetCodec {
    fn decode(
        &self,
        registry: &dyn CodecRegistry,
        info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        let element = element_spec(ColumnTypeCode::Set, info);
        decode_sequence(registry, element, bytes, "set value").map(CqlValue::Set)
    }

    fn native_type(&self, registry: &dyn CodecRegistry, info: &ColumnInfo) -> NativeType {
        let element = element_spec(ColumnTypeCode::Set, info);
        NativeType::Set(Box::new(
            registry.resolve_native_type(element.code, &element.info),
        ))
    }

    fn encode(
        &self,
        registry: &dyn CodecRegistry,
        info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        match value {
            CqlValue::Set(items) => {
                let element = element_spec(ColumnTypeCode::Set, info);
                encode_sequence(registry, element, items, "set value")
            }
            other => Err(mismatch(self.native_type(registry, info), other)),
        }
    }
}

/// map：键值对按线上顺序保留。
#[derive(Clone, Copy, Debug, Default)]
pub struct MapCodec;

impl ColumnCodec for MapCodec {
    fn decode(
        &self,
        registry: &dyn CodecRegistry,
        info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        const CONTEXT: &str = "map value";
        let (key_spec, value_spec) = map_specs(info);
        let mut reader = BeReader::new(bytes.clone());
        let count = read_count(&mut reader, CONTEXT)?;
        let mut entries = Vec::with_capacity(count.min(reader.remaining() / 4));
        for _ in 0..count {
            let key = read_element(registry, &mut reader, key_spec, CONTEXT)?;
            let value = read_element(registry, &mut reader, value_spec, CONTEXT)?;
            entries.push((key, value));
        }
        ensure_consumed(&reader, CONTEXT)?;
        Ok(CqlValue::Map(entries))
    }

    fn native_type(&self, registry: &dyn CodecRegistry, info: &ColumnInfo) -> NativeType {
        let (key, value) = map_specs(info);
        NativeType::Map(
            Box::new(registry.resolve_native_type(key.code, &key.info)),
            Box::new(registry.resolve_native_type(value.code, &value.info)),
        )
    }

    fn encode(
        &self,
        registry: &dyn CodecRegistry,
        info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        const CONTEXT: &str = "map value";
        let CqlValue::Map(entries) = value else {
            return Err(mismatch(self.native_type(registry, info), value));
        };
        let (key_spec, value_spec) = map_specs(info);
        let mut writer = BeWriter::new();
        write_count(&mut writer, entries.len(), CONTEXT)?;
        for (key, value) in entries {
            write_element(registry, &mut writer, key, key_spec, CONTEXT)?;
            write_element(registry, &mut writer, value, value_spec, CONTEXT)?;
        }
        Ok(writer.freeze())
    }
}
