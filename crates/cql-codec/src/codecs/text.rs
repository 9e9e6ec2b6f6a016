//! ascii 与 UTF-8 文本编解码器。
//!
//! 线上就是原始字节，不带长度前缀；零长度解码为空字符串。

use bytes::Bytes;
use cql_core::{ColumnInfo, CqlError, CqlValue, NativeType, Result};

use super::mismatch;
use crate::registry::{CodecRegistry, ColumnCodec};

/// ascii：字节须全部落在 `0x00..=0x7f`。
#[derive(Clone, Copy, Debug, Default)]
pub struct AsciiCodec;

impl ColumnCodec for AsciiCodec {
    fn decode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        if let Some(pos) = bytes.iter().position(|b| !b.is_ascii()) {
            return Err(CqlError::protocol(
                "ascii value",
                format!("non-ascii byte 0x{:02x} at offset {pos}", bytes[pos]),
            ));
        }
        // 全部为 ASCII 时必然是合法 UTF-8。
        Ok(CqlValue::Text(String::from_utf8_lossy(bytes).into_owned()))
    }

    fn native_type(&self, _registry: &dyn CodecRegistry, _info: &ColumnInfo) -> NativeType {
        NativeType::String
    }

    fn encode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        match value {
            CqlValue::Text(text) if text.is_ascii() => Ok(Bytes::copy_from_slice(text.as_bytes())),
            CqlValue::Text(_) => Err(CqlError::invalid_value(
                "ascii value",
                "text contains non-ascii characters",
            )),
            other => Err(mismatch(NativeType::String, other)),
        }
    }
}

/// text / varchar：UTF-8。
#[derive(Clone, Copy, Debug, Default)]
pub struct Utf8Codec;

impl ColumnCodec for Utf8Codec {
    fn decode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        bytes: &Bytes,
    ) -> Result<CqlValue> {
        let text = std::str::from_utf8(bytes)
            .map_err(|err| CqlError::protocol("text value", format!("invalid utf-8: {err}")))?;
        Ok(CqlValue::Text(text.to_owned()))
    }

    fn native_type(&self, _registry: &dyn CodecRegistry, _info: &ColumnInfo) -> NativeType {
        NativeType::String
    }

    fn encode(
        &self,
        _registry: &dyn CodecRegistry,
        _info: &ColumnInfo,
        value: &CqlValue,
    ) -> Result<Bytes> {
        match value {
            CqlValue::Text(text) => Ok(Bytes::copy_from_slice(text.as_bytes())),
            other => Err(mismatch(NativeType::String, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CodecTable;

    #[test]
    fn empty_bytes_decode_to_empty_text() {
        let value = Utf8Codec
            .decode(CodecTable::global(), &ColumnInfo::None, &Bytes::new())
            .unwrap();
        assert_eq!(value, CqlValue::Text(String::new()));
    }

    #[test]
    fn invalid_utf8_is_a_protocol_violation() {
        let err = Utf8Codec
            .decode(
                CodecTable::global(),
                &ColumnInfo::None,
                &Bytes::from_static(&[0xff, 0xfe]),
            )
            .unwrap_err();
        assert!(err.is_protocol_violation());
    }

    #[test]
    fn ascii_refuses_to_encode_non_ascii() {
        let err = AsciiCodec
            .encode(
                CodecTable::global(),
                &ColumnInfo::None,
                &CqlValue::from("héllo"),
            )
            .unwrap_err();
        assert_eq!(err.code(), "cql.codec.invalid_value");
    }

    #[test]
    fn ascii_rejects_high_bytes_on_decode() {
        let err = AsciiCodec
            .decode(
                CodecTable::global(),
                &ColumnInfo::None,
                &Bytes::from_static(b"ok\x80"),
            )
            .unwrap_err();
        assert!(err.to_string().contains("offset 2"));
    }
}
