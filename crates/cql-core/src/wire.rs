//! 网络字节序（大端）读写器。
//!
//! # 教案式说明
//! - **意图 (Why)**：线上格式由外部协议固定，所有多字节整数均为大端；读写器集中做边界检查，
//!   让上层解析代码只关心字段顺序。
//! - **契约 (What)**：
//!   - [`BeReader`] 的每个 `read_*` 在剩余字节不足时返回 [`CqlError::ProtocolViolation`]，
//!     且失败时**不消费**任何字节；
//!   - [`BeReader::read_bytes`] 通过 `Bytes::split_to` 零拷贝切出子视图；
//!   - [`BeWriter`] 只追加写入，`[string]`/`[short bytes]` 超过 `u16::MAX` 时报 [`CqlError::InvalidValue`]。
//! - **实现 (How)**：底层分别基于 [`bytes::Buf`] 与 [`bytes::BufMut`]，读取前先以 `ensure` 校验长度，
//!   避免 `bytes` 在越界时 panic。

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{CqlError, Result};

/// 大端读取器，持有一段已完整接收的响应缓冲。
#[derive(Clone, Debug, Default)]
pub struct BeReader {
    buf: Bytes,
}

impl BeReader {
    /// 基于完整缓冲创建读取器。
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self { buf: buf.into() }
    }

    /// 剩余未读字节数。
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// 是否已读尽。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    fn ensure(&self, needed: usize, context: &'static str) -> Result<()> {
        if self.buf.remaining() < needed {
            return Err(CqlError::protocol(
                context,
                format!(
                    "needs {needed} bytes, only {} remaining",
                    self.buf.remaining()
                ),
            ));
        }
        Ok(())
    }

    /// 读取单字节。
    pub fn read_u8(&mut self, context: &'static str) -> Result<u8> {
        self.ensure(1, context)?;
        Ok(self.buf.get_u8())
    }

    /// 读取有符号 16 位整数。
    pub fn read_i16(&mut self, context: &'static str) -> Result<i16> {
        self.ensure(2, context)?;
        Ok(self.buf.get_i16())
    }

    /// 读取无符号 16 位整数（协议中的 `[short]`）。
    pub fn read_u16(&mut self, context: &'static str) -> Result<u16> {
        self.ensure(2, context)?;
        Ok(self.buf.get_u16())
    }

    /// 读取有符号 32 位整数（协议中的 `[int]`）。
    pub fn read_i32(&mut self, context: &'static str) -> Result<i32> {
        self.ensure(4, context)?;
        Ok(self.buf.get_i32())
    }

    /// 读取有符号 64 位整数。
    pub fn read_i64(&mut self, context: &'static str) -> Result<i64> {
        self.ensure(8, context)?;
        Ok(self.buf.get_i64())
    }

    /// 零拷贝读取 `len` 个字节。
    pub fn read_bytes(&mut self, len: usize, context: &'static str) -> Result<Bytes> {
        self.ensure(len, context)?;
        Ok(self.buf.split_to(len))
    }

    /// 读取 `[short bytes]`：2 字节长度前缀 + 内容。
    ///
    /// 长度字段按有符号读取，负数视为协议违例；长度越界时长度前缀也不会被消费。
    pub fn read_short_bytes(&mut self, context: &'static str) -> Result<Bytes> {
        self.ensure(2, context)?;
        let declared = i16::from_be_bytes([self.buf[0], self.buf[1]]);
        if declared < 0 {
            return Err(CqlError::protocol(
                context,
                format!("negative length {declared}"),
            ));
        }
        let len = declared as usize;
        self.ensure(2 + len, context)?;
        self.buf.advance(2);
        Ok(self.buf.split_to(len))
    }

    /// 读取 `[string]`：2 字节长度前缀 + UTF-8。
    pub fn read_string(&mut self, context: &'static str) -> Result<String> {
        let snapshot = self.buf.clone();
        let raw = self.read_short_bytes(context)?;
        match String::from_utf8(raw.to_vec()) {
            Ok(text) => Ok(text),
            Err(err) => {
                self.buf = snapshot;
                Err(CqlError::protocol(context, format!("invalid UTF-8: {err}")))
            }
        }
    }

    /// 读取 `[bytes]`：4 字节长度前缀，负数表示 null。
    pub fn read_nullable_bytes(&mut self, context: &'static str) -> Result<Option<Bytes>> {
        self.ensure(4, context)?;
        let declared = i32::from_be_bytes([self.buf[0], self.buf[1], self.buf[2], self.buf[3]]);
        if declared < 0 {
            self.buf.advance(4);
            return Ok(None);
        }
        let len = declared as usize;
        self.ensure(4 + len, context)?;
        self.buf.advance(4);
        Ok(Some(self.buf.split_to(len)))
    }

    /// 交出剩余的全部字节。
    #[must_use]
    pub fn into_remaining(self) -> Bytes {
        self.buf
    }
}

/// 大端写入器。
#[derive(Debug, Default)]
pub struct BeWriter {
    buf: BytesMut,
}

impl BeWriter {
    /// 创建空写入器。
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 预分配容量。
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// 已写入字节数。
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// 是否尚未写入任何字节。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// 写入单字节。
    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    /// 写入无符号 16 位整数。
    pub fn write_u16(&mut self, value: u16) {
        self.buf.put_u16(value);
    }

    /// 写入有符号 16 位整数。
    pub fn write_i16(&mut self, value: i16) {
        self.buf.put_i16(value);
    }

    /// 写入有符号 32 位整数。
    pub fn write_i32(&mut self, value: i32) {
        self.buf.put_i32(value);
    }

    /// 写入有符号 64 位整数。
    pub fn write_i64(&mut self, value: i64) {
        self.buf.put_i64(value);
    }

    /// 原样追加字节，不带长度前缀。
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// 写入 `[short bytes]`。
    pub fn write_short_bytes(&mut self, bytes: &[u8], context: &'static str) -> Result<()> {
        let len = u16::try_from(bytes.len()).map_err(|_| {
            CqlError::invalid_value(
                context,
                format!("{} bytes exceed the 2-byte length prefix", bytes.len()),
            )
        })?;
        self.buf.put_u16(len);
        self.buf.put_slice(bytes);
        Ok(())
    }

    /// 写入 `[string]`。
    pub fn write_string(&mut self, text: &str, context: &'static str) -> Result<()> {
        self.write_short_bytes(text.as_bytes(), context)
    }

    /// 冻结为只读 `Bytes`。
    #[must_use]
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bytes_overrun_leaves_reader_untouched() {
        let mut reader = BeReader::new(vec![0x00, 0x05, b'a', b'b']);
        let err = reader.read_short_bytes("query_id").unwrap_err();
        assert!(err.is_protocol_violation());
        assert_eq!(reader.remaining(), 4);
    }

    #[test]
    fn negative_short_length_is_rejected() {
        let mut reader = BeReader::new(vec![0xff, 0xff]);
        assert!(reader.read_short_bytes("query_id").is_err());
    }

    #[test]
    fn nullable_bytes_maps_negative_length_to_none() {
        let mut reader = BeReader::new(vec![0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x01, 0x7f]);
        assert_eq!(reader.read_nullable_bytes("cell").unwrap(), None);
        assert_eq!(
            reader.read_nullable_bytes("cell").unwrap(),
            Some(Bytes::from_static(&[0x7f]))
        );
        assert!(reader.is_empty());
    }

    #[test]
    fn string_writer_and_reader_agree() {
        let mut writer = BeWriter::new();
        writer.write_string("foo", "name").unwrap();
        writer.write_i32(32);
        let bytes = writer.freeze();
        assert_eq!(hex::encode(&bytes), "0003666f6f00000020");

        let mut reader = BeReader::new(bytes);
        assert_eq!(reader.read_string("name").unwrap(), "foo");
        assert_eq!(reader.read_i32("value").unwrap(), 32);
    }

    #[test]
    fn oversized_short_bytes_are_refused() {
        let mut writer = BeWriter::new();
        let big = vec![0u8; usize::from(u16::MAX) + 1];
        assert!(matches!(
            writer.write_short_bytes(&big, "blob"),
            Err(CqlError::InvalidValue { .. })
        ));
        assert!(writer.is_empty());
    }
}
