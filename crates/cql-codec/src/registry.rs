//! 按类型码下标派发的列编解码注册表。
//!
//! 全局表在首次访问时装入标准编解码器，此后只读；查不到编解码器属于配置错误，直接 panic。

use std::sync::OnceLock;

use bytes::Bytes;
use cql_core::{ColumnInfo, ColumnTypeCode, CqlValue, NativeType, Result, TypeSpec};
use tracing::debug;

use crate::codecs;

/// 派发表容量：类型码按 `u8` 范围直接下标。
const TABLE_SLOTS: usize = u8::MAX as usize + 1;

/// 单一列类型的编解码三元组。
///
/// # 教案式说明
/// - **意图（Why）**：每种列类型只需实现一次本 trait 并注册一次，注册表与其他组件无需改动。
/// - **契约（What）**：
///   - 实现必须无状态、纯函数，可被任意线程并发调用；
///   - `decode` 对服务端可能发出的任意字节序列给出确定结果，失败时返回
///     [`cql_core::CqlError::ProtocolViolation`]，且要求一次消费完整个值；
///   - `encode` 严格校验原生类型，不做任何隐式转换，类型不符返回
///     [`cql_core::CqlError::TypeMismatch`]；
///   - `info` 与注册时的类型码不匹配（例如 list 列缺少元素类型）属于调用方编程错误，实现可直接 panic。
/// - **递归（How）**：集合类实现通过传入的 `registry` 派发元素，受限注册表中缺失的元素类型同样会 fail-fast。
pub trait ColumnCodec: Send + Sync + 'static {
    /// 线上字节 → 原生值。
    fn decode(&self, registry: &dyn CodecRegistry, info: &ColumnInfo, bytes: &Bytes)
    -> Result<CqlValue>;

    /// 该列解码后得到的原生类型。
    fn native_type(&self, registry: &dyn CodecRegistry, info: &ColumnInfo) -> NativeType;

    /// 原生值 → 线上字节。
    fn encode(&self, registry: &dyn CodecRegistry, info: &ColumnInfo, value: &CqlValue)
    -> Result<Bytes>;
}

/// `CodecRegistry` 是按类型码派发编解码的能力接口。
///
/// # 契约说明（What）
/// - 三个入口均为 O(1) 下标派发；
/// - 对未注册的类型码立即 panic：这代表构建或部署缺陷，而非可恢复的运行期错误；
/// - 实现需 `Send + Sync + 'static`，以便作为进程级单例在所有解码线程间共享。
pub trait CodecRegistry: Send + Sync + 'static {
    /// 解码一个列值。
    fn decode(&self, bytes: &Bytes, code: ColumnTypeCode, info: &ColumnInfo) -> Result<CqlValue>;

    /// 解析列的原生类型。
    fn resolve_native_type(&self, code: ColumnTypeCode, info: &ColumnInfo) -> NativeType;

    /// 编码一个列值。
    fn encode(&self, value: &CqlValue, code: ColumnTypeCode, info: &ColumnInfo) -> Result<Bytes>;

    /// 以 [`TypeSpec`] 为参数的解码便捷入口。
    fn decode_spec(&self, bytes: &Bytes, spec: &TypeSpec) -> Result<CqlValue> {
        self.decode(bytes, spec.code, &spec.info)
    }

    /// 以 [`TypeSpec`] 为参数的编码便捷入口。
    fn encode_spec(&self, value: &CqlValue, spec: &TypeSpec) -> Result<Bytes> {
        self.encode(value, spec.code, &spec.info)
    }
}

/// 以类型码为下标的静态派发表。
///
/// # 生命周期
/// - 构造阶段通过 [`CodecTable::register`] 写入，完成后只读；
/// - 进程级实例由 [`CodecTable::global`] 惰性初始化且只初始化一次，之后的读取无需任何同步。
#[derive(Clone)]
pub struct CodecTable {
    entries: [Option<&'static dyn ColumnCodec>; TABLE_SLOTS],
}

impl CodecTable {
    /// 不含任何条目的空表。
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: [None; TABLE_SLOTS],
        }
    }

    /// 注册全部内置编解码器的表。
    #[must_use]
    pub fn with_standard_codecs() -> Self {
        let mut table = Self::empty();
        for (code, codec) in codecs::STANDARD {
            table.register(*code, *codec);
        }
        table
    }

    /// 进程级共享实例。
    pub fn global() -> &'static CodecTable {
        static GLOBAL: OnceLock<CodecTable> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            let table = CodecTable::with_standard_codecs();
            debug!(
                target: "cql_codec::registry",
                registered = table.len(),
                "column codec table initialised"
            );
            table
        })
    }

    /// 绑定类型码与编解码器；重复注册以最后一次为准。
    pub fn register(&mut self, code: ColumnTypeCode, codec: &'static dyn ColumnCodec) -> &mut Self {
        self.entries[code.index()] = Some(codec);
        self
    }

    /// 类型码是否已注册。
    #[must_use]
    pub fn is_registered(&self, code: ColumnTypeCode) -> bool {
        self.entries[code.index()].is_some()
    }

    /// 取出某个类型码上登记的编解码器，便于拼装受限的派发表。
    #[must_use]
    pub fn codec(&self, code: ColumnTypeCode) -> Option<&'static dyn ColumnCodec> {
        self.entries[code.index()]
    }

    /// 已注册的类型码数量。
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|slot| slot.is_some()).count()
    }

    /// 是否一个条目都没有。
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[track_caller]
    fn entry(&self, code: ColumnTypeCode) -> &'static dyn ColumnCodec {
        match self.entries[code.index()] {
            Some(codec) => codec,
            None => panic!(
                "no column codec registered for type code `{code}` (0x{:04x}); the codec table is misconfigured",
                code.wire_id()
            ),
        }
    }
}

impl Default for CodecTable {
    fn default() -> Self {
        Self::with_standard_codecs()
    }
}

impl std::fmt::Debug for CodecTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registered: Vec<ColumnTypeCode> = ColumnTypeCode::ALL
            .iter()
            .copied()
            .filter(|code| self.is_registered(*code))
            .collect();
        f.debug_struct("CodecTable")
            .field("registered", &registered)
            .finish()
    }
}

impl CodecRegistry for CodecTable {
    fn decode(&self, bytes: &Bytes, code: ColumnTypeCode, info: &ColumnInfo) -> Result<CqlValue> {
        self.entry(code).decode(self, info, bytes)
    }

    fn resolve_native_type(&self, code: ColumnTypeCode, info: &ColumnInfo) -> NativeType {
        self.entry(code).native_type(self, info)
    }

    fn encode(&self, value: &CqlValue, code: ColumnTypeCode, info: &ColumnInfo) -> Result<Bytes> {
        self.entry(code).encode(self, info, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codecs::blob::BlobCodec;

    #[test]
    fn standard_table_covers_every_code() {
        let table = CodecTable::with_standard_codecs();
        for code in ColumnTypeCode::ALL {
            assert!(table.is_registered(*code), "{code} is not registered");
        }
        assert_eq!(table.len(), ColumnTypeCode::ALL.len());
    }

    #[test]
    fn registration_is_idempotent() {
        let mut table = CodecTable::empty();
        table
            .register(ColumnTypeCode::Blob, &BlobCodec)
            .register(ColumnTypeCode::Blob, &BlobCodec);
        assert_eq!(table.len(), 1);
    }

    #[test]
    #[should_panic(expected = "no column codec registered for type code `int`")]
    fn unregistered_code_panics() {
        let mut table = CodecTable::empty();
        table.register(ColumnTypeCode::Blob, &BlobCodec);
        let _ = table.decode(
            &Bytes::from_static(&[0, 0, 0, 1]),
            ColumnTypeCode::Int,
            &ColumnInfo::None,
        );
    }

    #[test]
    fn global_table_is_shared() {
        let first: *const CodecTable = CodecTable::global();
        let second: *const CodecTable = CodecTable::global();
        assert_eq!(first, second);
    }
}
