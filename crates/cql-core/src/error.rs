//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 集中定义数据面可恢复错误：字节流违反协议、编码输入类型不符、值域非法、配置失败。
//! - 未注册类型码的派发**不在**此列：那是构建/部署缺陷，由注册表直接 panic。
//!
//! ## 设计要求（What）
//! - 所有变体派生 [`thiserror::Error`]，可与 `anyhow` 等上层框架直接组合；
//! - 每个变体对应一个稳定的 `cql.*` 错误码，便于日志聚合与告警。

use std::borrow::Cow;

use thiserror::Error;

use crate::value::NativeType;

/// crate 级 `Result` 别名。
pub type Result<T, E = CqlError> = core::result::Result<T, E>;

/// 数据面错误域。
///
/// # 教案式说明
/// - **意图 (Why)**：区分"对端字节流有问题"与"调用方传错了值"，前者应上报为协议错误并断开/丢弃，
///   后者属于编程错误，应原样冒泡到发起读写的调用点。
/// - **契约 (What)**：
///   - 所有变体 `Send + Sync + 'static`，可跨线程传播；
///   - `context` 字段标注出错的解析位置（如 `"prepared.query_id"`），为静态字符串；
///   - 绝不以截断或零填充掩盖 [`CqlError::ProtocolViolation`]。
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CqlError {
    /// 字节流格式错误、长度越界、终止符非法或未知的线上类型码。
    #[error("protocol violation while reading `{context}`: {detail}")]
    ProtocolViolation {
        /// 出错的解析位置。
        context: &'static str,
        /// 人类可读的诊断信息。
        detail: Cow<'static, str>,
    },

    /// 编码输入的原生类型与编解码器期望的类型不一致。
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// 编解码器期望的原生类型。
        expected: NativeType,
        /// 实际传入值的原生类型名。
        actual: &'static str,
    },

    /// 原生类型正确，但取值无法映射到线上表示（例如 ascii 列写入非 ASCII 字符）。
    #[error("invalid value for `{context}`: {detail}")]
    InvalidValue {
        /// 出错的编码位置。
        context: &'static str,
        /// 人类可读的诊断信息。
        detail: Cow<'static, str>,
    },

    /// 动态组合值引用了别名表中不存在的别名。
    #[error("dynamic composite alias `{alias}` is not declared by the comparator")]
    UnknownCompositeAlias {
        /// 未声明的别名字符。
        alias: char,
    },

    /// 动态组合值的某个分量找不到能承载其原生类型的别名。
    #[error("type mismatch: no composite alias accepts a {actual} component")]
    UnmappedComponent {
        /// 分量的原生类型名。
        actual: &'static str,
    },

    /// 配置加载或校验失败。
    #[error("configuration error: {detail}")]
    Config {
        /// 人类可读的诊断信息。
        detail: String,
    },
}

impl CqlError {
    /// 构造协议违例错误。
    pub fn protocol(context: &'static str, detail: impl Into<Cow<'static, str>>) -> Self {
        CqlError::ProtocolViolation {
            context,
            detail: detail.into(),
        }
    }

    /// 构造类型不符错误。
    pub fn type_mismatch(expected: NativeType, actual: &'static str) -> Self {
        CqlError::TypeMismatch { expected, actual }
    }

    /// 构造组合分量无别名可用的错误。
    pub fn unmapped_component(actual: &'static str) -> Self {
        CqlError::UnmappedComponent { actual }
    }

    /// 构造非法取值错误。
    pub fn invalid_value(context: &'static str, detail: impl Into<Cow<'static, str>>) -> Self {
        CqlError::InvalidValue {
            context,
            detail: detail.into(),
        }
    }

    /// 构造配置错误。
    pub fn config(detail: impl Into<String>) -> Self {
        CqlError::Config {
            detail: detail.into(),
        }
    }

    /// 稳定错误码，遵循 `<域>.<语义>` 命名。
    pub fn code(&self) -> &'static str {
        match self {
            CqlError::ProtocolViolation { .. } => "cql.protocol.violation",
            CqlError::TypeMismatch { .. } => "cql.codec.type_mismatch",
            CqlError::InvalidValue { .. } => "cql.codec.invalid_value",
            CqlError::UnknownCompositeAlias { .. } => "cql.composite.unknown_alias",
            CqlError::UnmappedComponent { .. } => "cql.composite.type_mismatch",
            CqlError::Config { .. } => "cql.config.invalid",
        }
    }

    /// 是否属于类型不符（含组合分量无别名可用）。
    pub fn is_type_mismatch(&self) -> bool {
        matches!(
            self,
            CqlError::TypeMismatch { .. } | CqlError::UnmappedComponent { .. }
        )
    }

    /// 是否属于协议违例。
    pub fn is_protocol_violation(&self) -> bool {
        matches!(self, CqlError::ProtocolViolation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_expected_and_actual_types() {
        let err = CqlError::type_mismatch(NativeType::Bytes, "String");
        assert_eq!(err.to_string(), "type mismatch: expected Bytes, got String");
        assert_eq!(err.code(), "cql.codec.type_mismatch");
    }

    #[test]
    fn unmapped_components_count_as_type_mismatches() {
        let err = CqlError::unmapped_component("bool");
        assert!(err.is_type_mismatch());
        assert!(!err.is_protocol_violation());
        assert_eq!(err.code(), "cql.composite.type_mismatch");
        assert_eq!(
            err.to_string(),
            "type mismatch: no composite alias accepts a bool component"
        );
    }

    #[test]
    fn protocol_violation_carries_context() {
        let err = CqlError::protocol("prepared.query_id", "declared 12 bytes, 3 remaining");
        assert!(err.is_protocol_violation());
        assert_eq!(
            err.to_string(),
            "protocol violation while reading `prepared.query_id`: declared 12 bytes, 3 remaining"
        );
    }
}
