//! 重试决策值。

use std::fmt;

use cql_core::ConsistencyLevel;

/// 一次失败之后的处置。
///
/// # 教案式说明
/// - **意图（Why）**：服务端报告的读超时、写超时与副本不可用在本层不是错误，而是决策输入；
///   策略把它们归类为三种处置，由传输层的重试循环执行。
/// - **契约（What）**：
///   - [`RetryDecision::Rethrow`]：把失败原样交给调用方；
///   - [`RetryDecision::Retry`]：重新提交请求，`consistency` 为 `None` 时沿用原一致性级别；
///   - [`RetryDecision::Ignore`]：吞掉失败，返回此前已得到的部分结果（写入场景下视为成功）。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RetryDecision {
    /// 向上抛出。
    Rethrow,
    /// 重试，可选地改用新的一致性级别。
    Retry {
        /// 覆盖的一致性级别。
        consistency: Option<ConsistencyLevel>,
    },
    /// 忽略失败。
    Ignore,
}

impl RetryDecision {
    /// 以原一致性级别重试。
    #[must_use]
    pub const fn retry_same() -> Self {
        RetryDecision::Retry { consistency: None }
    }

    /// 以指定一致性级别重试。
    #[must_use]
    pub const fn retry_at(consistency: ConsistencyLevel) -> Self {
        RetryDecision::Retry {
            consistency: Some(consistency),
        }
    }

    /// 重试时实际使用的一致性级别：有覆盖取覆盖，否则取原级别。
    ///
    /// 对非 `Retry` 决策返回 `None`。
    #[must_use]
    pub fn effective_consistency(self, original: ConsistencyLevel) -> Option<ConsistencyLevel> {
        match self {
            RetryDecision::Retry { consistency } => Some(consistency.unwrap_or(original)),
            RetryDecision::Rethrow | RetryDecision::Ignore => None,
        }
    }

    /// 是否为 `Rethrow`。
    #[must_use]
    pub const fn is_rethrow(self) -> bool {
        matches!(self, RetryDecision::Rethrow)
    }
}

impl fmt::Display for RetryDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryDecision::Rethrow => f.write_str("RETHROW"),
            RetryDecision::Retry { consistency: None } => f.write_str("RETRY"),
            RetryDecision::Retry {
                consistency: Some(level),
            } => write!(f, "RETRY at {level}"),
            RetryDecision::Ignore => f.write_str("IGNORE"),
        }
    }
}
