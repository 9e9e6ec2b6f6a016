//! 降级一致性策略。

use cql_core::{ConsistencyLevel, WriteType};

use crate::decision::RetryDecision;
use crate::policy::RetryPolicy;

/// 以降低一致性为代价换取可用性的策略。
///
/// # 教案式说明
/// - **意图（Why）**：部分副本失联时，宁可以较弱的一致性完成请求，也不直接失败。
/// - **契约（What）**：
///   - 只处理首次失败，`retry_count > 0` 一律抛出；
///   - 降级目标取 `THREE`/`TWO`/`ONE` 中应答数（或存活数）能支撑的最高一级，一个都不够时抛出；
///   - 写超时按写入类别区分：`SIMPLE`/`BATCH` 至少一个确认即忽略（写入已在部分副本持久化，
///     重试不会更好）；`UNLOGGED_BATCH` 降级重试；`BATCH_LOG` 同级别重试；其余抛出。
/// - **注意（Trade-offs）**：降级后读到的数据可能不是最新的，只适合能接受最终一致的业务。
#[derive(Clone, Copy, Debug, Default)]
pub struct DowngradingConsistencyRetryPolicy;

impl DowngradingConsistencyRetryPolicy {
    fn max_likely_to_work(replicas: u32) -> RetryDecision {
        match replicas {
            3.. => RetryDecision::retry_at(ConsistencyLevel::Three),
            2 => RetryDecision::retry_at(ConsistencyLevel::Two),
            1 => RetryDecision::retry_at(ConsistencyLevel::One),
            0 => RetryDecision::Rethrow,
        }
    }
}

impl RetryPolicy for DowngradingConsistencyRetryPolicy {
    fn on_read_timeout(
        &self,
        _consistency: ConsistencyLevel,
        required: u32,
        received: u32,
        data_retrieved: bool,
        retry_count: u32,
    ) -> RetryDecision {
        if retry_count != 0 {
            return RetryDecision::Rethrow;
        }
        if received < required {
            Self::max_likely_to_work(received)
        } else if !data_retrieved {
            RetryDecision::retry_same()
        } else {
            RetryDecision::Rethrow
        }
    }

    fn on_write_timeout(
        &self,
        _consistency: ConsistencyLevel,
        write_type: WriteType,
        _required: u32,
        received: u32,
        retry_count: u32,
    ) -> RetryDecision {
        if retry_count != 0 {
            return RetryDecision::Rethrow;
        }
        match write_type {
            WriteType::Simple | WriteType::Batch if received > 0 => RetryDecision::Ignore,
            WriteType::UnloggedBatch => Self::max_likely_to_work(received),
            WriteType::BatchLog => RetryDecision::retry_same(),
            _ => RetryDecision::Rethrow,
        }
    }

    fn on_unavailable(
        &self,
        _consistency: ConsistencyLevel,
        _required: u32,
        alive: u32,
        retry_count: u32,
    ) -> RetryDecision {
        if retry_count != 0 {
            return RetryDecision::Rethrow;
        }
        Self::max_likely_to_work(alive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: DowngradingConsistencyRetryPolicy = DowngradingConsistencyRetryPolicy;

    #[test]
    fn read_downgrades_to_what_answered() {
        assert_eq!(
            POLICY.on_read_timeout(ConsistencyLevel::All, 5, 2, true, 0),
            RetryDecision::retry_at(ConsistencyLevel::Two)
        );
        assert_eq!(
            POLICY.on_read_timeout(ConsistencyLevel::All, 5, 4, true, 0),
            RetryDecision::retry_at(ConsistencyLevel::Three)
        );
        assert_eq!(
            POLICY.on_read_timeout(ConsistencyLevel::Quorum, 2, 0, false, 0),
            RetryDecision::Rethrow
        );
        assert_eq!(
            POLICY.on_read_timeout(ConsistencyLevel::Quorum, 2, 2, false, 0),
            RetryDecision::retry_same()
        );
    }

    #[test]
    fn writes_depend_on_their_kind() {
        let write = |kind, received| {
            POLICY.on_write_timeout(ConsistencyLevel::Quorum, kind, 3, received, 0)
        };
        assert_eq!(write(WriteType::Simple, 1), RetryDecision::Ignore);
        assert_eq!(write(WriteType::Batch, 0), RetryDecision::Rethrow);
        assert_eq!(
            write(WriteType::UnloggedBatch, 1),
            RetryDecision::retry_at(ConsistencyLevel::One)
        );
        assert_eq!(write(WriteType::BatchLog, 0), RetryDecision::retry_same());
        assert_eq!(write(WriteType::Counter, 2), RetryDecision::Rethrow);
        assert_eq!(write(WriteType::Cas, 2), RetryDecision::Rethrow);
    }

    #[test]
    fn second_failures_are_never_retried() {
        assert_eq!(
            POLICY.on_unavailable(ConsistencyLevel::Quorum, 3, 2, 1),
            RetryDecision::Rethrow
        );
        assert_eq!(
            POLICY.on_unavailable(ConsistencyLevel::Quorum, 3, 2, 0),
            RetryDecision::retry_at(ConsistencyLevel::Two)
        );
    }
}
