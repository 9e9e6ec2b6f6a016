//! 保守的默认策略。

use cql_core::{ConsistencyLevel, WriteType};

use crate::decision::RetryDecision;
use crate::policy::RetryPolicy;

/// 保守的默认策略：只在重试几乎必然成功时重试，且只重试一次，从不改变一致性级别。
///
/// - 读超时：足够多的副本已应答，但数据副本恰好没赶上时重试；
/// - 写超时：只有写 batch log 超时才重试，batch log 的写入是幂等的；
/// - 副本不可用：直接抛出，立即重试大概率仍然不可用。
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultRetryPolicy;

impl RetryPolicy for DefaultRetryPolicy {
    fn on_read_timeout(
        &self,
        _consistency: ConsistencyLevel,
        required: u32,
        received: u32,
        data_retrieved: bool,
        retry_count: u32,
    ) -> RetryDecision {
        if retry_count == 0 && received >= required && !data_retrieved {
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
        _received: u32,
        retry_count: u32,
    ) -> RetryDecision {
        if retry_count == 0 && write_type == WriteType::BatchLog {
            RetryDecision::retry_same()
        } else {
            RetryDecision::Rethrow
        }
    }

    fn on_unavailable(
        &self,
        _consistency: ConsistencyLevel,
        _required: u32,
        _alive: u32,
        _retry_count: u32,
    ) -> RetryDecision {
        RetryDecision::Rethrow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_timeout_retries_once_when_only_data_is_missing() {
        let policy = DefaultRetryPolicy;
        assert_eq!(
            policy.on_read_timeout(ConsistencyLevel::Quorum, 2, 2, false, 0),
            RetryDecision::retry_same()
        );
        assert_eq!(
            policy.on_read_timeout(ConsistencyLevel::Quorum, 2, 2, false, 1),
            RetryDecision::Rethrow
        );
        assert_eq!(
            policy.on_read_timeout(ConsistencyLevel::Quorum, 2, 1, false, 0),
            RetryDecision::Rethrow
        );
    }

    #[test]
    fn only_batch_log_writes_are_retried() {
        let policy = DefaultRetryPolicy;
        assert_eq!(
            policy.on_write_timeout(ConsistencyLevel::Quorum, WriteType::BatchLog, 2, 0, 0),
            RetryDecision::retry_same()
        );
        assert_eq!(
            policy.on_write_timeout(ConsistencyLevel::Quorum, WriteType::Simple, 2, 0, 0),
            RetryDecision::Rethrow
        );
    }
}
