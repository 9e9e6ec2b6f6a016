//! 从不重试的策略。

use cql_core::{ConsistencyLevel, WriteType};

use crate::decision::RetryDecision;
use crate::policy::RetryPolicy;

/// 从不重试，所有失败原样抛给调用方，由业务自行处理。
#[derive(Clone, Copy, Debug, Default)]
pub struct FallthroughRetryPolicy;

impl RetryPolicy for FallthroughRetryPolicy {
    fn on_read_timeout(
        &self,
        _consistency: ConsistencyLevel,
        _required: u32,
        _received: u32,
        _data_retrieved: bool,
        _retry_count: u32,
    ) -> RetryDecision {
        RetryDecision::Rethrow
    }

    fn on_write_timeout(
        &self,
        _consistency: ConsistencyLevel,
        _write_type: WriteType,
        _required: u32,
        _received: u32,
        _retry_count: u32,
    ) -> RetryDecision {
        RetryDecision::Rethrow
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
