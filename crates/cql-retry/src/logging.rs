//! 记录重试决策的装饰器。
//!
//! # 教案式说明
//! - **意图（Why）**：`Ignore` 与 `Retry` 会把服务端失败"吞掉"，调用方看不到任何错误；
//!   为了事后能还原发生过什么，装饰器在这两种决策上各留一条 `info` 日志。
//! - **契约（What）**：
//!   - 每个调用原样转发给内部策略，返回值逐字节不变；
//!   - `Ignore`/`Retry` 各记录恰好一条事件，`Rethrow` 不记录（失败会经正常错误通道浮出）；
//!   - `Retry` 事件中的 `consistency` 字段是实际重试所用的级别：有覆盖取覆盖，否则取原级别；
//!   - 事件 target 固定为 `cql_retry::logging`，便于用 `EnvFilter` 单独开关。
//! - **实现（How）**：持有具体类型 `P`，不存在"未设置内部策略"的状态。

use cql_core::{ConsistencyLevel, WriteType};
use tracing::info;

use crate::decision::RetryDecision;
use crate::policy::RetryPolicy;

/// 日志装饰器。
#[derive(Clone, Debug, Default)]
pub struct LoggingRetryPolicy<P> {
    inner: P,
}

impl<P: RetryPolicy> LoggingRetryPolicy<P> {
    /// 包装一个策略。
    #[must_use]
    pub fn wrap(policy: P) -> Self {
        Self { inner: policy }
    }

    /// 内部策略。
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// 拆出内部策略。
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: RetryPolicy> RetryPolicy for LoggingRetryPolicy<P> {
    fn on_read_timeout(
        &self,
        consistency: ConsistencyLevel,
        required: u32,
        received: u32,
        data_retrieved: bool,
        retry_count: u32,
    ) -> RetryDecision {
        let decision =
            self.inner
                .on_read_timeout(consistency, required, received, data_retrieved, retry_count);
        match decision {
            RetryDecision::Ignore => info!(
                target: "cql_retry::logging",
                initial_consistency = %consistency,
                required,
                received,
                data_retrieved,
                retry_count,
                "Ignoring read timeout"
            ),
            RetryDecision::Retry { consistency: next } => info!(
                target: "cql_retry::logging",
                consistency = %next.unwrap_or(consistency),
                initial_consistency = %consistency,
                required,
                received,
                data_retrieved,
                retry_count,
                "Retrying on read timeout at consistency {}",
                next.unwrap_or(consistency)
            ),
            RetryDecision::Rethrow => {}
        }
        decision
    }

    fn on_write_timeout(
        &self,
        consistency: ConsistencyLevel,
        write_type: WriteType,
        required: u32,
        received: u32,
        retry_count: u32,
    ) -> RetryDecision {
        let decision =
            self.inner
                .on_write_timeout(consistency, write_type, required, received, retry_count);
        match decision {
            RetryDecision::Ignore => info!(
                target: "cql_retry::logging",
                initial_consistency = %consistency,
                write_type = %write_type,
                required,
                received,
                retry_count,
                "Ignoring write timeout"
            ),
            RetryDecision::Retry { consistency: next } => info!(
                target: "cql_retry::logging",
                consistency = %next.unwrap_or(consistency),
                initial_consistency = %consistency,
                write_type = %write_type,
                required,
                received,
                retry_count,
                "Retrying on write timeout at consistency {}",
                next.unwrap_or(consistency)
            ),
            RetryDecision::Rethrow => {}
        }
        decision
    }

    fn on_unavailable(
        &self,
        consistency: ConsistencyLevel,
        required: u32,
        alive: u32,
        retry_count: u32,
    ) -> RetryDecision {
        let decision = self
            .inner
            .on_unavailable(consistency, required, alive, retry_count);
        match decision {
            RetryDecision::Ignore => info!(
                target: "cql_retry::logging",
                initial_consistency = %consistency,
                required,
                alive,
                retry_count,
                "Ignoring unavailable exception"
            ),
            RetryDecision::Retry { consistency: next } => info!(
                target: "cql_retry::logging",
                consistency = %next.unwrap_or(consistency),
                initial_consistency = %consistency,
                required,
                alive,
                retry_count,
                "Retrying on unavailable exception at consistency {}",
                next.unwrap_or(consistency)
            ),
            RetryDecision::Rethrow => {}
        }
        decision
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    /// 固定返回同一决策的测试策略。
    struct Always(RetryDecision);

    impl RetryPolicy for Always {
        fn on_read_timeout(
            &self,
            _: ConsistencyLevel,
            _: u32,
            _: u32,
            _: bool,
            _: u32,
        ) -> RetryDecision {
            self.0
        }

        fn on_write_timeout(
            &self,
            _: ConsistencyLevel,
            _: WriteType,
            _: u32,
            _: u32,
            _: u32,
        ) -> RetryDecision {
            self.0
        }

        fn on_unavailable(&self, _: ConsistencyLevel, _: u32, _: u32, _: u32) -> RetryDecision {
            self.0
        }
    }

    fn count_lines(logs: &[&str], needle: &str) -> usize {
        logs.iter().filter(|line| line.contains(needle)).count()
    }

    #[test]
    #[traced_test]
    fn rethrow_is_never_logged() {
        let policy = LoggingRetryPolicy::wrap(Always(RetryDecision::Rethrow));
        let decision = policy.on_read_timeout(ConsistencyLevel::Quorum, 2, 1, false, 0);
        assert_eq!(decision, RetryDecision::Rethrow);
        policy.on_write_timeout(ConsistencyLevel::Quorum, WriteType::Simple, 2, 1, 0);
        policy.on_unavailable(ConsistencyLevel::Quorum, 2, 1, 0);
        logs_assert(|lines| match count_lines(lines, "cql_retry::logging") {
            0 => Ok(()),
            n => Err(format!("expected no decision logs, found {n}")),
        });
    }

    #[test]
    #[traced_test]
    fn ignore_logs_exactly_once() {
        let policy = LoggingRetryPolicy::wrap(Always(RetryDecision::Ignore));
        let decision =
            policy.on_write_timeout(ConsistencyLevel::One, WriteType::Batch, 1, 0, 0);
        assert_eq!(decision, RetryDecision::Ignore);
        assert!(logs_contain("Ignoring write timeout"));
        logs_assert(|lines| match count_lines(lines, "Ignoring write timeout") {
            1 => Ok(()),
            n => Err(format!("expected one ignore log, found {n}")),
        });
    }

    #[derive(Clone, Copy)]
    enum Entry {
        Read,
        Write,
        Unavailable,
    }

    fn invoke(policy: &impl RetryPolicy, entry: Entry) -> RetryDecision {
        match entry {
            Entry::Read => policy.on_read_timeout(ConsistencyLevel::Quorum, 2, 1, true, 0),
            Entry::Write => {
                policy.on_write_timeout(ConsistencyLevel::Quorum, WriteType::Simple, 2, 1, 0)
            }
            Entry::Unavailable => policy.on_unavailable(ConsistencyLevel::Quorum, 2, 1, 0),
        }
    }

    #[test]
    #[traced_test]
    fn every_entry_point_logs_ignore_and_retry_once() {
        let cases = [
            (RetryDecision::Ignore, Entry::Read, "Ignoring read timeout"),
            (RetryDecision::Ignore, Entry::Write, "Ignoring write timeout"),
            (
                RetryDecision::Ignore,
                Entry::Unavailable,
                "Ignoring unavailable exception",
            ),
            (
                RetryDecision::retry_at(ConsistencyLevel::One),
                Entry::Read,
                "Retrying on read timeout at consistency ONE",
            ),
            (
                RetryDecision::retry_same(),
                Entry::Write,
                "Retrying on write timeout at consistency QUORUM",
            ),
            (
                RetryDecision::retry_at(ConsistencyLevel::Two),
                Entry::Unavailable,
                "Retrying on unavailable exception at consistency TWO",
            ),
        ];
        for (decision, entry, _) in cases {
            let policy = LoggingRetryPolicy::wrap(Always(decision));
            assert_eq!(invoke(&policy, entry), decision);
        }
        logs_assert(|lines| {
            for (_, _, message) in cases {
                match count_lines(lines, message) {
                    1 => {}
                    n => return Err(format!("expected `{message}` once, found {n}")),
                }
            }
            match count_lines(lines, "cql_retry::logging") {
                6 => Ok(()),
                n => Err(format!("expected six decision logs, found {n}")),
            }
        });
    }

    #[test]
    #[traced_test]
    fn retry_logs_the_override_level() {
        let policy =
            LoggingRetryPolicy::wrap(Always(RetryDecision::retry_at(ConsistencyLevel::Two)));
        policy.on_unavailable(ConsistencyLevel::All, 3, 2, 0);
        assert!(logs_contain(
            "Retrying on unavailable exception at consistency TWO"
        ));
        logs_assert(|lines| match count_lines(lines, "Retrying on unavailable") {
            1 => Ok(()),
            n => Err(format!("expected one retry log, found {n}")),
        });
    }

    #[test]
    #[traced_test]
    fn retry_without_override_logs_the_original_level() {
        let policy = LoggingRetryPolicy::wrap(Always(RetryDecision::retry_same()));
        let decision = policy.on_read_timeout(ConsistencyLevel::LocalQuorum, 2, 2, false, 0);
        assert_eq!(decision, RetryDecision::retry_same());
        assert!(logs_contain(
            "Retrying on read timeout at consistency LOCAL_QUORUM"
        ));
    }
}
