//! `[retry]` 配置段。
//!
//! ```toml
//! [retry]
//! policy = "downgrading_consistency"
//! log_decisions = true
//! ```

use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::logging::LoggingRetryPolicy;
use crate::policies::{DefaultRetryPolicy, DowngradingConsistencyRetryPolicy, FallthroughRetryPolicy};
use crate::policy::RetryPolicy;

/// 内置策略的选择。
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// [`DefaultRetryPolicy`]。
    #[default]
    Default,
    /// [`FallthroughRetryPolicy`]。
    Fallthrough,
    /// [`DowngradingConsistencyRetryPolicy`]。
    DowngradingConsistency,
}

/// 重试配置。
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    /// 使用的策略。
    pub policy: PolicyKind,
    /// 是否套上 [`LoggingRetryPolicy`]。
    pub log_decisions: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            policy: PolicyKind::Default,
            log_decisions: true,
        }
    }
}

impl RetryConfig {
    /// 构造可在会话间共享的策略实例。
    #[must_use]
    pub fn build(&self) -> Arc<dyn RetryPolicy> {
        debug!(
            target: "cql_retry::config",
            policy = ?self.policy,
            log_decisions = self.log_decisions,
            "building retry policy"
        );
        match (self.policy, self.log_decisions) {
            (PolicyKind::Default, false) => Arc::new(DefaultRetryPolicy),
            (PolicyKind::Default, true) => Arc::new(LoggingRetryPolicy::wrap(DefaultRetryPolicy)),
            (PolicyKind::Fallthrough, false) => Arc::new(FallthroughRetryPolicy),
            (PolicyKind::Fallthrough, true) => {
                Arc::new(LoggingRetryPolicy::wrap(FallthroughRetryPolicy))
            }
            (PolicyKind::DowngradingConsistency, false) => {
                Arc::new(DowngradingConsistencyRetryPolicy)
            }
            (PolicyKind::DowngradingConsistency, true) => {
                Arc::new(LoggingRetryPolicy::wrap(DowngradingConsistencyRetryPolicy))
            }
        }
    }
}
