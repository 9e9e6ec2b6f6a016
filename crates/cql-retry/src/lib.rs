#![deny(unsafe_code)]
#![warn(missing_docs)]

//! # cql-retry
//!
//! ## 定位（Why）
//! - 把服务端报告的读超时、写超时与副本不可用归类为 [`RetryDecision`]，由传输层的重试循环执行；
//! - 提供 [`LoggingRetryPolicy`] 装饰器，在失败被"吞掉"时留下可追溯的日志。
//!
//! ## 契约（What）
//! - 所有决策都是同步纯函数，不做 I/O、不阻塞、不 panic；
//! - 装饰器对决策零改动，只观察；
//! - 重试次数上限、退避与取消属于传输层，本 crate 不涉及。
//!
//! ## 使用提示（How）
//! ```
//! use cql_core::ConsistencyLevel;
//! use cql_retry::{DefaultRetryPolicy, LoggingRetryPolicy, RetryDecision, RetryPolicy};
//!
//! let policy = LoggingRetryPolicy::wrap(DefaultRetryPolicy);
//! let decision = policy.on_read_timeout(ConsistencyLevel::Quorum, 2, 2, false, 0);
//! assert_eq!(decision, RetryDecision::retry_same());
//! ```

pub mod config;
pub mod decision;
pub mod logging;
pub mod policies;
pub mod policy;

pub use config::{PolicyKind, RetryConfig};
pub use decision::RetryDecision;
pub use logging::LoggingRetryPolicy;
pub use policies::{DefaultRetryPolicy, DowngradingConsistencyRetryPolicy, FallthroughRetryPolicy};
pub use policy::RetryPolicy;
