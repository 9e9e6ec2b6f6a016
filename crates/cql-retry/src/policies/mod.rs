//! 内置重试策略。
//!
//! | 策略 | 读超时 | 写超时 | 副本不可用 |
//! |------|--------|--------|------------|
//! | [`DefaultRetryPolicy`] | 应答足够但缺数据时同级别重试一次 | 仅 `BATCH_LOG` 同级别重试一次 | 抛出 |
//! | [`FallthroughRetryPolicy`] | 抛出 | 抛出 | 抛出 |
//! | [`DowngradingConsistencyRetryPolicy`] | 降级到可达级别重试一次 | 视写入类别忽略/降级/重试 | 降级到存活副本可支撑的级别 |

mod default;
mod downgrading;
mod fallthrough;

pub use default::DefaultRetryPolicy;
pub use downgrading::DowngradingConsistencyRetryPolicy;
pub use fallthrough::FallthroughRetryPolicy;
