//! 重试策略契约。

use std::sync::Arc;

use cql_core::{ConsistencyLevel, WriteType};

use crate::decision::RetryDecision;

/// 重试决策能力：每种服务端失败各一个入口。
///
/// # 教案式说明
/// - **意图（Why）**：重试阈值因业务而异，本 trait 只固定输入与输出，具体门槛交给实现。
/// - **契约（What）**：
///   - 三个入口都是纯函数，不得阻塞、不得 panic，只做分类；
///   - `retry_count` 为该请求此前已重试的次数，首次失败时为 0；
///   - 实现需 `Send + Sync`，以便以 `Arc<dyn RetryPolicy>` 在会话间共享。
/// - **组合（How）**：`Arc<P>`、`Box<P>` 与 `&P` 均转发到内部策略，装饰器可以叠加在任意句柄之上。
pub trait RetryPolicy: Send + Sync {
    /// 读超时：`received` 个副本在超时前应答，需要 `required` 个；`data_retrieved`
    /// 表示应答中是否包含了数据副本。
    fn on_read_timeout(
        &self,
        consistency: ConsistencyLevel,
        required: u32,
        received: u32,
        data_retrieved: bool,
        retry_count: u32,
    ) -> RetryDecision;

    /// 写超时：`received` 个副本确认，需要 `required` 个。
    fn on_write_timeout(
        &self,
        consistency: ConsistencyLevel,
        write_type: WriteType,
        required: u32,
        received: u32,
        retry_count: u32,
    ) -> RetryDecision;

    /// 协调者在发出请求前即判定存活副本不足。
    fn on_unavailable(
        &self,
        consistency: ConsistencyLevel,
        required: u32,
        alive: u32,
        retry_count: u32,
    ) -> RetryDecision;
}

macro_rules! forward_retry_policy {
    ($($handle:ty),+ $(,)?) => {
        $(
            impl<P: RetryPolicy + ?Sized> RetryPolicy for $handle {
                fn on_read_timeout(
                    &self,
                    consistency: ConsistencyLevel,
                    required: u32,
                    received: u32,
                    data_retrieved: bool,
                    retry_count: u32,
                ) -> RetryDecision {
                    (**self).on_read_timeout(
                        consistency,
                        required,
                        received,
                        data_retrieved,
                        retry_count,
                    )
                }

                fn on_write_timeout(
                    &self,
                    consistency: ConsistencyLevel,
                    write_type: WriteType,
                    required: u32,
                    received: u32,
                    retry_count: u32,
                ) -> RetryDecision {
                    (**self).on_write_timeout(consistency, write_type, required, received, retry_count)
                }

                fn on_unavailable(
                    &self,
                    consistency: ConsistencyLevel,
                    required: u32,
                    alive: u32,
                    retry_count: u32,
                ) -> RetryDecision {
                    (**self).on_unavailable(consistency, required, alive, retry_count)
                }
            }
        )+
    };
}

forward_retry_policy!(&P, Box<P>, Arc<P>);
