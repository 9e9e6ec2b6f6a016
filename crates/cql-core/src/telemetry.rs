//! `tracing` 订阅器的一次性安装入口。
//!
//! # 教案式说明
//! - **意图（Why）**：库代码只发 `tracing` 事件，不决定输出去向；二进制与集成环境调用
//!   [`install_fmt_subscriber`] 即可得到 `fmt + EnvFilter` 的标准输出。
//! - **契约（What）**：
//!   - 过滤规则取自 `RUST_LOG`，缺省为 `info`；
//!   - 重复调用，或外部已设置全局 Subscriber 时，返回 [`TelemetryError::AlreadyInstalled`]；
//!   - 安装成功后对整个进程生效，无法卸载。

use std::sync::OnceLock;

use thiserror::Error;
use tracing::dispatcher;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

static INSTALLED: OnceLock<()> = OnceLock::new();

/// 安装订阅器时可能出现的错误。
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// 本进程已经安装过全局 Subscriber。
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
    /// 设置全局 Subscriber 的底层失败。
    #[error("failed to set the global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// 安装 `fmt` 输出层与 `EnvFilter`。
pub fn install_fmt_subscriber() -> Result<(), TelemetryError> {
    if INSTALLED.get().is_some() || dispatcher::has_been_set() {
        return Err(TelemetryError::AlreadyInstalled);
    }

    let subscriber = tracing_subscriber::registry()
        .with(build_env_filter())
        .with(tracing_subscriber::fmt::layer().with_target(true));
    tracing::subscriber::set_global_default(subscriber)?;

    INSTALLED
        .set(())
        .map_err(|_| TelemetryError::AlreadyInstalled)
}

fn build_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}
