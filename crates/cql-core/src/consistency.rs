//! 一致性级别与写入类别。
//!
//! 两者都是服务端在超时/不可用错误体中回传的判别量，也是重试决策的输入。

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{CqlError, Result};

/// 一致性级别：一次读写在判定成功前需要的副本确认数量/范围。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u16)]
pub enum ConsistencyLevel {
    /// 任意节点（含 hinted handoff）。
    Any = 0x0000,
    /// 一个副本。
    One = 0x0001,
    /// 两个副本。
    Two = 0x0002,
    /// 三个副本。
    Three = 0x0003,
    /// 多数派。
    Quorum = 0x0004,
    /// 全部副本。
    All = 0x0005,
    /// 本地数据中心多数派。
    LocalQuorum = 0x0006,
    /// 每个数据中心各自多数派。
    EachQuorum = 0x0007,
    /// 轻量事务的线性一致读。
    Serial = 0x0008,
    /// 本地数据中心的线性一致读。
    LocalSerial = 0x0009,
    /// 本地数据中心一个副本。
    LocalOne = 0x000A,
}

impl ConsistencyLevel {
    const ALL_LEVELS: [ConsistencyLevel; 11] = [
        ConsistencyLevel::Any,
        ConsistencyLevel::One,
        ConsistencyLevel::Two,
        ConsistencyLevel::Three,
        ConsistencyLevel::Quorum,
        ConsistencyLevel::All,
        ConsistencyLevel::LocalQuorum,
        ConsistencyLevel::EachQuorum,
        ConsistencyLevel::Serial,
        ConsistencyLevel::LocalSerial,
        ConsistencyLevel::LocalOne,
    ];

    /// 线上取值。
    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// 从线上取值解析。
    pub fn from_code(code: u16) -> Result<Self> {
        Self::ALL_LEVELS
            .iter()
            .copied()
            .find(|level| level.code() == code)
            .ok_or_else(|| {
                CqlError::protocol("consistency", format!("unknown consistency level 0x{code:04x}"))
            })
    }

    /// 协议中的大写名称。
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ConsistencyLevel::Any => "ANY",
            ConsistencyLevel::One => "ONE",
            ConsistencyLevel::Two => "TWO",
            ConsistencyLevel::Three => "THREE",
            ConsistencyLevel::Quorum => "QUORUM",
            ConsistencyLevel::All => "ALL",
            ConsistencyLevel::LocalQuorum => "LOCAL_QUORUM",
            ConsistencyLevel::EachQuorum => "EACH_QUORUM",
            ConsistencyLevel::Serial => "SERIAL",
            ConsistencyLevel::LocalSerial => "LOCAL_SERIAL",
            ConsistencyLevel::LocalOne => "LOCAL_ONE",
        }
    }
}

impl fmt::Display for ConsistencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 写超时错误体中的写入类别。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WriteType {
    /// 非批量写。
    Simple,
    /// 已记录 batch log 的批量写。
    Batch,
    /// 未记录 batch log 的批量写。
    UnloggedBatch,
    /// 计数器写。
    Counter,
    /// 写 batch log 本身超时。
    BatchLog,
    /// 轻量事务的 Paxos 阶段。
    Cas,
}

impl WriteType {
    /// 服务端使用的名称。
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            WriteType::Simple => "SIMPLE",
            WriteType::Batch => "BATCH",
            WriteType::UnloggedBatch => "UNLOGGED_BATCH",
            WriteType::Counter => "COUNTER",
            WriteType::BatchLog => "BATCH_LOG",
            WriteType::Cas => "CAS",
        }
    }
}

impl FromStr for WriteType {
    type Err = CqlError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "SIMPLE" => Ok(WriteType::Simple),
            "BATCH" => Ok(WriteType::Batch),
            "UNLOGGED_BATCH" => Ok(WriteType::UnloggedBatch),
            "COUNTER" => Ok(WriteType::Counter),
            "BATCH_LOG" => Ok(WriteType::BatchLog),
            "CAS" => Ok(WriteType::Cas),
            other => Err(CqlError::protocol(
                "write timeout write type",
                format!("unknown write type `{other}`"),
            )),
        }
    }
}

impl fmt::Display for WriteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
