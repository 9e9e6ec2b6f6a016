#![deny(unsafe_code)]
#![warn(missing_docs)]

//! # cql-core
//!
//! ## 定位（Why）
//! - 数据库客户端数据面的共享基座：列类型码、列元数据、原生值模型、一致性级别，
//!   以及按网络字节序读写的 [`BeReader`]/[`BeWriter`]。
//! - `cql-codec` 与 `cql-retry` 只依赖本 crate 暴露的类型，彼此之间互不依赖。
//!
//! ## 契约（What）
//! - 所有公开类型都是不可变值或纯函数，可在任意线程并发使用；
//! - 解析失败统一以 [`CqlError`] 上报，错误码稳定可机读（见 [`CqlError::code`]）；
//! - `arbitrary-precision` Feature 控制 `Decimal`/`Varint` 是否出现在类型码与值模型中。

pub mod config;
pub mod consistency;
pub mod error;
pub mod telemetry;
pub mod types;
pub mod value;
pub mod wire;

pub use consistency::{ConsistencyLevel, WriteType};
pub use error::{CqlError, Result};
pub use types::{ColumnInfo, ColumnTypeCode, MAX_TYPE_DEPTH, TypeSpec};
pub use value::{CqlValue, NativeType};
pub use wire::{BeReader, BeWriter};

#[cfg(feature = "arbitrary-precision")]
pub use bigdecimal::BigDecimal;
#[cfg(feature = "arbitrary-precision")]
pub use num_bigint::BigInt;
