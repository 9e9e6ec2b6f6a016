#![deny(unsafe_code)]
#![warn(missing_docs)]

//! # cql-codec
//!
//! ## 定位（Why）
//! - 数据面读写热路径：每一行的每一个单元格都经由 [`CodecTable`] 按类型码下标派发到
//!   对应的 [`ColumnCodec`]；
//! - 同时提供动态组合值编解码（[`DynamicCompositeCodec`]）与 prepared 响应解析
//!   （[`parse_prepared`]）。
//!
//! ## 契约（What）
//! - 派发表在首次使用时构建一次，之后只读，可在任意线程并发调用；
//! - 未注册的类型码立即 panic；字节层面的问题一律以 [`cql_core::CqlError`] 上报；
//! - 所有操作只处理已完整接收的内存缓冲，不做 I/O、不阻塞。
//!
//! ## 使用提示（How）
//! ```
//! use bytes::Bytes;
//! use cql_codec::{CodecRegistry, CodecTable};
//! use cql_core::{ColumnInfo, ColumnTypeCode, CqlValue};
//!
//! let table = CodecTable::global();
//! let bytes = table
//!     .encode(&CqlValue::Int(32), ColumnTypeCode::Int, &ColumnInfo::None)
//!     .unwrap();
//! assert_eq!(bytes, Bytes::from_static(&[0, 0, 0, 32]));
//! ```

pub mod codecs;
pub mod composite;
pub mod config;
pub mod metadata;
pub mod prepared;
pub mod registry;

pub use composite::{
    AliasTable, ComponentHeader, ComponentKind, CompositeEntry, DynamicCompositeCodec,
};
pub use config::CompositeConfig;
pub use metadata::{ColumnDesc, RowsMetadataParser, TableMetadata, TableMetadataParser};
pub use prepared::{PreparedHandle, parse_prepared, parse_prepared_with};
pub use registry::{CodecRegistry, CodecTable, ColumnCodec};
