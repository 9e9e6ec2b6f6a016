//! prepared 响应解析。
//!
//! # 教案式说明
//! - **意图（Why）**：`PREPARED` 结果由不透明的语句 id 与绑定变量元数据组成，语句缓存凭 id
//!   执行语句、凭元数据编码参数。
//! - **契约（What）**：
//!   - 布局：`[short bytes] query_id` 后紧跟元数据，元数据交给 [`TableMetadataParser`]；
//!   - 声明长度为负或超出剩余缓冲时返回协议违例，绝不截断读取；
//!   - 解析器无状态、可重入；结果句柄的释放由持有它的语句缓存负责。

use bytes::Bytes;
use cql_core::{BeReader, Result};
use tracing::debug;

use crate::metadata::{RowsMetadataParser, TableMetadata, TableMetadataParser};

/// prepared 语句句柄。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedHandle {
    /// 服务端分配的语句 id，对客户端不透明。
    pub query_id: Bytes,
    /// 绑定变量元数据。
    pub metadata: TableMetadata,
}

impl PreparedHandle {
    /// 十六进制形式的语句 id，便于日志与诊断。
    #[must_use]
    pub fn query_id_hex(&self) -> String {
        hex::encode(&self.query_id)
    }
}

/// 使用默认的 rows 元数据布局解析 prepared 响应。
pub fn parse_prepared(reader: &mut BeReader) -> Result<PreparedHandle> {
    parse_prepared_with(reader, &RowsMetadataParser)
}

/// 使用指定的元数据解析器解析 prepared 响应。
pub fn parse_prepared_with<P>(reader: &mut BeReader, parser: &P) -> Result<PreparedHandle>
where
    P: TableMetadataParser + ?Sized,
{
    let query_id = reader.read_short_bytes("prepared query id")?;
    let metadata = parser.parse(reader)?;
    debug!(
        target: "cql_codec::prepared",
        query_id_len = query_id.len(),
        bound_columns = metadata.columns.len(),
        "parsed prepared response"
    );
    Ok(PreparedHandle { query_id, metadata })
}
