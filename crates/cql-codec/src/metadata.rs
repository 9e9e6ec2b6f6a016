//! 结果集 / 绑定变量元数据解析。
//!
//! # 教案式说明
//! - **意图（Why）**：prepared 响应与 rows 结果共用同一种元数据布局；把解析抽象为
//!   [`TableMetadataParser`]，prepared 解析器只依赖该能力，测试或上层可替换实现。
//! - **契约（What）**：
//!   - 布局：`[int flags][int column_count]`，随后依 flags 出现分页状态、全局表信息与逐列描述；
//!   - `0x0001` 全局表信息 `[string keyspace][string table]`，此时各列不再单独携带；
//!   - `0x0002` 还有后续页，紧跟 `[bytes]` 分页状态；
//!   - `0x0004` 不含列描述，`columns` 为空但 `column_count` 保留服务端给出的值；
//!   - 负的列数属于协议违例。

use bytes::Bytes;
use cql_core::{BeReader, CqlError, Result, TypeSpec};

/// 全局表信息标志位。
pub const FLAG_GLOBAL_TABLES_SPEC: i32 = 0x0001;
/// 存在后续页标志位。
pub const FLAG_HAS_MORE_PAGES: i32 = 0x0002;
/// 无列描述标志位。
pub const FLAG_NO_METADATA: i32 = 0x0004;

/// 单列描述。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnDesc {
    /// 所属 keyspace。
    pub keyspace: String,
    /// 所属表。
    pub table: String,
    /// 列名。
    pub name: String,
    /// 列类型。
    pub spec: TypeSpec,
}

/// 一组列的元数据。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TableMetadata {
    /// 原始 flags。
    pub flags: i32,
    /// 服务端声明的列数。
    pub column_count: usize,
    /// 分页状态，仅在还有后续页时出现。
    pub paging_state: Option<Bytes>,
    /// 列描述；带 `FLAG_NO_METADATA` 时为空。
    pub columns: Vec<ColumnDesc>,
}

impl TableMetadata {
    /// 是否还有后续页。
    #[must_use]
    pub fn has_more_pages(&self) -> bool {
        self.flags & FLAG_HAS_MORE_PAGES != 0
    }

    /// 按列名查找。
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDesc> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// 元数据解析能力。
pub trait TableMetadataParser {
    /// 从读取器当前位置解析一段元数据，并消费对应字节。
    fn parse(&self, reader: &mut BeReader) -> Result<TableMetadata>;
}

impl<P: TableMetadataParser + ?Sized> TableMetadataParser for &P {
    fn parse(&self, reader: &mut BeReader) -> Result<TableMetadata> {
        (**self).parse(reader)
    }
}

/// 原生协议 v1/v2 的 rows 元数据布局。
#[derive(Clone, Copy, Debug, Default)]
pub struct RowsMetadataParser;

impl TableMetadataParser for RowsMetadataParser {
    fn parse(&self, reader: &mut BeReader) -> Result<TableMetadata> {
        let flags = reader.read_i32("metadata flags")?;
        let declared = reader.read_i32("metadata column count")?;
        let column_count = usize::try_from(declared).map_err(|_| {
            CqlError::protocol("metadata column count", format!("negative count {declared}"))
        })?;

        let paging_state = if flags & FLAG_HAS_MORE_PAGES != 0 {
            reader.read_nullable_bytes("metadata paging state")?
        } else {
            None
        };

        if flags & FLAG_NO_METADATA != 0 {
            return Ok(TableMetadata {
                flags,
                column_count,
                paging_state,
                columns: Vec::new(),
            });
        }

        let global = if flags & FLAG_GLOBAL_TABLES_SPEC != 0 {
            let keyspace = reader.read_string("metadata keyspace")?;
            let table = reader.read_string("metadata table")?;
            Some((keyspace, table))
        } else {
            None
        };

        // 每列至少 4 字节（两个空 `[string]`），以剩余长度约束预分配。
        let mut columns = Vec::with_capacity(column_count.min(reader.remaining() / 4));
        for _ in 0..column_count {
            let (keyspace, table) = match &global {
                Some((keyspace, table)) => (keyspace.clone(), table.clone()),
                None => (
                    reader.read_string("column keyspace")?,
                    reader.read_string("column table")?,
                ),
            };
            let name = reader.read_string("column name")?;
            let spec = TypeSpec::read_option(reader)?;
            columns.push(ColumnDesc {
                keyspace,
                table,
                name,
                spec,
            });
        }

        Ok(TableMetadata {
            flags,
            column_count,
            paging_state,
            columns,
        })
    }
}
