//! SQL 方言抽象层
//!
//! 提供统一的接口来访问不同数据库的语法差异，如占位符、标识符转义、
//! Unix 时间戳与原生日期时间类型之间的转换等。

use crate::driver::Backend;
use sqlx::Database;

/// SQL 方言 trait
///
/// 每个启用的数据库类型（`sqlx::Sqlite`, `sqlx::MySql`）都实现此 trait，
/// 语句构建器据此生成对应后端的 SQL 文本。
pub trait Dialect: Database {
    /// 对应的后端
    fn backend() -> Backend;

    /// 获取占位符字符串
    ///
    /// # 参数
    ///
    /// * `index` - 占位符的索引（从 0 开始）
    ///
    /// SQLite 与 MySQL 都使用 `"?"`，不依赖索引。
    fn placeholder(index: usize) -> String;

    /// 转义 SQL 标识符（表名、列名等）
    ///
    /// * MySQL: `` `name` ``
    /// * SQLite: `"name"`
    fn escape_identifier(name: &str) -> String;

    /// 把绑定的秒级时间戳占位符包装成原生日期时间表达式（写入时使用）
    ///
    /// ```rust,ignore
    /// assert_eq!(<sqlx::MySql as Dialect>::from_unix_time("?"), "FROM_UNIXTIME(?)");
    /// ```
    fn from_unix_time(placeholder: &str) -> String;

    /// 把日期时间列读取为秒级时间戳（查询时使用）
    fn unix_timestamp(column: &str) -> String;

    /// 删除后执行的整理语句
    fn vacuum_sql(table: &str) -> String;
}

// ========== SQLite 实现 ==========

#[cfg(feature = "sqlite")]
impl Dialect for sqlx::Sqlite {
    fn backend() -> Backend {
        Backend::Sqlite
    }

    fn placeholder(_index: usize) -> String {
        "?".to_string()
    }

    fn escape_identifier(name: &str) -> String {
        format!("\"{}\"", name)
    }

    fn from_unix_time(placeholder: &str) -> String {
        format!("datetime({}, 'unixepoch')", placeholder)
    }

    fn unix_timestamp(column: &str) -> String {
        format!(
            "CAST(strftime('%s', {}) AS INTEGER)",
            Self::escape_identifier(column)
        )
    }

    fn vacuum_sql(_table: &str) -> String {
        // SQLite 只能整理整个数据库文件
        "VACUUM".to_string()
    }
}

// ========== MySQL 实现 ==========

#[cfg(feature = "mysql")]
impl Dialect for sqlx::MySql {
    fn backend() -> Backend {
        Backend::MySql
    }

    fn placeholder(_index: usize) -> String {
        "?".to_string()
    }

    fn escape_identifier(name: &str) -> String {
        format!("`{}`", name)
    }

    fn from_unix_time(placeholder: &str) -> String {
        format!("FROM_UNIXTIME({})", placeholder)
    }

    fn unix_timestamp(column: &str) -> String {
        format!(
            "CAST(UNIX_TIMESTAMP({}) AS SIGNED)",
            Self::escape_identifier(column)
        )
    }

    fn vacuum_sql(table: &str) -> String {
        format!("OPTIMIZE TABLE {}", Self::escape_identifier(table))
    }
}
