//! 语句构建器模块
//!
//! 提供 InsertBuilder、UpdateBuilder 和 QueryBuilder，按字段是否提供动态生成
//! 带绑定参数的 SQL。方言差异（占位符、时间戳转换）由 [`Dialect`](crate::dialect::Dialect) 决定。

pub mod insert_builder;
pub mod query_builder;
pub mod update_builder;

pub use insert_builder::InsertBuilder;
pub use query_builder::QueryBuilder;
pub use update_builder::UpdateBuilder;

use sqlx::Database;

/// 绑定值，用于安全地传递参数
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    String(String),
    Int32(i32),
    Int64(i64),
}

impl From<String> for BindValue {
    fn from(s: String) -> Self {
        BindValue::String(s)
    }
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        BindValue::String(s.to_string())
    }
}

impl From<i32> for BindValue {
    fn from(i: i32) -> Self {
        BindValue::Int32(i)
    }
}

impl From<i64> for BindValue {
    fn from(i: i64) -> Self {
        BindValue::Int64(i)
    }
}

impl From<crate::model::Role> for BindValue {
    fn from(role: crate::model::Role) -> Self {
        BindValue::String(role.as_str().to_string())
    }
}

impl From<crate::model::RowStatus> for BindValue {
    fn from(status: crate::model::RowStatus) -> Self {
        BindValue::String(status.as_str().to_string())
    }
}

/// 将绑定值按顺序应用到查询中
pub fn bind_values<'q, DB>(
    mut query: sqlx::query::Query<'q, DB, <DB as Database>::Arguments<'q>>,
    binds: Vec<BindValue>,
) -> sqlx::query::Query<'q, DB, <DB as Database>::Arguments<'q>>
where
    DB: Database,
    String: sqlx::Type<DB> + sqlx::Encode<'q, DB>,
    i32: sqlx::Type<DB> + sqlx::Encode<'q, DB>,
    i64: sqlx::Type<DB> + sqlx::Encode<'q, DB>,
{
    for bind in binds {
        query = match bind {
            BindValue::String(s) => query.bind(s),
            BindValue::Int32(i) => query.bind(i),
            BindValue::Int64(i) => query.bind(i),
        };
    }
    query
}
