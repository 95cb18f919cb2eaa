//! Update Builder - 只为提供了的字段生成 SET 子句

use std::marker::PhantomData;

use super::BindValue;
use crate::dialect::Dialect;

/// Update Builder（Patch 语义）
///
/// 主键条件总是追加在 SET 绑定值之后。
pub struct UpdateBuilder<DB: Dialect> {
    table: String,
    set_parts: Vec<String>,
    binds: Vec<BindValue>,
    _db: PhantomData<DB>,
}

impl<DB: Dialect> UpdateBuilder<DB> {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            set_parts: Vec::new(),
            binds: Vec::new(),
            _db: PhantomData,
        }
    }

    /// 值为 `Some` 时生成 `col = ?`
    pub fn set_if<V: Into<BindValue>>(mut self, column: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            let placeholder = DB::placeholder(self.binds.len());
            self.push(column, placeholder, v.into());
        }
        self
    }

    /// 值为 `Some` 时生成 `col = <日期时间转换>(?)`
    pub fn set_timestamp_if(mut self, column: &str, epoch_secs: Option<i64>) -> Self {
        if let Some(ts) = epoch_secs {
            let placeholder = DB::from_unix_time(&DB::placeholder(self.binds.len()));
            self.push(column, placeholder, BindValue::Int64(ts));
        }
        self
    }

    fn push(&mut self, column: &str, placeholder: String, value: BindValue) {
        self.set_parts
            .push(format!("{} = {}", DB::escape_identifier(column), placeholder));
        self.binds.push(value);
    }

    /// 生成按主键更新的语句
    ///
    /// 没有任何字段时生成 `SET pk = pk`：语句仍然合法，且不修改任何列。
    pub fn build(self, pk: &str, id: impl Into<BindValue>) -> (String, Vec<BindValue>) {
        let escaped_pk = DB::escape_identifier(pk);
        let set_clause = if self.set_parts.is_empty() {
            format!("{} = {}", escaped_pk, escaped_pk)
        } else {
            self.set_parts.join(", ")
        };
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = {}",
            DB::escape_identifier(&self.table),
            set_clause,
            escaped_pk,
            DB::placeholder(self.binds.len())
        );
        let mut binds = self.binds;
        binds.push(id.into());
        (sql, binds)
    }
}
