//! Insert Builder - 按字段是否提供动态生成列清单

use std::marker::PhantomData;

use super::BindValue;
use crate::dialect::Dialect;

/// Insert Builder
///
/// 逐个累积 (列, 占位符, 参数) 三元组。`*_if` 方法只在值为 `Some` 时追加列，
/// 未追加的列由数据库默认值填充。
pub struct InsertBuilder<DB: Dialect> {
    table: String,
    columns: Vec<String>,
    placeholders: Vec<String>,
    binds: Vec<BindValue>,
    _db: PhantomData<DB>,
}

impl<DB: Dialect> InsertBuilder<DB> {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            placeholders: Vec::new(),
            binds: Vec::new(),
            _db: PhantomData,
        }
    }

    /// 追加一列（总是写入）
    pub fn value(mut self, column: &str, value: impl Into<BindValue>) -> Self {
        let placeholder = DB::placeholder(self.binds.len());
        self.push(column, placeholder, value.into());
        self
    }

    /// 值为 `Some` 时追加一列
    pub fn value_if<V: Into<BindValue>>(self, column: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.value(column, v),
            None => self,
        }
    }

    /// 值为 `Some` 时追加时间戳列，占位符包装为方言的日期时间转换表达式
    pub fn timestamp_if(mut self, column: &str, epoch_secs: Option<i64>) -> Self {
        if let Some(ts) = epoch_secs {
            let placeholder = DB::from_unix_time(&DB::placeholder(self.binds.len()));
            self.push(column, placeholder, BindValue::Int64(ts));
        }
        self
    }

    fn push(&mut self, column: &str, placeholder: String, value: BindValue) {
        self.columns.push(DB::escape_identifier(column));
        self.placeholders.push(placeholder);
        self.binds.push(value);
    }

    /// 生成 `INSERT` 语句与按顺序排列的绑定值
    pub fn build(self) -> (String, Vec<BindValue>) {
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            DB::escape_identifier(&self.table),
            self.columns.join(", "),
            self.placeholders.join(", ")
        );
        (sql, self.binds)
    }
}
