use std::marker::PhantomData;

use super::BindValue;
use crate::dialect::Dialect;

/// 查询构建器，使用绑定参数而非字符串拼接
///
/// WHERE 子句以恒真条件 `1 = 1` 开头，之后的每个等值条件都用 AND 连接，
/// 因此没有条件时等价于查询全部。
pub struct QueryBuilder<DB: Dialect> {
    base_sql: String,
    conditions: Vec<String>,
    order_by: Vec<(String, bool)>, // (field, ascending)
    binds: Vec<BindValue>,
    _db: PhantomData<DB>,
}

impl<DB: Dialect> QueryBuilder<DB> {
    pub fn new(base_sql: impl Into<String>) -> Self {
        Self {
            base_sql: base_sql.into(),
            conditions: Vec::new(),
            order_by: Vec::new(),
            binds: Vec::new(),
            _db: PhantomData,
        }
    }

    pub fn and_eq(mut self, field: &str, value: impl Into<BindValue>) -> Self {
        self.conditions.push(format!(
            "{} = {}",
            DB::escape_identifier(field),
            DB::placeholder(self.binds.len())
        ));
        self.binds.push(value.into());
        self
    }

    /// 值为 `Some` 时追加等值条件
    pub fn and_eq_if<V: Into<BindValue>>(self, field: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.and_eq(field, v),
            None => self,
        }
    }

    pub fn order_by(mut self, field: &str, ascending: bool) -> Self {
        self.order_by.push((field.to_string(), ascending));
        self
    }

    pub fn build(self) -> (String, Vec<BindValue>) {
        let mut sql = self.base_sql;
        sql.push_str(" WHERE 1 = 1");
        for condition in &self.conditions {
            sql.push_str(" AND ");
            sql.push_str(condition);
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            for (i, (field, ascending)) in self.order_by.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(&DB::escape_identifier(field));
                if !ascending {
                    sql.push_str(" DESC");
                }
            }
        }

        (sql, self.binds)
    }
}
