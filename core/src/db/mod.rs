//! 后端实现
//!
//! 每个后端各自持有连接池并执行语句；语句文本由 [`statements`] 按方言生成。

pub(crate) mod statements;

#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "sqlite")]
pub mod sqlite;
