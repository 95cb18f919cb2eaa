use std::fmt;

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::model::{CreateUser, DeleteUser, FindUser, UpdateUser, User};
use crate::profile::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    MySql,
}

impl Backend {
    /// 生产模式下唯一允许的后端
    pub const PRIMARY: Backend = Backend::Sqlite;

    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "sqlite" => Ok(Backend::Sqlite),
            "mysql" => Ok(Backend::MySql),
            _ => Err(StoreError::Configuration(format!(
                "unknown db driver: {:?}",
                name
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Sqlite => "sqlite",
            Backend::MySql => "mysql",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 存储驱动 trait
///
/// 每个后端各自实现，绑定一个连接池；连接池本身可并发使用，此层不额外加锁。
/// 写操作之后总是按 ID 重新读取记录，返回包含数据库默认值的完整结果。
#[async_trait]
pub trait Driver: Send + Sync {
    fn backend(&self) -> Backend;

    /// 创建 `user` 表（如不存在）
    async fn migrate(&self) -> Result<()>;

    /// 插入记录，然后通过 [`Driver::list_users`] 按新 ID 重新读取
    ///
    /// 重新读取的结果不是恰好一行时返回 `StoreError::Integrity`。
    async fn create_user(&self, create: &CreateUser) -> Result<User>;

    /// 只更新提供了的字段，然后按 ID 点查；ID 不存在时返回 `StoreError::NotFound`
    async fn update_user(&self, update: &UpdateUser) -> Result<User>;

    /// 按创建时间降序、行状态降序返回全部匹配记录
    async fn list_users(&self, find: &FindUser) -> Result<Vec<User>>;

    async fn get_user(&self, find: &FindUser) -> Result<Option<User>> {
        Ok(self.list_users(find).await?.into_iter().next())
    }

    /// 物理删除，返回受影响的行数
    async fn hard_delete_user(&self, delete: &DeleteUser) -> Result<u64>;

    /// 整理存储空间
    async fn vacuum(&self) -> Result<()>;

    /// 删除记录并整理存储
    ///
    /// ID 不存在时视为成功；整理失败时整个删除返回该错误。
    async fn delete_user(&self, delete: &DeleteUser) -> Result<()> {
        let rows_affected = self.hard_delete_user(delete).await?;
        tracing::debug!(id = delete.id, rows_affected, "deleted user");
        self.vacuum().await
    }

    async fn close(&self);
}

/// 根据配置创建驱动
///
/// 生产模式只允许主后端，该检查发生在任何连接尝试之前。
/// 连接失败包装为 `StoreError::Initialization`，不重试。
pub async fn new_driver(profile: &Profile) -> Result<Box<dyn Driver>> {
    if profile.is_prod() && profile.driver != Backend::PRIMARY.name() {
        return Err(StoreError::Configuration(format!(
            "only {} is supported in prod mode",
            Backend::PRIMARY
        )));
    }

    let backend = Backend::from_name(&profile.driver)?;
    tracing::info!(mode = %profile.mode, %backend, "creating db driver");

    let driver: Box<dyn Driver> = match backend {
        #[cfg(feature = "sqlite")]
        Backend::Sqlite => Box::new(
            crate::db::sqlite::SqliteDriver::new(profile)
                .await
                .map_err(|source| StoreError::Initialization { source })?,
        ),
        #[cfg(feature = "mysql")]
        Backend::MySql => Box::new(
            crate::db::mysql::MySqlDriver::new(profile)
                .await
                .map_err(|source| StoreError::Initialization { source })?,
        ),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(StoreError::Configuration(format!(
                "{} support is not compiled in",
                backend
            )))
        }
    };
    Ok(driver)
}
