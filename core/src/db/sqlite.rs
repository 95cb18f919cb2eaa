//! SQLite 后端（主后端）

use std::str::FromStr;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use sqlx::Sqlite;

use super::statements;
use crate::builder::bind_values;
use crate::dialect::Dialect;
use crate::driver::{Backend, Driver};
use crate::error::{Result, StoreError};
use crate::model::{CreateUser, DeleteUser, FindUser, Id, UpdateUser, User, USER_TABLE};
use crate::profile::Profile;

/// 时间戳列为原生 DATETIME，读写时通过 strftime / datetime 与秒级时间戳互转
const SCHEMA: &str = r#"CREATE TABLE IF NOT EXISTS "user" (
  "id" INTEGER PRIMARY KEY AUTOINCREMENT,
  "created_ts" DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
  "updated_ts" DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
  "row_status" TEXT NOT NULL CHECK ("row_status" IN ('NORMAL', 'ARCHIVED')) DEFAULT 'NORMAL',
  "username" TEXT NOT NULL UNIQUE,
  "role" TEXT NOT NULL CHECK ("role" IN ('HOST', 'ADMIN', 'USER')) DEFAULT 'USER',
  "email" TEXT NOT NULL DEFAULT '',
  "nickname" TEXT NOT NULL DEFAULT '',
  "password_hash" TEXT NOT NULL,
  "avatar_url" TEXT NOT NULL DEFAULT ''
)"#;

#[derive(Clone)]
pub struct SqliteDriver {
    pool: SqlitePool,
}

impl std::fmt::Debug for SqliteDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDriver").finish_non_exhaustive()
    }
}

impl SqliteDriver {
    /// 打开（必要时创建）数据库文件
    ///
    /// DSN 可以是 `sqlite:path/to/db`、`sqlite://path` 或普通文件路径。
    pub async fn new(profile: &Profile) -> std::result::Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(&profile.dsn)?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(profile.max_connections)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn find_by_id(&self, id: Id) -> Result<Option<User>> {
        let (sql, binds) = statements::find_user_by_id::<Sqlite>(id);
        tracing::debug!(%sql, "get user");
        let row = bind_values(sqlx::query::<Sqlite>(&sql), binds)
            .fetch_optional(&self.pool)
            .await
            .map_err(StoreError::operation("get", "user"))?;
        row.map(|row| statements::user_from_row(&row))
            .transpose()
            .map_err(StoreError::operation("get", "user"))
    }
}

#[async_trait]
impl Driver for SqliteDriver {
    fn backend(&self) -> Backend {
        <Sqlite as Dialect>::backend()
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(StoreError::operation("migrate", "user"))?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(username = %create.username))]
    async fn create_user(&self, create: &CreateUser) -> Result<User> {
        let (sql, binds) = statements::insert_user::<Sqlite>(create);
        tracing::debug!(%sql, "insert user");
        let result = bind_values(sqlx::query::<Sqlite>(&sql), binds)
            .execute(&self.pool)
            .await
            .map_err(StoreError::operation("create", "user"))?;

        let id = match create.explicit_id() {
            Some(id) => id,
            None => {
                let rowid = result.last_insert_rowid();
                Id::try_from(rowid).map_err(|_| {
                    StoreError::Integrity(format!("last insert id out of range: {}", rowid))
                })?
            }
        };

        let list = self.list_users(&FindUser::by_id(id)).await?;
        match <[User; 1]>::try_from(list) {
            Ok([user]) => Ok(user),
            Err(list) => Err(StoreError::Integrity(format!(
                "unexpected user count: {}",
                list.len()
            ))),
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(id = update.id))]
    async fn update_user(&self, update: &UpdateUser) -> Result<User> {
        let (sql, binds) = statements::update_user::<Sqlite>(update);
        tracing::debug!(%sql, empty = update.is_empty(), "update user");
        bind_values(sqlx::query::<Sqlite>(&sql), binds)
            .execute(&self.pool)
            .await
            .map_err(StoreError::operation("update", "user"))?;

        self.find_by_id(update.id)
            .await?
            .ok_or(StoreError::NotFound {
                entity: "user",
                id: update.id,
            })
    }

    async fn list_users(&self, find: &FindUser) -> Result<Vec<User>> {
        let (sql, binds) = statements::find_users::<Sqlite>(find);
        tracing::debug!(%sql, "list users");

        // 游标随 rows 一起释放，包括出错提前返回的路径
        let mut rows = bind_values(sqlx::query::<Sqlite>(&sql), binds).fetch(&self.pool);
        let mut list = Vec::new();
        while let Some(row) = rows
            .try_next()
            .await
            .map_err(StoreError::operation("list", "user"))?
        {
            let user =
                statements::user_from_row(&row).map_err(StoreError::operation("list", "user"))?;
            list.push(user);
        }
        Ok(list)
    }

    async fn hard_delete_user(&self, delete: &DeleteUser) -> Result<u64> {
        let (sql, binds) = statements::delete_user::<Sqlite>(delete.id);
        tracing::debug!(%sql, "delete user");
        let result = bind_values(sqlx::query::<Sqlite>(&sql), binds)
            .execute(&self.pool)
            .await
            .map_err(StoreError::operation("delete", "user"))?;
        Ok(result.rows_affected())
    }

    async fn vacuum(&self) -> Result<()> {
        let sql = <Sqlite as Dialect>::vacuum_sql(USER_TABLE);
        tracing::debug!(%sql, "vacuum");
        sqlx::raw_sql(&sql)
            .execute(&self.pool)
            .await
            .map_err(StoreError::operation("vacuum", "user"))?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open(dir: &tempfile::TempDir) -> SqliteDriver {
        let dsn = format!("sqlite://{}", dir.path().join("store.db").display());
        let driver = SqliteDriver::new(&Profile::new("dev", "sqlite", dsn))
            .await
            .unwrap();
        driver.migrate().await.unwrap();
        driver
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let driver = open(&dir).await;
        driver.migrate().await.unwrap();
        assert_eq!(driver.backend(), Backend::Sqlite);

        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'user'",
        )
        .fetch_one(driver.pool())
        .await
        .unwrap();
        assert_eq!(row.0, 1);
        driver.close().await;
    }

    #[tokio::test]
    async fn test_unknown_stored_role_is_operation_error() {
        let dir = tempfile::tempdir().unwrap();
        let driver = open(&dir).await;
        let user = driver
            .create_user(&CreateUser::new("eve", "hash"))
            .await
            .unwrap();

        // 绕过 CHECK 约束写入非法值
        let mut conn = driver.pool().acquire().await.unwrap();
        sqlx::query("PRAGMA ignore_check_constraints = ON")
            .execute(&mut *conn)
            .await
            .unwrap();
        sqlx::query("UPDATE \"user\" SET \"role\" = 'ROOT' WHERE \"id\" = ?")
            .bind(user.id)
            .execute(&mut *conn)
            .await
            .unwrap();
        drop(conn);

        let err = driver.list_users(&FindUser::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Operation { op: "list", .. }));
    }

    #[tokio::test]
    async fn test_last_insert_rowid_is_reread() {
        let dir = tempfile::tempdir().unwrap();
        let driver = open(&dir).await;
        let first = driver
            .create_user(&CreateUser::new("a", "hash"))
            .await
            .unwrap();
        let second = driver
            .create_user(&CreateUser::new("b", "hash"))
            .await
            .unwrap();
        assert!(second.id > first.id);
        assert_eq!(second.username, "b");
    }
}
