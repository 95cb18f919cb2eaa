//! `user` 表的语句与行解码
//!
//! 所有函数都对方言泛型，SQLite 与 MySQL 的差异只体现在 [`Dialect`] 上。

use sqlx::{ColumnIndex, Decode, Row, Type};

use crate::builder::{BindValue, InsertBuilder, QueryBuilder, UpdateBuilder};
use crate::dialect::Dialect;
use crate::model::{CreateUser, FindUser, Id, UpdateUser, User, USER_TABLE};

/// 查询列清单，时间戳列读取为秒级时间戳并保留原列名
pub(crate) fn select_user_sql<DB: Dialect>() -> String {
    let col = DB::escape_identifier;
    format!(
        "SELECT {}, {}, {}, {}, {}, {}, {}, {} AS {}, {} AS {}, {} FROM {}",
        col("id"),
        col("username"),
        col("role"),
        col("email"),
        col("nickname"),
        col("password_hash"),
        col("avatar_url"),
        DB::unix_timestamp("created_ts"),
        col("created_ts"),
        DB::unix_timestamp("updated_ts"),
        col("updated_ts"),
        col("row_status"),
        col(USER_TABLE)
    )
}

pub(crate) fn insert_user<DB: Dialect>(create: &CreateUser) -> (String, Vec<BindValue>) {
    InsertBuilder::<DB>::new(USER_TABLE)
        .value("username", create.username.as_str())
        .value("role", create.role)
        .value("email", create.email.as_str())
        .value("nickname", create.nickname.as_str())
        .value("password_hash", create.password_hash.as_str())
        .value("avatar_url", create.avatar_url.as_str())
        .value_if("row_status", create.row_status)
        .timestamp_if("created_ts", create.explicit_created_ts())
        .timestamp_if("updated_ts", create.explicit_updated_ts())
        .value_if("id", create.explicit_id())
        .build()
}

pub(crate) fn update_user<DB: Dialect>(update: &UpdateUser) -> (String, Vec<BindValue>) {
    UpdateBuilder::<DB>::new(USER_TABLE)
        .set_timestamp_if("updated_ts", update.updated_ts)
        .set_if("row_status", update.row_status)
        .set_if("username", update.username.as_deref())
        .set_if("role", update.role)
        .set_if("email", update.email.as_deref())
        .set_if("nickname", update.nickname.as_deref())
        .set_if("avatar_url", update.avatar_url.as_deref())
        .set_if("password_hash", update.password_hash.as_deref())
        .build("id", update.id)
}

pub(crate) fn find_users<DB: Dialect>(find: &FindUser) -> (String, Vec<BindValue>) {
    QueryBuilder::<DB>::new(select_user_sql::<DB>())
        .and_eq_if("id", find.id)
        .and_eq_if("username", find.username.as_deref())
        .and_eq_if("role", find.role)
        .and_eq_if("email", find.email.as_deref())
        .and_eq_if("nickname", find.nickname.as_deref())
        .order_by("created_ts", false)
        .order_by("row_status", false)
        .build()
}

pub(crate) fn find_user_by_id<DB: Dialect>(id: Id) -> (String, Vec<BindValue>) {
    QueryBuilder::<DB>::new(select_user_sql::<DB>())
        .and_eq("id", id)
        .build()
}

pub(crate) fn delete_user<DB: Dialect>(id: Id) -> (String, Vec<BindValue>) {
    let sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        DB::escape_identifier(USER_TABLE),
        DB::escape_identifier("id"),
        DB::placeholder(0)
    );
    (sql, vec![BindValue::Int32(id)])
}

/// 将 [`select_user_sql`] 的一行解码为 `User`
pub(crate) fn user_from_row<'r, R>(row: &'r R) -> Result<User, sqlx::Error>
where
    R: Row,
    &'static str: ColumnIndex<R>,
    String: Decode<'r, R::Database> + Type<R::Database>,
    i32: Decode<'r, R::Database> + Type<R::Database>,
    i64: Decode<'r, R::Database> + Type<R::Database>,
{
    let role: String = row.try_get("role")?;
    let row_status: String = row.try_get("row_status")?;
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        role: role.parse().map_err(|e| sqlx::Error::ColumnDecode {
            index: "role".to_string(),
            source: Box::new(e),
        })?,
        email: row.try_get("email")?,
        nickname: row.try_get("nickname")?,
        password_hash: row.try_get("password_hash")?,
        avatar_url: row.try_get("avatar_url")?,
        row_status: row_status.parse().map_err(|e| sqlx::Error::ColumnDecode {
            index: "row_status".to_string(),
            source: Box::new(e),
        })?,
        created_ts: row.try_get("created_ts")?,
        updated_ts: row.try_get("updated_ts")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, RowStatus};

    #[cfg(feature = "mysql")]
    const MYSQL_SELECT: &str = "SELECT `id`, `username`, `role`, `email`, `nickname`, `password_hash`, `avatar_url`, \
        CAST(UNIX_TIMESTAMP(`created_ts`) AS SIGNED) AS `created_ts`, \
        CAST(UNIX_TIMESTAMP(`updated_ts`) AS SIGNED) AS `updated_ts`, `row_status` FROM `user`";

    #[cfg(feature = "mysql")]
    #[test]
    fn test_mysql_select_columns() {
        assert_eq!(select_user_sql::<sqlx::MySql>(), MYSQL_SELECT);
    }

    #[cfg(feature = "mysql")]
    #[test]
    fn test_mysql_insert_defaults_housekeeping_fields() {
        let (sql, binds) = insert_user::<sqlx::MySql>(&CreateUser::new("alice", "hash"));
        assert_eq!(
            sql,
            "INSERT INTO `user` (`username`, `role`, `email`, `nickname`, `password_hash`, `avatar_url`) \
             VALUES (?, ?, ?, ?, ?, ?)"
        );
        assert_eq!(binds.len(), 6);
        assert_eq!(binds[1], BindValue::String("USER".to_string()));
    }

    #[cfg(feature = "mysql")]
    #[test]
    fn test_mysql_insert_explicit_housekeeping_fields() {
        let create = CreateUser {
            id: Some(100),
            row_status: Some(RowStatus::Archived),
            created_ts: Some(1),
            updated_ts: Some(2),
            ..CreateUser::new("alice", "hash")
        };
        let (sql, binds) = insert_user::<sqlx::MySql>(&create);
        assert!(sql.ends_with(
            "(`username`, `role`, `email`, `nickname`, `password_hash`, `avatar_url`, \
             `row_status`, `created_ts`, `updated_ts`, `id`) \
             VALUES (?, ?, ?, ?, ?, ?, ?, FROM_UNIXTIME(?), FROM_UNIXTIME(?), ?)"
        ));
        assert_eq!(
            &binds[6..],
            &[
                BindValue::String("ARCHIVED".to_string()),
                BindValue::Int64(1),
                BindValue::Int64(2),
                BindValue::Int32(100)
            ]
        );
    }

    #[cfg(feature = "mysql")]
    #[test]
    fn test_mysql_insert_zero_housekeeping_fields_use_defaults() {
        let create = CreateUser {
            id: Some(0),
            created_ts: Some(0),
            updated_ts: Some(0),
            ..CreateUser::new("alice", "hash")
        };
        let (sql, binds) = insert_user::<sqlx::MySql>(&create);
        assert!(sql.ends_with(
            "(`username`, `role`, `email`, `nickname`, `password_hash`, `avatar_url`) \
             VALUES (?, ?, ?, ?, ?, ?)"
        ));
        assert_eq!(binds.len(), 6);
    }

    #[cfg(feature = "mysql")]
    #[test]
    fn test_mysql_update_sparse_fields() {
        let update = UpdateUser {
            nickname: Some("Al".to_string()),
            role: Some(Role::Admin),
            ..UpdateUser::new(5)
        };
        let (sql, binds) = update_user::<sqlx::MySql>(&update);
        assert_eq!(
            sql,
            "UPDATE `user` SET `role` = ?, `nickname` = ? WHERE `id` = ?"
        );
        assert_eq!(
            binds,
            vec![
                BindValue::String("ADMIN".to_string()),
                BindValue::String("Al".to_string()),
                BindValue::Int32(5)
            ]
        );
    }

    #[cfg(feature = "mysql")]
    #[test]
    fn test_mysql_find_users_with_filters() {
        let find = FindUser {
            username: Some("alice".to_string()),
            role: Some(Role::Host),
            ..Default::default()
        };
        let (sql, binds) = find_users::<sqlx::MySql>(&find);
        assert_eq!(
            sql,
            format!(
                "{} WHERE 1 = 1 AND `username` = ? AND `role` = ? ORDER BY `created_ts` DESC, `row_status` DESC",
                MYSQL_SELECT
            )
        );
        assert_eq!(binds.len(), 2);
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_sqlite_point_read_and_delete() {
        let (sql, binds) = find_user_by_id::<sqlx::Sqlite>(3);
        assert!(sql.starts_with("SELECT \"id\", \"username\""));
        assert!(sql.contains("CAST(strftime('%s', \"created_ts\") AS INTEGER) AS \"created_ts\""));
        assert!(sql.ends_with("FROM \"user\" WHERE 1 = 1 AND \"id\" = ?"));
        assert_eq!(binds, vec![BindValue::Int32(3)]);

        let (sql, binds) = delete_user::<sqlx::Sqlite>(3);
        assert_eq!(sql, "DELETE FROM \"user\" WHERE \"id\" = ?");
        assert_eq!(binds, vec![BindValue::Int32(3)]);
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn test_sqlite_empty_update_keeps_row() {
        let (sql, _) = update_user::<sqlx::Sqlite>(&UpdateUser::new(1));
        assert_eq!(sql, "UPDATE \"user\" SET \"id\" = \"id\" WHERE \"id\" = ?");
    }
}
