//! 用户记录模型
//!
//! `User` 是存储层唯一的实体；`CreateUser`、`UpdateUser`、`FindUser`、`DeleteUser`
//! 分别对应四个操作的请求类型。可选字段统一使用 `Option` 表示"未提供"，
//! 不使用空字符串或 0 作为哨兵值。

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 主键 ID 类型
pub type Id = i32;

/// 表名
pub const USER_TABLE: &str = "user";

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Host,
    Admin,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Host => "HOST",
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

/// 行状态（与物理删除无关）
///
/// 排序时按字符串降序，`NORMAL` 排在 `ARCHIVED` 之前。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RowStatus {
    #[default]
    Normal,
    Archived,
}

impl RowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowStatus::Normal => "NORMAL",
            RowStatus::Archived => "ARCHIVED",
        }
    }
}

/// 无法识别的枚举字符串
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HOST" => Ok(Role::Host),
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            _ => Err(ParseEnumError {
                kind: "role",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for RowStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NORMAL" => Ok(RowStatus::Normal),
            "ARCHIVED" => Ok(RowStatus::Archived),
            _ => Err(ParseEnumError {
                kind: "row status",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for RowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 已持久化的用户记录
///
/// 时间戳为秒级 Unix 时间。`password_hash` 不参与序列化输出，`Debug` 中也会被隐藏。
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub role: Role,
    pub email: String,
    pub nickname: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub avatar_url: String,
    pub row_status: RowStatus,
    pub created_ts: i64,
    pub updated_ts: i64,
}

impl User {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created_ts, 0)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.updated_ts, 0)
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("role", &self.role)
            .field("email", &self.email)
            .field("nickname", &self.nickname)
            .field("password_hash", &"<redacted>")
            .field("avatar_url", &self.avatar_url)
            .field("row_status", &self.row_status)
            .field("created_ts", &self.created_ts)
            .field("updated_ts", &self.updated_ts)
            .finish()
    }
}

/// 创建请求
///
/// 核心字段总是写入；`id`、`row_status`、`created_ts`、`updated_ts` 为 `None` 时
/// 由数据库默认值填充，为 `Some` 时强制写入（例如数据导入）。`Some(0)` 与 `None` 等价。
#[derive(Clone, Default)]
pub struct CreateUser {
    pub username: String,
    pub role: Role,
    pub email: String,
    pub nickname: String,
    pub password_hash: String,
    pub avatar_url: String,
    pub id: Option<Id>,
    pub row_status: Option<RowStatus>,
    pub created_ts: Option<i64>,
    pub updated_ts: Option<i64>,
}

impl CreateUser {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
            ..Default::default()
        }
    }

    /// 调用方指定的 ID，0 视为未指定
    pub fn explicit_id(&self) -> Option<Id> {
        self.id.filter(|id| *id != 0)
    }

    pub fn explicit_created_ts(&self) -> Option<i64> {
        self.created_ts.filter(|ts| *ts != 0)
    }

    pub fn explicit_updated_ts(&self) -> Option<i64> {
        self.updated_ts.filter(|ts| *ts != 0)
    }
}

impl fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUser")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("id", &self.id)
            .field("row_status", &self.row_status)
            .field("created_ts", &self.created_ts)
            .field("updated_ts", &self.updated_ts)
            .finish_non_exhaustive()
    }
}

/// 导入已有记录：0 值的 ID / 时间戳视为未提供
impl From<User> for CreateUser {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            role: user.role,
            email: user.email,
            nickname: user.nickname,
            password_hash: user.password_hash,
            avatar_url: user.avatar_url,
            id: (user.id != 0).then_some(user.id),
            row_status: Some(user.row_status),
            created_ts: (user.created_ts != 0).then_some(user.created_ts),
            updated_ts: (user.updated_ts != 0).then_some(user.updated_ts),
        }
    }
}

/// 部分更新请求（Patch 语义）
///
/// - `None`：不生成 SET 子句，保留原值；
/// - `Some(v)`：更新为 `v`，包括空字符串。
///
/// `updated_ts` 不会被自动刷新，需要时调用 [`UpdateUser::touch`]。
#[derive(Clone, Default)]
pub struct UpdateUser {
    pub id: Id,
    pub updated_ts: Option<i64>,
    pub row_status: Option<RowStatus>,
    pub username: Option<String>,
    pub role: Option<Role>,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub avatar_url: Option<String>,
    pub password_hash: Option<String>,
}

impl UpdateUser {
    pub fn new(id: Id) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// 将 `updated_ts` 设置为当前时间
    pub fn touch(mut self) -> Self {
        self.updated_ts = Some(Utc::now().timestamp());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.updated_ts.is_none()
            && self.row_status.is_none()
            && self.username.is_none()
            && self.role.is_none()
            && self.email.is_none()
            && self.nickname.is_none()
            && self.avatar_url.is_none()
            && self.password_hash.is_none()
    }
}

impl fmt::Debug for UpdateUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateUser")
            .field("id", &self.id)
            .field("updated_ts", &self.updated_ts)
            .field("row_status", &self.row_status)
            .field("username", &self.username)
            .field("role", &self.role)
            .field("email", &self.email)
            .field("nickname", &self.nickname)
            .field("avatar_url", &self.avatar_url)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// 查询条件，所有字段均为精确匹配
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindUser {
    pub id: Option<Id>,
    pub username: Option<String>,
    pub role: Option<Role>,
    pub email: Option<String>,
    pub nickname: Option<String>,
}

impl FindUser {
    pub fn by_id(id: Id) -> Self {
        Self {
            id: Some(id),
            ..Default::default()
        }
    }

    pub fn by_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteUser {
    pub id: Id,
}
