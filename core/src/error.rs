use thiserror::Error;

use crate::model::Id;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Bad or missing backend selection, or a mode policy violation
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Backend could not be reached while constructing the driver
    #[error("failed to create db driver: {source}")]
    Initialization {
        #[source]
        source: sqlx::Error,
    },
    /// A post-write invariant did not hold
    #[error("integrity error: {0}")]
    Integrity(String),
    #[error("{entity} not found: id = {id}")]
    NotFound { entity: &'static str, id: Id },
    /// Backend execution failure, attributed to the operation and entity
    #[error("failed to {op} {entity}: {source}")]
    Operation {
        op: &'static str,
        entity: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

impl StoreError {
    /// 为 `map_err` 生成带上下文的包装闭包
    ///
    /// ```rust,ignore
    /// query.execute(pool).await.map_err(StoreError::operation("create", "user"))?;
    /// ```
    pub fn operation(op: &'static str, entity: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| StoreError::Operation { op, entity, source }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
