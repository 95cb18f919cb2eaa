//! 驱动配置
//!
//! 由上层应用以编程方式构造（或通过 serde / 环境变量加载），存储层只读取。

use serde::Deserialize;

use crate::error::{Result, StoreError};

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

#[derive(Clone, Deserialize)]
pub struct Profile {
    /// 运行模式：`prod`（或 `production`）、`dev`、`demo` 等
    pub mode: String,
    /// 后端名称：`sqlite` 或 `mysql`
    pub driver: String,
    /// 连接串，可能包含凭据
    pub dsn: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Profile {
    pub fn new(mode: impl Into<String>, driver: impl Into<String>, dsn: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            driver: driver.into(),
            dsn: dsn.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// 从 `USERSTORE_*` 环境变量读取配置
    pub fn from_env() -> Result<Self> {
        let mode = std::env::var("USERSTORE_MODE").unwrap_or_else(|_| "dev".to_string());
        let driver = std::env::var("USERSTORE_DRIVER").unwrap_or_else(|_| "sqlite".to_string());
        let dsn = std::env::var("USERSTORE_DSN")
            .map_err(|_| StoreError::Configuration("USERSTORE_DSN is not set".to_string()))?;
        let max_connections = match std::env::var("USERSTORE_MAX_CONNECTIONS") {
            Ok(v) => v.parse::<u32>().map_err(|_| {
                StoreError::Configuration(format!("invalid USERSTORE_MAX_CONNECTIONS: {}", v))
            })?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };
        Ok(Self {
            mode,
            driver,
            dsn,
            max_connections,
        })
    }

    pub fn is_prod(&self) -> bool {
        matches!(self.mode.as_str(), "prod" | "production")
    }
}

// dsn 不输出
impl std::fmt::Debug for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("mode", &self.mode)
            .field("driver", &self.driver)
            .field("max_connections", &self.max_connections)
            .finish_non_exhaustive()
    }
}
