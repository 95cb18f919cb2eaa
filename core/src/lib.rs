pub mod builder;
pub mod db;
pub mod dialect;
pub mod driver;
pub mod error;
pub mod model;
pub mod profile;

pub use builder::{BindValue, InsertBuilder, QueryBuilder, UpdateBuilder};
#[cfg(feature = "mysql")]
pub use db::mysql::MySqlDriver;
#[cfg(feature = "sqlite")]
pub use db::sqlite::SqliteDriver;
pub use dialect::Dialect;
pub use driver::{new_driver, Backend, Driver};
pub use error::{Result, StoreError};
pub use model::{CreateUser, DeleteUser, FindUser, Id, Role, RowStatus, UpdateUser, User};
pub use profile::Profile;
