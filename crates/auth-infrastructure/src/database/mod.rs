//! Database module (sqlx adapters)

pub mod connection;
pub mod schema;
pub mod sql;

pub use connection::create_pool;
pub use sql::SqlAuthRepository;
