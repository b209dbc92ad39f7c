//! # Auth Infrastructure
//! 
//! SQL implementation of the auth store and the background sweeper.

pub mod database;
pub mod sweeper;

pub use database::{create_pool, SqlAuthRepository};
pub use sweeper::spawn_sweeper;
