//! # Auth Security
//! 
//! Security primitives: bearer tokens, password hashing, session ids.

pub mod token;
pub mod password;
pub mod snowflake;

pub use password::{PasswordError, PasswordService};
pub use snowflake::{SnowflakeError, SnowflakeGenerator};
pub use token::{generate_token, TokenError};
