//! Domain services (business logic)

pub mod session_store;
pub mod auth_service;
pub mod session_transaction;

pub use auth_service::{AuthPolicy, AuthService};
pub use session_transaction::SessionTransaction;
