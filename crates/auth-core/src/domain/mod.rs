//! # Auth Core - Domain Module
//! 
//! Entities persisted by the auth store.

pub mod session;
pub mod user;
pub mod invite;

pub use session::Session;
pub use user::{Permission, User};
pub use invite::InviteToken;
