//! Repository traits (ports)

pub mod auth_repository;

pub use auth_repository::AuthRepository;
#[cfg(test)]
pub use auth_repository::MockAuthRepository;
