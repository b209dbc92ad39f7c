//! # Auth Core
//! 
//! Session and user entities, the repository port, and the signin/signup
//! flows that tie them together.

pub mod clock;
pub mod domain;
pub mod services;
pub mod repositories;
pub mod error;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "testing"))]
pub use clock::ManualClock;
pub use domain::*;
pub use error::DomainError;
pub use repositories::AuthRepository;
pub use services::{AuthPolicy, AuthService, SessionTransaction};
