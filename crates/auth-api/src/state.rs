use std::sync::Arc;

use auth_core::AuthService;
use auth_infrastructure::SqlAuthRepository;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService<SqlAuthRepository>>,
    /// Mark the session cookie `Secure`. Off only for plain-HTTP development.
    pub cookie_secure: bool,
}
