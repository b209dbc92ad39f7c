//! User domain entity

use std::fmt;

use auth_security::PasswordService;

use crate::error::DomainError;

/// Permission tiers, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Permission {
    Guest,
    /// Tier granted by signup.
    #[default]
    Normal,
    Trusted,
    Admin,
    Owner,
}

impl Permission {
    pub fn as_i64(&self) -> i64 {
        match self {
            Permission::Guest => 0,
            Permission::Normal => 1,
            Permission::Trusted => 2,
            Permission::Admin => 3,
            Permission::Owner => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Guest => "guest",
            Permission::Normal => "normal",
            Permission::Trusted => "trusted",
            Permission::Admin => "admin",
            Permission::Owner => "owner",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct User {
    pub username: String,
    /// Argon2 PHC string.
    pub passhash: String,
    pub permission: Permission,
}

impl User {
    /// Build a user, hashing `password` with a fresh salt.
    pub fn new(username: &str, password: &str, permission: Permission) -> Result<Self, DomainError> {
        Ok(Self {
            username: username.to_string(),
            passhash: PasswordService::hash(password)?,
            permission,
        })
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("passhash", &"[REDACTED]")
            .field("permission", &self.permission)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_storage_and_order() {
        let tiers = [
            Permission::Guest,
            Permission::Normal,
            Permission::Trusted,
            Permission::Admin,
            Permission::Owner,
        ];
        for (i, p) in tiers.iter().enumerate() {
            assert_eq!(p.as_i64(), i as i64);
        }
        assert!(Permission::Owner > Permission::Admin);
        assert_eq!(Permission::default(), Permission::Normal);
    }

    #[test]
    fn test_new_user_hashes_password() {
        let user = User::new("bob", "s3cret-pass", Permission::Normal).unwrap();
        assert_ne!(user.passhash, "s3cret-pass");
        assert!(PasswordService::verify("s3cret-pass", &user.passhash).unwrap());
        assert!(!format!("{:?}", user).contains(&user.passhash));
    }
}
