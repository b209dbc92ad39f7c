//! Invite token entity

/// Credential required to sign up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteToken {
    pub token: String,
    /// Username of whoever issued the invite.
    pub creator: String,
    /// Uses left; negative means unlimited.
    pub remaining: i64,
    /// Optional expiry, nanoseconds since the Unix epoch.
    pub deadline: Option<i64>,
}

impl InviteToken {
    pub const UNLIMITED: i64 = -1;
}
