// src/auth.rs
// Authorization gate for catalog mutations

use std::fmt;

use crate::config::BotConfig;

/// Requester identity as delivered by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Admits exactly one privileged identity
#[derive(Debug, Clone, Copy)]
pub struct AuthGate {
    admin: UserId,
}

impl AuthGate {
    pub fn new(config: &BotConfig) -> Self {
        Self {
            admin: config.admin_id,
        }
    }

    pub fn is_authorized(&self, requester: UserId) -> bool {
        requester == self.admin
    }
}
