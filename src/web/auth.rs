//! # Caller Identity
//!
//! Handlers resolve the acting user through [`CurrentUser`] so the identity
//! source (session, token, test fixture) is injected rather than global.

use crate::models::User;
use parking_lot::RwLock;

pub trait CurrentUser: Send + Sync {
    /// The authenticated caller, or `None` when nobody is signed in.
    fn current_user(&self) -> Option<User>;
}

/// Identity source holding a single, swappable user.
#[derive(Debug, Default)]
pub struct StaticCurrentUser {
    user: RwLock<Option<User>>,
}

impl StaticCurrentUser {
    pub fn new(user: User) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user: User) {
        *self.user.write() = Some(user);
    }

    pub fn sign_out(&self) {
        *self.user.write() = None;
    }
}

impl CurrentUser for StaticCurrentUser {
    fn current_user(&self) -> Option<User> {
        self.user.read().clone()
    }
}
