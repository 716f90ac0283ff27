use serde::{Deserialize, Serialize};

/// Identity of an actor: the requester, a lab tester, or a doctor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub user_name: String,
}

impl User {
    pub fn new(id: i64, user_name: impl Into<String>) -> Self {
        Self {
            id,
            user_name: user_name.into(),
        }
    }
}
