use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated caller, passed explicitly into every service call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
}

impl Identity {
    pub fn new(user_id: Uuid, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}

impl From<&super::User> for Identity {
    fn from(user: &super::User) -> Self {
        Self::new(user.id, user.username.clone())
    }
}
