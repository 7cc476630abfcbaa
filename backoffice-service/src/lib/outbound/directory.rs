use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::user::models::UserRecord;
use crate::domain::user::ports::UserDirectory;

/// In-process user directory.
///
/// Stands in for the external persistence collaborator; seeded once at
/// startup and read-only afterwards, so concurrent lookups need no locking.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: HashMap<String, UserRecord>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user record, keyed by email.
    pub fn with_user(mut self, user: UserRecord) -> Self {
        self.users.insert(user.email.clone(), user);
        self
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        self.users.get(email).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(email: &str) -> UserRecord {
        UserRecord {
            id: 1,
            email: email.to_string(),
            role: "user".to_string(),
            password_hash: "$argon2id$stub".to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let directory = InMemoryUserDirectory::new().with_user(record("rider@example.com"));

        let found = directory.find_by_email("rider@example.com").await;
        assert_eq!(found.map(|user| user.id), Some(1));

        assert!(directory.find_by_email("nobody@example.com").await.is_none());
    }
}
