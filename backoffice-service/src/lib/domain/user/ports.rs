use async_trait::async_trait;

use super::models::UserRecord;

/// Opaque user-record lookup service.
///
/// The persistence layer behind it (database, cache, remote directory) is an
/// external collaborator; the credential boundary only ever asks this one
/// question.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Option<UserRecord>;
}
