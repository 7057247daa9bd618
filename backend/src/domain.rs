use crate::db::DbConnection;
use shared::{LoginRequest, MoodEntry, User, DEFAULT_BIO};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Errors surfaced by the domain services
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Service for user login and profile updates
#[derive(Clone)]
pub struct UserService {
    db: DbConnection,
}

impl UserService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Idempotent upsert by email
    ///
    /// An existing user is returned unchanged; otherwise a record is created
    /// with the given name and the default bio. The insert ignores conflicts
    /// and re-reads, so two concurrent logins for the same email both resolve
    /// to the single stored record.
    pub async fn login(&self, request: LoginRequest) -> Result<User, DomainError> {
        info!("Logging in user: {}", request.email);

        if request.email.trim().is_empty() {
            return Err(DomainError::Validation("email must not be empty".into()));
        }
        if request.name.trim().is_empty() {
            return Err(DomainError::Validation("name must not be empty".into()));
        }

        if let Some(existing) = self.db.find_user_by_email(&request.email).await? {
            info!("Known user: {}", existing.email);
            return Ok(existing);
        }

        let fresh = User {
            id: Some(Uuid::new_v4().to_string()),
            name: request.name.trim().to_string(),
            email: request.email.clone(),
            bio: Some(DEFAULT_BIO.to_string()),
            avatar: None,
        };
        self.db.try_insert_user(&fresh).await?;

        // Re-read rather than trusting our insert: a concurrent login may
        // have won the conflict on the unique email.
        let user = self
            .db
            .find_user_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                DomainError::Storage(anyhow::anyhow!(
                    "user vanished after insert: {}",
                    request.email
                ))
            })?;

        info!("Created user: {} with ID: {:?}", user.email, user.id);
        Ok(user)
    }

    /// Full-replace update of name/bio/avatar, keyed by email
    pub async fn update_user(&self, user: User) -> Result<User, DomainError> {
        info!("Updating user: {}", user.email);

        if user.email.trim().is_empty() {
            return Err(DomainError::Validation("email must not be empty".into()));
        }

        let updated = self.db.update_user_by_email(&user).await?;
        if !updated {
            return Err(DomainError::NotFound(format!(
                "no user with email {}",
                user.email
            )));
        }

        let stored = self
            .db
            .find_user_by_email(&user.email)
            .await?
            .ok_or_else(|| {
                DomainError::Storage(anyhow::anyhow!("user vanished after update: {}", user.email))
            })?;

        Ok(stored)
    }
}

/// Service for listing and recording mood entries
#[derive(Clone)]
pub struct MoodService {
    db: DbConnection,
}

impl MoodService {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// List all entries, newest first
    ///
    /// No per-user filter: entries carry user_email on write, but reads are
    /// global. Flagged as ambiguous product intent; a filter would slot in
    /// here without a schema change.
    pub async fn list_moods(&self) -> Result<Vec<MoodEntry>, DomainError> {
        info!("Listing mood entries");

        let moods = self.db.list_moods().await?;

        info!("Returning {} mood entries", moods.len());
        Ok(moods)
    }

    /// Validate and store a new entry, assigning its identity
    pub async fn create_mood(&self, entry: MoodEntry) -> Result<MoodEntry, DomainError> {
        info!("Creating mood entry: {}", entry.mood);

        entry
            .validate_new()
            .map_err(|e| DomainError::Validation(e.to_string()))?;

        let mut stored = entry;
        stored.id = Some(Uuid::new_v4().to_string());
        self.db.insert_mood(&stored).await?;

        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_services() -> (UserService, MoodService) {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        (UserService::new(db.clone()), MoodService::new(db))
    }

    fn login_request(name: &str, email: &str) -> LoginRequest {
        LoginRequest {
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn draft_mood(date: &str, mood: &str) -> MoodEntry {
        MoodEntry {
            id: None,
            date: date.to_string(),
            mood: mood.to_string(),
            note: "".to_string(),
            icon: None,
            tags: vec![],
            lifestyle: None,
            user_email: None,
        }
    }

    #[tokio::test]
    async fn test_login_creates_user_with_default_bio() {
        let (users, _) = setup_services().await;

        let user = users
            .login(login_request("Jane Doe", "jane.doe@example.com"))
            .await
            .expect("login");

        assert_eq!(user.name, "Jane Doe");
        assert_eq!(user.email, "jane.doe@example.com");
        assert_eq!(user.bio.as_deref(), Some(DEFAULT_BIO));
        assert!(user.id.is_some());
    }

    #[tokio::test]
    async fn test_login_twice_returns_same_record() {
        let (users, _) = setup_services().await;

        let first = users
            .login(login_request("Jane Doe", "jane.doe@example.com"))
            .await
            .expect("first login");
        let second = users
            .login(login_request("Someone Else", "jane.doe@example.com"))
            .await
            .expect("second login");

        // Same email resolves to the same record, name and all
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_login_rejects_blank_fields() {
        let (users, _) = setup_services().await;

        let err = users
            .login(login_request("Jane Doe", "  "))
            .await
            .expect_err("blank email");
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_not_found() {
        let (users, _) = setup_services().await;

        let err = users
            .update_user(User {
                id: None,
                name: "Ghost".to_string(),
                email: "ghost@example.com".to_string(),
                bio: None,
                avatar: None,
            })
            .await
            .expect_err("unknown user");

        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_replaces_profile_fields() {
        let (users, _) = setup_services().await;
        let mut user = users
            .login(login_request("Jane Doe", "jane.doe@example.com"))
            .await
            .expect("login");

        user.bio = Some("Collecting quiet mornings.".to_string());
        user.avatar = Some("avatar-3".to_string());
        let updated = users.update_user(user.clone()).await.expect("update");

        assert_eq!(updated.bio, user.bio);
        assert_eq!(updated.avatar, user.avatar);
        assert_eq!(updated.id, user.id);
    }

    #[tokio::test]
    async fn test_create_mood_assigns_id() {
        let (_, moods) = setup_services().await;

        let stored = moods
            .create_mood(draft_mood("2025-06-12T19:00:00+00:00", "Calm"))
            .await
            .expect("create mood");

        assert!(stored.id.is_some());
        assert_eq!(stored.mood, "Calm");
    }

    #[tokio::test]
    async fn test_create_mood_requires_date_and_mood() {
        let (_, moods) = setup_services().await;

        let err = moods
            .create_mood(draft_mood("", "Calm"))
            .await
            .expect_err("missing date");
        assert!(matches!(err, DomainError::Validation(_)));

        let err = moods
            .create_mood(draft_mood("2025-06-12T19:00:00+00:00", ""))
            .await
            .expect_err("missing mood");
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_list_moods_newest_first() {
        let (_, moods) = setup_services().await;

        moods
            .create_mood(draft_mood("2025-06-10T09:00:00+00:00", "Happy"))
            .await
            .expect("older");
        moods
            .create_mood(draft_mood("2025-06-12T19:00:00+00:00", "Stressed"))
            .await
            .expect("newer");

        let listed = moods.list_moods().await.expect("list");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].mood, "Stressed");
        assert_eq!(listed[1].mood, "Happy");
    }
}
