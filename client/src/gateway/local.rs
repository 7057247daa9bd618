//! On-device gateway for the local-storage build.
//!
//! Persists the same two logical collections as the backend (`moods`,
//! `user`) as JSON documents under a base directory. Every operation
//! sleeps briefly first to emulate network latency, so screens exercise
//! the same loading states against either gateway.

use super::{DataGateway, GatewayError};
use async_trait::async_trait;
use shared::{MoodEntry, User, DEFAULT_BIO};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

const MOODS_KEY: &str = "moods.json";
const USER_KEY: &str = "user.json";

/// Default emulated network delay before each operation
pub const EMULATED_LATENCY: Duration = Duration::from_millis(150);

/// Gateway backed by JSON documents on the local device
///
/// Writes are full read-modify-write of the collection, serialized through
/// an internal lock so concurrent logins cannot race the uniqueness check.
pub struct LocalGateway {
    base_dir: PathBuf,
    latency: Duration,
    write_lock: Mutex<()>,
}

impl LocalGateway {
    /// Create a gateway rooted at the given directory
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self::with_latency(base_dir, EMULATED_LATENCY)
    }

    /// Create a gateway with a custom emulated latency (zero for tests)
    pub fn with_latency(base_dir: impl Into<PathBuf>, latency: Duration) -> Self {
        Self {
            base_dir: base_dir.into(),
            latency,
            write_lock: Mutex::new(()),
        }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(key)
    }

    async fn read_document<T: serde::de::DeserializeOwned>(
        path: &Path,
    ) -> Result<Option<T>, GatewayError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| GatewayError::Transport(format!("corrupt store: {}", e)))?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GatewayError::Transport(e.to_string())),
        }
    }

    async fn write_document<T: serde::Serialize>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), GatewayError> {
        tokio::fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        tokio::fs::write(self.key_path(key), bytes)
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))
    }

    async fn read_moods(&self) -> Result<Vec<MoodEntry>, GatewayError> {
        Ok(Self::read_document(&self.key_path(MOODS_KEY))
            .await?
            .unwrap_or_default())
    }

    async fn read_user(&self) -> Result<Option<User>, GatewayError> {
        Self::read_document(&self.key_path(USER_KEY)).await
    }

    async fn emulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl DataGateway for LocalGateway {
    async fn fetch_moods(&self) -> Result<Vec<MoodEntry>, GatewayError> {
        self.emulate_latency().await;

        let mut moods = self.read_moods().await?;
        // RFC 3339 strings from a single device sort lexicographically
        moods.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(moods)
    }

    async fn create_mood(&self, entry: MoodEntry) -> Result<MoodEntry, GatewayError> {
        self.emulate_latency().await;

        entry
            .validate_new()
            .map_err(|e| GatewayError::Validation(e.to_string()))?;

        let _guard = self.write_lock.lock().await;
        let mut moods = self.read_moods().await?;

        let mut stored = entry;
        stored.id = Some(Uuid::new_v4().to_string());
        moods.push(stored.clone());
        self.write_document(MOODS_KEY, &moods).await?;

        Ok(stored)
    }

    async fn login(&self, name: &str, email: &str) -> Result<User, GatewayError> {
        self.emulate_latency().await;

        if email.trim().is_empty() {
            return Err(GatewayError::Validation("email must not be empty".into()));
        }

        let _guard = self.write_lock.lock().await;
        if let Some(existing) = self.read_user().await? {
            if existing.email == email {
                return Ok(existing);
            }
        }

        // Single-tenant store: a login under a new email starts fresh
        let fresh = User {
            id: Some(Uuid::new_v4().to_string()),
            name: name.trim().to_string(),
            email: email.to_string(),
            bio: Some(DEFAULT_BIO.to_string()),
            avatar: None,
        };
        self.write_document(USER_KEY, &fresh).await?;

        Ok(fresh)
    }

    async fn update_user(&self, user: User) -> Result<User, GatewayError> {
        self.emulate_latency().await;

        let _guard = self.write_lock.lock().await;
        let stored = self.read_user().await?;

        match stored {
            Some(existing) if existing.email == user.email => {
                // Full replace of the profile fields, identity preserved
                let updated = User {
                    id: existing.id,
                    name: user.name,
                    email: existing.email,
                    bio: user.bio,
                    avatar: user.avatar,
                };
                self.write_document(USER_KEY, &updated).await?;
                Ok(updated)
            }
            _ => Err(GatewayError::NotFound(format!(
                "no user with email {}",
                user.email
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zero_latency_gateway(dir: &Path) -> LocalGateway {
        LocalGateway::with_latency(dir, Duration::ZERO)
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
    async fn test_fetch_from_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let gateway = zero_latency_gateway(dir.path());

        let moods = gateway.fetch_moods().await.expect("fetch");
        assert!(moods.is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_persists() {
        let dir = tempfile::tempdir().expect("tempdir");
        let gateway = zero_latency_gateway(dir.path());

        let stored = gateway
            .create_mood(draft_mood("2025-06-12T19:00:00+00:00", "Calm"))
            .await
            .expect("create");
        assert!(stored.id.is_some());

        // A second gateway over the same directory sees the write
        let reopened = zero_latency_gateway(dir.path());
        let moods = reopened.fetch_moods().await.expect("fetch");
        assert_eq!(moods, vec![stored]);
    }

    #[tokio::test]
    async fn test_fetch_sorts_newest_first() {
        let dir = tempfile::tempdir().expect("tempdir");
        let gateway = zero_latency_gateway(dir.path());

        gateway
            .create_mood(draft_mood("2025-06-10T09:00:00+00:00", "Happy"))
            .await
            .expect("older");
        gateway
            .create_mood(draft_mood("2025-06-12T19:00:00+00:00", "Tired"))
            .await
            .expect("newer");

        let moods = gateway.fetch_moods().await.expect("fetch");
        assert_eq!(moods[0].mood, "Tired");
        assert_eq!(moods[1].mood, "Happy");
    }

    #[tokio::test]
    async fn test_create_validates_required_fields() {
        let dir = tempfile::tempdir().expect("tempdir");
        let gateway = zero_latency_gateway(dir.path());

        let err = gateway
            .create_mood(draft_mood("", "Calm"))
            .await
            .expect_err("missing date");
        assert!(matches!(err, GatewayError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_is_idempotent_per_email() {
        let dir = tempfile::tempdir().expect("tempdir");
        let gateway = zero_latency_gateway(dir.path());

        let first = gateway
            .login("Jane Doe", "jane.doe@example.com")
            .await
            .expect("first login");
        let second = gateway
            .login("Jane Doe", "jane.doe@example.com")
            .await
            .expect("second login");

        assert_eq!(first.id, second.id);
        assert_eq!(first.bio.as_deref(), Some(DEFAULT_BIO));
    }

    #[tokio::test]
    async fn test_concurrent_logins_resolve_to_one_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let gateway = std::sync::Arc::new(zero_latency_gateway(dir.path()));

        let a = tokio::spawn({
            let gateway = gateway.clone();
            async move { gateway.login("Jane Doe", "jane.doe@example.com").await }
        });
        let b = tokio::spawn({
            let gateway = gateway.clone();
            async move { gateway.login("Jane Doe", "jane.doe@example.com").await }
        });

        let a = a.await.expect("join").expect("login a");
        let b = b.await.expect("join").expect("login b");
        assert_eq!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_update_user_replaces_profile() {
        let dir = tempfile::tempdir().expect("tempdir");
        let gateway = zero_latency_gateway(dir.path());

        let mut user = gateway
            .login("Jane Doe", "jane.doe@example.com")
            .await
            .expect("login");
        user.bio = Some("Collecting quiet mornings.".to_string());

        let updated = gateway.update_user(user.clone()).await.expect("update");
        assert_eq!(updated.bio, user.bio);
        assert_eq!(updated.id, user.id);
    }

    #[tokio::test]
    async fn test_update_unknown_user_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let gateway = zero_latency_gateway(dir.path());

        let err = gateway
            .update_user(User {
                id: None,
                name: "Ghost".to_string(),
                email: "ghost@example.com".to_string(),
                bio: None,
                avatar: None,
            })
            .await
            .expect_err("unknown user");

        assert!(matches!(err, GatewayError::NotFound(_)));
    }
}
