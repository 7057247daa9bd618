//! # Session State Store
//!
//! The single authoritative in-memory copy of what the signed-in user
//! currently sees. All mutation goes through the enumerated operations
//! here; screens only read.

use crate::gateway::{DataGateway, GatewayError};
use shared::{MoodEntry, Page, User};
use std::sync::Arc;
use tracing::{error, info};

/// Fixed domain for the demo login scheme (no password is collected)
pub const EMAIL_DOMAIN: &str = "example.com";

/// Derive the deterministic demo email for a display name
///
/// Lowercased, whitespace collapsed to dots: "Jane Doe" becomes
/// "jane.doe@example.com".
pub fn derive_email(name: &str) -> String {
    let local = name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(".");
    format!("{}@{}", local, EMAIL_DOMAIN)
}

/// Process-wide client session
///
/// Single-writer: the owner holds `&mut` for every mutation, and the mood
/// list only changes by whole-list swap or single prepend, so readers never
/// observe a half-applied update.
pub struct Session {
    gateway: Arc<dyn DataGateway>,
    user: Option<User>,
    moods: Vec<MoodEntry>,
    page: Page,
    loading: bool,
    last_error: Option<String>,
}

impl Session {
    /// Create an empty session on the landing screen
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self {
            gateway,
            user: None,
            moods: Vec::new(),
            page: Page::Landing,
            loading: false,
            last_error: None,
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Loaded mood entries, newest first
    pub fn moods(&self) -> &[MoodEntry] {
        &self.moods
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Error from the most recent failed operation, for the screens to show
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Log in under the demo scheme and load the mood history
    ///
    /// The mood fetch only starts after a successful login. Nothing is
    /// committed until both calls succeed, so a failure leaves the session
    /// exactly as it was - no partial user, no page change.
    pub async fn login(&mut self, name: &str) -> Result<(), GatewayError> {
        let email = derive_email(name);
        info!("Logging in as {}", email);

        self.loading = true;
        let result = async {
            let user = self.gateway.login(name, &email).await?;
            let moods = self.gateway.fetch_moods().await?;
            Ok((user, moods))
        }
        .await;
        self.loading = false;

        match result {
            Ok((user, moods)) => {
                self.user = Some(user);
                self.moods = moods;
                self.page = Page::Dashboard;
                self.last_error = None;
                Ok(())
            }
            Err(e) => Err(self.surface("Login", e)),
        }
    }

    /// Replace the in-memory mood list from the store
    pub async fn refresh_moods(&mut self) -> Result<(), GatewayError> {
        self.loading = true;
        let result = self.gateway.fetch_moods().await;
        self.loading = false;

        match result {
            Ok(moods) => {
                self.moods = moods;
                self.last_error = None;
                Ok(())
            }
            Err(e) => Err(self.surface("Mood refresh", e)),
        }
    }

    /// Persist one entry and prepend the stored record
    ///
    /// No refetch: the store returns the record it kept and the list grows
    /// by that one prepend. A failure leaves the list untouched and is not
    /// retried.
    pub async fn add_mood(&mut self, entry: MoodEntry) -> Result<(), GatewayError> {
        self.loading = true;
        let result = self.gateway.create_mood(entry).await;
        self.loading = false;

        match result {
            Ok(stored) => {
                self.moods.insert(0, stored);
                self.last_error = None;
                Ok(())
            }
            Err(e) => Err(self.surface("Mood log", e)),
        }
    }

    /// Push a profile update and replace the current user on success
    pub async fn update_user(&mut self, user: User) -> Result<(), GatewayError> {
        self.loading = true;
        let result = self.gateway.update_user(user).await;
        self.loading = false;

        match result {
            Ok(updated) => {
                self.user = Some(updated);
                self.last_error = None;
                Ok(())
            }
            Err(e) => Err(self.surface("Profile update", e)),
        }
    }

    /// Pure screen transition, no I/O
    pub fn navigate(&mut self, page: Page) {
        self.page = page;
    }

    /// Clear the session back to the landing screen
    pub fn log_out(&mut self) {
        self.user = None;
        self.moods.clear();
        self.last_error = None;
        self.page = Page::Landing;
    }

    fn surface(&mut self, operation: &str, error: GatewayError) -> GatewayError {
        error!("{} failed: {}", operation, error);
        self.last_error = Some(error.to_string());
        error
    }
}
