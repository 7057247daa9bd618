//! # Data Access Gateway
//!
//! This module defines the storage abstraction trait that lets the session
//! layer work against different backends without modification: the remote
//! HTTP API or a local on-device store.

use async_trait::async_trait;
use shared::{MoodEntry, User};
use thiserror::Error;

mod http;
mod local;

pub use http::HttpGateway;
pub use local::LocalGateway;

/// Errors a gateway operation can surface
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required field was missing or malformed on a write
    #[error("validation failed: {0}")]
    Validation(String),
    /// An update targeted a user the store does not know
    #[error("not found: {0}")]
    NotFound(String),
    /// The backing store is unreachable or answered with a failure status
    #[error("store unreachable: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        GatewayError::Transport(e.to_string())
    }
}

/// Uniform async interface to the mood/user store
///
/// The gateway holds no state between calls and imposes no ordering beyond
/// what the caller sequences by awaiting.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// All known entries, newest first
    async fn fetch_moods(&self) -> Result<Vec<MoodEntry>, GatewayError>;

    /// Persist one entry and return the stored record with its identity
    async fn create_mood(&self, entry: MoodEntry) -> Result<MoodEntry, GatewayError>;

    /// Idempotent upsert by email
    async fn login(&self, name: &str, email: &str) -> Result<User, GatewayError>;

    /// Full-replace profile update keyed by email
    async fn update_user(&self, user: User) -> Result<User, GatewayError>;
}
