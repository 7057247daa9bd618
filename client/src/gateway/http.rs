//! HTTP gateway against the MindEase backend.

use super::{DataGateway, GatewayError};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use shared::{LoginRequest, MoodEntry, User};

/// Default base URL for the backend API
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";

/// Gateway backed by the remote HTTP API
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a gateway against the given base URL (e.g. `http://host/api`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success status into the matching error kind
    async fn check(response: Response) -> Result<Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(match status {
            StatusCode::BAD_REQUEST => GatewayError::Validation(message),
            StatusCode::NOT_FOUND => GatewayError::NotFound(message),
            _ => GatewayError::Transport(format!("server returned {}: {}", status, message)),
        })
    }
}

impl Default for HttpGateway {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[async_trait]
impl DataGateway for HttpGateway {
    async fn fetch_moods(&self) -> Result<Vec<MoodEntry>, GatewayError> {
        let response = self.client.get(self.url("/moods")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_mood(&self, entry: MoodEntry) -> Result<MoodEntry, GatewayError> {
        let response = self
            .client
            .post(self.url("/moods"))
            .json(&entry)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn login(&self, name: &str, email: &str) -> Result<User, GatewayError> {
        let request = LoginRequest {
            name: name.to_string(),
            email: email.to_string(),
        };
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&request)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update_user(&self, user: User) -> Result<User, GatewayError> {
        let response = self
            .client
            .put(self.url("/user"))
            .json(&user)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
