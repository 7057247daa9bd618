use crate::domain::{DomainError, MoodService, UserService};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use shared::{LoginRequest, MoodEntry, User};
use tracing::info;

/// Application state containing the domain services
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub mood_service: MoodService,
}

impl AppState {
    /// Create new application state with the given services
    pub fn new(user_service: UserService, mood_service: MoodService) -> Self {
        Self {
            user_service,
            mood_service,
        }
    }
}

/// Map a domain error to the HTTP status the contract promises
fn status_for(error: &DomainError) -> StatusCode {
    match error {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Axum handler function for POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> impl IntoResponse {
    info!("POST /api/auth/login - email: {}", request.email);

    match state.user_service.login(request).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(e) => {
            tracing::error!("Error logging in: {:?}", e);
            (status_for(&e), e.to_string()).into_response()
        }
    }
}

/// Axum handler function for PUT /api/user
pub async fn update_user(
    State(state): State<AppState>,
    Json(user): Json<User>,
) -> impl IntoResponse {
    info!("PUT /api/user - email: {}", user.email);

    match state.user_service.update_user(user).await {
        Ok(updated) => (StatusCode::OK, Json(updated)).into_response(),
        Err(e) => {
            tracing::error!("Error updating user: {:?}", e);
            (status_for(&e), e.to_string()).into_response()
        }
    }
}

/// Axum handler function for GET /api/moods
pub async fn list_moods(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/moods");

    match state.mood_service.list_moods().await {
        Ok(moods) => (StatusCode::OK, Json(moods)).into_response(),
        Err(e) => {
            tracing::error!("Error listing moods: {:?}", e);
            (status_for(&e), e.to_string()).into_response()
        }
    }
}

/// Axum handler function for POST /api/moods
pub async fn create_mood(
    State(state): State<AppState>,
    Json(entry): Json<MoodEntry>,
) -> impl IntoResponse {
    info!("POST /api/moods - mood: {}", entry.mood);

    match state.mood_service.create_mood(entry).await {
        Ok(stored) => (StatusCode::CREATED, Json(stored)).into_response(),
        Err(e) => {
            tracing::error!("Error creating mood: {:?}", e);
            (status_for(&e), e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbConnection;
    use axum::response::Response;

    /// Helper to create test handlers
    async fn setup_test_state() -> AppState {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        AppState::new(UserService::new(db.clone()), MoodService::new(db))
    }

    fn draft_mood(mood: &str) -> MoodEntry {
        MoodEntry {
            id: None,
            date: "2025-06-12T19:00:00+00:00".to_string(),
            mood: mood.to_string(),
            note: "".to_string(),
            icon: None,
            tags: vec![],
            lifestyle: None,
            user_email: Some("jane.doe@example.com".to_string()),
        }
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("parse body")
    }

    #[tokio::test]
    async fn test_login_handler_returns_user() {
        let state = setup_test_state().await;

        let request = LoginRequest {
            name: "Jane Doe".to_string(),
            email: "jane.doe@example.com".to_string(),
        };
        let response = login(State(state), Json(request)).await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let user: User = body_json(response).await;
        assert_eq!(user.email, "jane.doe@example.com");
        assert!(user.id.is_some());
    }

    #[tokio::test]
    async fn test_login_handler_is_idempotent() {
        let state = setup_test_state().await;
        let request = LoginRequest {
            name: "Jane Doe".to_string(),
            email: "jane.doe@example.com".to_string(),
        };

        let first = login(State(state.clone()), Json(request.clone()))
            .await
            .into_response();
        let second = login(State(state), Json(request)).await.into_response();

        let first: User = body_json(first).await;
        let second: User = body_json(second).await;
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_update_user_handler_404_for_unknown_email() {
        let state = setup_test_state().await;

        let user = User {
            id: None,
            name: "Ghost".to_string(),
            email: "ghost@example.com".to_string(),
            bio: None,
            avatar: None,
        };
        let response = update_user(State(state), Json(user)).await.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_mood_handler_returns_201() {
        let state = setup_test_state().await;

        let response = create_mood(State(state), Json(draft_mood("Calm")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        let stored: MoodEntry = body_json(response).await;
        assert!(stored.id.is_some());
    }

    #[tokio::test]
    async fn test_create_mood_handler_validation_error() {
        let state = setup_test_state().await;

        // Empty mood label fails validation
        let response = create_mood(State(state), Json(draft_mood("")))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_moods_handler_returns_created_entry() {
        let state = setup_test_state().await;

        let created = create_mood(State(state.clone()), Json(draft_mood("Calm")))
            .await
            .into_response();
        let created: MoodEntry = body_json(created).await;

        let response = list_moods(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let moods: Vec<MoodEntry> = body_json(response).await;
        assert_eq!(moods.len(), 1);
        assert_eq!(moods[0].id, created.id);
    }
}
