//! Session endpoints for the paired client.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use memento_core::User;

use crate::auth::{Identity, SessionToken};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Request body for registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Response wrapping a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

/// Register a new user.
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let (name, email, password) = match (request.name, request.email, request.password) {
        (Some(n), Some(e), Some(p)) if !n.is_empty() && !e.is_empty() && !p.is_empty() => {
            (n, e, p)
        }
        _ => {
            return Err(ApiError::bad_request(
                "name, email and password are required",
            ))
        }
    };

    let user = state.sessions.register(&name, &email, &password).await?;
    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Opaque bearer token for subsequent requests.
    pub token: String,
    pub user: User,
}

/// Verify credentials and open a session.
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (token, user) = state
        .sessions
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse { token, user }))
}

/// Close the current session.
/// POST /auth/logout
pub async fn logout(
    State(state): State<AppState>,
    SessionToken(token): SessionToken,
) -> ApiResult<Json<serde_json::Value>> {
    state.sessions.logout(&token).await;
    Ok(Json(serde_json::json!({ "message": "Logged out." })))
}

/// Current session identity.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: String,
    pub name: String,
}

/// Describe the authenticated caller.
/// GET /auth/session
pub async fn session(identity: Identity) -> ApiResult<Json<SessionResponse>> {
    Ok(Json(SessionResponse {
        user: SessionUser {
            id: identity.user_id,
            name: identity.name,
        },
    }))
}
