//! Auth route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use clementine_core::Role;

use crate::error::{AppError, Result};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, user::User};
use crate::services::AuthService;
use crate::state::AppState;

/// Request body for signup.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    /// Defaults to `customer`.
    pub role: Option<Role>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response body for signup and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
}

/// POST /api/auth/signup
///
/// Registers a new account and logs it in.
#[instrument(skip_all, fields(email = %payload.email))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let auth = AuthService::new(state.pool());

    let user = auth
        .register(
            &payload.email,
            &payload.password,
            payload.name.as_deref(),
            payload.role.unwrap_or_default(),
        )
        .await?;

    start_session(&session, &user).await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { user })))
}

/// POST /api/auth/login
#[instrument(skip_all, fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let auth = AuthService::new(state.pool());

    let user = auth.login(&payload.email, &payload.password).await?;

    start_session(&session, &user).await?;

    Ok(Json(AuthResponse { user }))
}

/// POST /api/auth/logout
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    Ok(StatusCode::NO_CONTENT)
}

/// Rotate the session id and store the authenticated identity.
async fn start_session(session: &Session, user: &User) -> Result<()> {
    // Fresh session id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    let current = CurrentUser {
        id: user.id,
        role: user.role,
        email: user.email.to_string(),
    };

    set_current_user(session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    Ok(())
}
