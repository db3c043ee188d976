//! Axum route handlers for auth and profile operations.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::{authenticate, bearer_token};
use crate::errors::AppError;
use crate::models::user::User;
use crate::roadmap::service as roadmap_service;
use crate::state::AppState;
use crate::users::service;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub grade: i64,
    pub career_goal: String,
    pub school: String,
    pub location: String,
    pub interests: Vec<String>,
    pub district_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub completed: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/signup
///
/// Creates the auth account and the minimal user profile.
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::Validation(
            "email and password are required".to_string(),
        ));
    }

    let session = state
        .auth
        .sign_up(&request.email, &request.password, &request.display_name)
        .await?;

    let user = User::minimal(
        &session.subject.id,
        &session.subject.display_name,
        &session.subject.email,
    );
    service::save_user(state.store.as_ref(), &user).await?;

    Ok(Json(SessionResponse {
        token: session.token,
        user,
    }))
}

/// POST /api/v1/auth/signin
///
/// Signs in and returns the stored profile, creating the minimal one on a
/// first sign-in.
pub async fn handle_signin(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.auth.sign_in(&request.email, &request.password).await?;

    let user = service::load_or_create_user(
        state.store.as_ref(),
        &session.subject.id,
        &session.subject.display_name,
        &session.subject.email,
    )
    .await?;

    Ok(Json(SessionResponse {
        token: session.token,
        user,
    }))
}

/// POST /api/v1/auth/signout
pub async fn handle_signout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let token = bearer_token(&headers)?;
    state.auth.sign_out(token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users/me
pub async fn handle_get_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<User>, AppError> {
    let subject = authenticate(&state, &headers).await?;
    let user = service::load_user(state.store.as_ref(), &subject.id).await?;
    Ok(Json(user))
}

/// PUT /api/v1/users/me
///
/// Profile completion / edit. Full-document replace.
pub async fn handle_update_me(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<User>, AppError> {
    let subject = authenticate(&state, &headers).await?;

    if !(9..=12).contains(&request.grade) {
        return Err(AppError::Validation(
            "grade must be between 9 and 12".to_string(),
        ));
    }

    let mut user = service::load_user(state.store.as_ref(), &subject.id).await?;
    user.grade = request.grade;
    user.career_goal = request.career_goal;
    user.school = request.school;
    user.location = request.location;
    user.interests = request.interests;
    user.district_id = request.district_id;
    service::save_user(state.store.as_ref(), &user).await?;

    Ok(Json(user))
}

/// PATCH /api/v1/users/me/progress/:milestone_id
///
/// Toggles one milestone's completion on the profile and mirrors it onto the
/// roadmap.
pub async fn handle_set_progress(
    State(state): State<AppState>,
    Path(milestone_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<ProgressRequest>,
) -> Result<Json<User>, AppError> {
    let subject = authenticate(&state, &headers).await?;
    let user = roadmap_service::set_milestone_completion(
        state.store.as_ref(),
        &state.roadmap_locks,
        &subject.id,
        &milestone_id,
        request.completed,
    )
    .await?;
    Ok(Json(user))
}
