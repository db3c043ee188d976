//! Axum route handlers for the admin surface. Admin accounts are created
//! out-of-band; this service only reads them and edits their school list.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

use crate::auth::authenticate;
use crate::errors::AppError;
use crate::models::user::Admin;
use crate::state::AppState;
use crate::store::{StoreError, ADMINS};

#[derive(Debug, Deserialize)]
pub struct AddSchoolRequest {
    pub school: String,
}

async fn load_admin(state: &AppState, admin_id: &str) -> Result<Admin, AppError> {
    let doc = state
        .store
        .get(ADMINS, admin_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("admin {admin_id}")))?;
    Ok(Admin::from_doc(&doc)?)
}

/// GET /api/v1/admins/me
pub async fn handle_get_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Admin>, AppError> {
    let subject = authenticate(&state, &headers).await?;
    let admin = load_admin(&state, &subject.id).await?;
    Ok(Json(admin))
}

/// POST /api/v1/admins/me/schools
pub async fn handle_add_school(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<AddSchoolRequest>,
) -> Result<Json<Admin>, AppError> {
    let subject = authenticate(&state, &headers).await?;

    if request.school.trim().is_empty() {
        return Err(AppError::Validation("school cannot be empty".to_string()));
    }

    let mut admin = load_admin(&state, &subject.id).await?;
    if !admin.schools.contains(&request.school) {
        admin.schools.push(request.school);
        state
            .store
            .set(ADMINS, &admin.id, admin.to_doc())
            .await?;
    }
    Ok(Json(admin))
}

/// DELETE /api/v1/admins/me/schools/:name
pub async fn handle_remove_school(
    State(state): State<AppState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Admin>, AppError> {
    let subject = authenticate(&state, &headers).await?;

    let mut admin = load_admin(&state, &subject.id).await?;
    let before = admin.schools.len();
    admin.schools.retain(|s| s != &name);
    if admin.schools.len() != before {
        state
            .store
            .set(ADMINS, &admin.id, admin.to_doc())
            .await?;
    }
    Ok(Json(admin))
}
