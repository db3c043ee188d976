//! Axum route handlers for the roadmap API.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::authenticate;
use crate::errors::AppError;
use crate::models::roadmap::{
    CareerRoadmap, Milestone, MilestoneCategory, Resource, ResourceCategory, ResourceType,
};
use crate::roadmap::service;
use crate::state::AppState;

/// GET /api/v1/roadmap
///
/// Returns the authenticated user's roadmap, if one exists.
pub async fn handle_get_roadmap(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CareerRoadmap>, AppError> {
    let subject = authenticate(&state, &headers).await?;
    let roadmap = service::get_roadmap(state.store.as_ref(), &subject.id).await?;
    Ok(Json(roadmap))
}

/// POST /api/v1/recommendations/generate
///
/// Runs the recommendations pipeline (AI call, JSON parse, merge) and
/// returns the updated roadmap.
pub async fn handle_generate_recommendations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CareerRoadmap>, AppError> {
    let subject = authenticate(&state, &headers).await?;
    let roadmap = service::generate_recommendations(
        state.store.as_ref(),
        &state.ai,
        &state.roadmap_locks,
        &subject.id,
    )
    .await?;
    Ok(Json(roadmap))
}

/// POST /api/v1/roadmap/generate
///
/// Runs the full-roadmap pipeline (AI call, outline parse, merge) and
/// returns the updated roadmap.
pub async fn handle_generate_roadmap(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CareerRoadmap>, AppError> {
    let subject = authenticate(&state, &headers).await?;
    let roadmap = service::generate_full_roadmap(
        state.store.as_ref(),
        &state.ai,
        &state.roadmap_locks,
        &subject.id,
    )
    .await?;
    Ok(Json(roadmap))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMilestoneRequest {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub is_completed: bool,
    pub grade_level: i64,
    pub category: String,
}

/// PUT /api/v1/roadmap/milestones/:id
///
/// Replaces a milestone in place. An unknown identifier is a silent no-op.
pub async fn handle_update_milestone(
    State(state): State<AppState>,
    Path(milestone_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<UpdateMilestoneRequest>,
) -> Result<Json<CareerRoadmap>, AppError> {
    let subject = authenticate(&state, &headers).await?;

    let category = MilestoneCategory::parse(&request.category)
        .ok_or_else(|| AppError::Validation(format!("unknown category '{}'", request.category)))?;

    let milestone = Milestone {
        id: milestone_id,
        title: request.title,
        description: request.description,
        due_date: request.due_date,
        is_completed: request.is_completed,
        grade_level: request.grade_level,
        category,
    };

    let roadmap = service::update_milestone(
        state.store.as_ref(),
        &state.roadmap_locks,
        &subject.id,
        milestone,
    )
    .await?;
    Ok(Json(roadmap))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResourceRequest {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub grade_level: i64,
    pub category: String,
}

/// PUT /api/v1/roadmap/resources/:id
pub async fn handle_update_resource(
    State(state): State<AppState>,
    Path(resource_id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<UpdateResourceRequest>,
) -> Result<Json<CareerRoadmap>, AppError> {
    let subject = authenticate(&state, &headers).await?;

    let resource_type = ResourceType::parse(&request.resource_type).ok_or_else(|| {
        AppError::Validation(format!("unknown resource type '{}'", request.resource_type))
    })?;
    let category = ResourceCategory::parse(&request.category)
        .ok_or_else(|| AppError::Validation(format!("unknown category '{}'", request.category)))?;

    let resource = Resource {
        id: resource_id,
        title: request.title,
        description: request.description,
        url: request.url,
        resource_type,
        grade_level: request.grade_level,
        category,
    };

    let roadmap = service::update_resource(
        state.store.as_ref(),
        &state.roadmap_locks,
        &subject.id,
        resource,
    )
    .await?;
    Ok(Json(roadmap))
}

/// DELETE /api/v1/roadmap/milestones/:id
pub async fn handle_delete_milestone(
    State(state): State<AppState>,
    Path(milestone_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CareerRoadmap>, AppError> {
    let subject = authenticate(&state, &headers).await?;
    let roadmap = service::delete_milestone(
        state.store.as_ref(),
        &state.roadmap_locks,
        &subject.id,
        &milestone_id,
    )
    .await?;
    Ok(Json(roadmap))
}

/// DELETE /api/v1/roadmap/resources/:id
pub async fn handle_delete_resource(
    State(state): State<AppState>,
    Path(resource_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<CareerRoadmap>, AppError> {
    let subject = authenticate(&state, &headers).await?;
    let roadmap = service::delete_resource(
        state.store.as_ref(),
        &state.roadmap_locks,
        &subject.id,
        &resource_id,
    )
    .await?;
    Ok(Json(roadmap))
}
