//! Roadmap orchestration — the generation pipelines and direct roadmap
//! edits.
//!
//! Flow (recommendations): load user → load-or-create roadmap → build prompt
//! → one AI call → parse → merge → persist roadmap (merge-on-write)
//! and user (full replace).
//!
//! All AI calls go through ai_client — no direct endpoint calls here. Every
//! mutation path holds the owning user's lock across its read-modify-write
//! sequence.

use tracing::info;

use crate::ai_client::ChatClient;
use crate::errors::AppError;
use crate::locks::UserLocks;
use crate::models::recommendation::AiRecommendation;
use crate::models::roadmap::{CareerRoadmap, Milestone, Resource};
use crate::models::user::User;
use crate::roadmap::parser::{self, ParsedOutline};
use crate::roadmap::prompts;
use crate::store::{DocumentStore, StoreError, ROADMAPS, USERS};
use crate::users::service::load_user;

/// The user's roadmap, located by owner identity (one roadmap per user).
pub async fn get_roadmap(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<CareerRoadmap, AppError> {
    let doc = store
        .find_by_field(ROADMAPS, "userId", user_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("roadmap for user {user_id}")))?;
    Ok(CareerRoadmap::from_doc(&doc)?)
}

async fn load_or_new_roadmap(
    store: &dyn DocumentStore,
    user: &User,
) -> Result<CareerRoadmap, AppError> {
    match store.find_by_field(ROADMAPS, "userId", &user.id).await? {
        Some(doc) => Ok(CareerRoadmap::from_doc(&doc)?),
        None => Ok(CareerRoadmap::new(&user.id, &user.career_goal, user.grade)),
    }
}

/// Generates recommendations and folds them into the roadmap.
pub async fn generate_recommendations(
    store: &dyn DocumentStore,
    ai: &ChatClient,
    locks: &UserLocks,
    user_id: &str,
) -> Result<CareerRoadmap, AppError> {
    let _guard = locks.acquire(user_id).await;

    let mut user = load_user(store, user_id).await?;
    let mut roadmap = load_or_new_roadmap(store, &user).await?;

    let prompt = prompts::build_recommendations_prompt(&user, &roadmap);
    let reply = ai
        .complete(prompts::GUIDANCE_COUNSELOR_SYSTEM, &prompt)
        .await?;

    let recommendations = parser::parse_recommendations(&reply)?;
    info!(
        "Parsed {} recommendations for user {}",
        recommendations.len(),
        user_id
    );

    ingest_and_persist(store, &mut user, &mut roadmap, recommendations).await?;
    info!(
        "Roadmap for user {} now has {} milestones ({} completed)",
        user_id,
        roadmap.milestones.len(),
        roadmap.completed_milestone_count()
    );
    Ok(roadmap)
}

/// Generates a full roadmap outline and appends its records.
pub async fn generate_full_roadmap(
    store: &dyn DocumentStore,
    ai: &ChatClient,
    locks: &UserLocks,
    user_id: &str,
) -> Result<CareerRoadmap, AppError> {
    let _guard = locks.acquire(user_id).await;

    let user = load_user(store, user_id).await?;
    let mut roadmap = load_or_new_roadmap(store, &user).await?;

    let prompt = prompts::build_roadmap_outline_prompt(&user);
    let reply = ai
        .complete(prompts::GUIDANCE_COUNSELOR_SYSTEM, &prompt)
        .await?;

    let outline = parser::parse_roadmap_outline(&reply, user.grade);
    info!(
        "Parsed outline for user {}: {} milestones, {} resources",
        user_id,
        outline.milestones.len(),
        outline.resources.len()
    );

    apply_outline_and_persist(store, &mut roadmap, outline).await?;
    Ok(roadmap)
}

/// Folds parsed recommendations into the aggregate and persists both
/// documents: the roadmap with merge-on-write, the user with full replace.
/// The user also keeps a flat "Title: Description" string per
/// recommendation.
async fn ingest_and_persist(
    store: &dyn DocumentStore,
    user: &mut User,
    roadmap: &mut CareerRoadmap,
    recommendations: Vec<AiRecommendation>,
) -> Result<(), AppError> {
    for rec in &recommendations {
        user.recommendations
            .push(format!("{}: {}", rec.title, rec.description));
    }

    roadmap.ingest_recommendations(recommendations);

    store.merge(ROADMAPS, &roadmap.id, roadmap.to_doc()).await?;
    store.set(USERS, &user.id, user.to_doc()).await?;
    Ok(())
}

async fn apply_outline_and_persist(
    store: &dyn DocumentStore,
    roadmap: &mut CareerRoadmap,
    outline: ParsedOutline,
) -> Result<(), AppError> {
    for milestone in outline.milestones {
        roadmap.add_milestone(milestone);
    }
    for resource in outline.resources {
        roadmap.add_resource(resource);
    }

    store.merge(ROADMAPS, &roadmap.id, roadmap.to_doc()).await?;
    Ok(())
}

/// Sets one progress flag on the user and mirrors the completion flag onto
/// the roadmap milestone when one exists.
pub async fn set_milestone_completion(
    store: &dyn DocumentStore,
    locks: &UserLocks,
    user_id: &str,
    milestone_id: &str,
    completed: bool,
) -> Result<User, AppError> {
    let _guard = locks.acquire(user_id).await;

    let mut user = load_user(store, user_id).await?;
    user.progress.insert(milestone_id.to_string(), completed);

    if let Some(doc) = store.find_by_field(ROADMAPS, "userId", user_id).await? {
        let mut roadmap = CareerRoadmap::from_doc(&doc)?;
        if let Some(existing) = roadmap.milestones.iter().find(|m| m.id == milestone_id) {
            let mut updated = existing.clone();
            updated.is_completed = completed;
            roadmap.update_milestone(updated);
            store.merge(ROADMAPS, &roadmap.id, roadmap.to_doc()).await?;
        }
    }

    store.set(USERS, &user.id, user.to_doc()).await?;
    Ok(user)
}

/// Replaces a milestone by identifier. An unknown identifier is a silent
/// no-op and the roadmap is returned unchanged.
pub async fn update_milestone(
    store: &dyn DocumentStore,
    locks: &UserLocks,
    user_id: &str,
    milestone: Milestone,
) -> Result<CareerRoadmap, AppError> {
    let _guard = locks.acquire(user_id).await;

    let mut roadmap = get_roadmap(store, user_id).await?;
    roadmap.update_milestone(milestone);
    store.merge(ROADMAPS, &roadmap.id, roadmap.to_doc()).await?;
    Ok(roadmap)
}

pub async fn update_resource(
    store: &dyn DocumentStore,
    locks: &UserLocks,
    user_id: &str,
    resource: Resource,
) -> Result<CareerRoadmap, AppError> {
    let _guard = locks.acquire(user_id).await;

    let mut roadmap = get_roadmap(store, user_id).await?;
    roadmap.update_resource(resource);
    store.merge(ROADMAPS, &roadmap.id, roadmap.to_doc()).await?;
    Ok(roadmap)
}

pub async fn delete_milestone(
    store: &dyn DocumentStore,
    locks: &UserLocks,
    user_id: &str,
    milestone_id: &str,
) -> Result<CareerRoadmap, AppError> {
    let _guard = locks.acquire(user_id).await;

    let mut roadmap = get_roadmap(store, user_id).await?;
    roadmap.remove_milestone(milestone_id);
    store.merge(ROADMAPS, &roadmap.id, roadmap.to_doc()).await?;
    Ok(roadmap)
}

pub async fn delete_resource(
    store: &dyn DocumentStore,
    locks: &UserLocks,
    user_id: &str,
    resource_id: &str,
) -> Result<CareerRoadmap, AppError> {
    let _guard = locks.acquire(user_id).await;

    let mut roadmap = get_roadmap(store, user_id).await?;
    roadmap.remove_resource(resource_id);
    store.merge(ROADMAPS, &roadmap.id, roadmap.to_doc()).await?;
    Ok(roadmap)
}
