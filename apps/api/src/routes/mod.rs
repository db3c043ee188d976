pub mod health;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::admins::handlers as admin_handlers;
use crate::roadmap::handlers as roadmap_handlers;
use crate::state::AppState;
use crate::users::handlers as user_handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/signup", post(user_handlers::handle_signup))
        .route("/api/v1/auth/signin", post(user_handlers::handle_signin))
        .route("/api/v1/auth/signout", post(user_handlers::handle_signout))
        // Profile
        .route(
            "/api/v1/users/me",
            get(user_handlers::handle_get_me).put(user_handlers::handle_update_me),
        )
        .route(
            "/api/v1/users/me/progress/:milestone_id",
            patch(user_handlers::handle_set_progress),
        )
        // Roadmap
        .route("/api/v1/roadmap", get(roadmap_handlers::handle_get_roadmap))
        .route(
            "/api/v1/roadmap/generate",
            post(roadmap_handlers::handle_generate_roadmap),
        )
        .route(
            "/api/v1/recommendations/generate",
            post(roadmap_handlers::handle_generate_recommendations),
        )
        .route(
            "/api/v1/roadmap/milestones/:id",
            put(roadmap_handlers::handle_update_milestone)
                .delete(roadmap_handlers::handle_delete_milestone),
        )
        .route(
            "/api/v1/roadmap/resources/:id",
            put(roadmap_handlers::handle_update_resource)
                .delete(roadmap_handlers::handle_delete_resource),
        )
        // Admin
        .route("/api/v1/admins/me", get(admin_handlers::handle_get_admin))
        .route(
            "/api/v1/admins/me/schools",
            post(admin_handlers::handle_add_school),
        )
        .route(
            "/api/v1/admins/me/schools/:name",
            delete(admin_handlers::handle_remove_school),
        )
        .with_state(state)
}
