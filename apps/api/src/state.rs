use std::sync::Arc;

use crate::ai_client::ChatClient;
use crate::auth::AuthProvider;
use crate::config::Config;
use crate::locks::UserLocks;
use crate::store::DocumentStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. Every external collaborator is an explicitly constructed,
/// injectable client.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub ai: ChatClient,
    /// Kept for handlers that need runtime settings; currently only read at
    /// startup.
    #[allow(dead_code)]
    pub config: Config,
    /// Serializes roadmap read-modify-write per user; the store itself is
    /// last-write-wins.
    pub roadmap_locks: Arc<UserLocks>,
}
