//! User document access shared by handlers and the roadmap pipelines.

use crate::errors::AppError;
use crate::models::user::User;
use crate::store::{DocumentStore, StoreError, USERS};

pub async fn load_user(store: &dyn DocumentStore, user_id: &str) -> Result<User, AppError> {
    let doc = store
        .get(USERS, user_id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("user {user_id}")))?;
    Ok(User::from_doc(&doc)?)
}

pub async fn save_user(store: &dyn DocumentStore, user: &User) -> Result<(), AppError> {
    store.set(USERS, &user.id, user.to_doc()).await?;
    Ok(())
}

/// Loads the user document, creating the minimal profile on first sign-in.
pub async fn load_or_create_user(
    store: &dyn DocumentStore,
    id: &str,
    display_name: &str,
    email: &str,
) -> Result<User, AppError> {
    match store.get(USERS, id).await? {
        Some(doc) => Ok(User::from_doc(&doc)?),
        None => {
            let user = User::minimal(id, display_name, email);
            save_user(store, &user).await?;
            Ok(user)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn test_load_user_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = load_user(&store, "ghost").await.unwrap_err();
        assert!(matches!(err, AppError::Store(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_load_or_create_creates_minimal_once() {
        let store = MemoryStore::new();
        let created = load_or_create_user(&store, "u1", "Ada", "ada@example.com")
            .await
            .unwrap();
        assert_eq!(created.grade, 9);

        let mut edited = created.clone();
        edited.grade = 11;
        save_user(&store, &edited).await.unwrap();

        // Second sign-in loads the stored profile instead of resetting it.
        let loaded = load_or_create_user(&store, "u1", "Ada", "ada@example.com")
            .await
            .unwrap();
        assert_eq!(loaded.grade, 11);
    }
}
