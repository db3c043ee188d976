#![allow(dead_code)]

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::ai_client::AiError;
use crate::auth::AuthError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("AI error: {0}")]
    Ai(#[from] AiError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotAuthenticated => (
                StatusCode::UNAUTHORIZED,
                "NOT_AUTHENTICATED",
                "Authentication required".to_string(),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Store(e) => match e {
                StoreError::NotFound(what) => {
                    (StatusCode::NOT_FOUND, "DOCUMENT_NOT_FOUND", what.clone())
                }
                StoreError::Malformed(detail) => {
                    tracing::error!("Malformed document: {detail}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "MALFORMED_DOCUMENT",
                        "A stored document failed validation".to_string(),
                    )
                }
                StoreError::Backend(e) => {
                    tracing::error!("Store backend error: {e}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORE_ERROR",
                        "A storage error occurred".to_string(),
                    )
                }
            },
            AppError::Auth(e) => match e {
                AuthError::NotAuthenticated => (
                    StatusCode::UNAUTHORIZED,
                    "NOT_AUTHENTICATED",
                    "Authentication required".to_string(),
                ),
                AuthError::Rejected(msg) => (StatusCode::UNAUTHORIZED, "AUTH_REJECTED", msg.clone()),
                AuthError::Network(e) => {
                    tracing::error!("Auth provider network error: {e}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "AUTH_UPSTREAM_ERROR",
                        "The auth provider could not be reached".to_string(),
                    )
                }
                AuthError::InvalidResponse(msg) => {
                    tracing::error!("Auth provider invalid response: {msg}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "AUTH_UPSTREAM_ERROR",
                        "The auth provider returned an unexpected response".to_string(),
                    )
                }
            },
            AppError::Ai(e) => match e {
                AiError::Network(e) => {
                    tracing::error!("AI endpoint network error: {e}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "AI_NETWORK_ERROR",
                        "The AI endpoint could not be reached".to_string(),
                    )
                }
                AiError::InvalidResponse(msg) => {
                    tracing::error!("AI invalid response: {msg}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "AI_INVALID_RESPONSE",
                        "The AI endpoint returned an unusable response".to_string(),
                    )
                }
                AiError::Unknown(msg) => {
                    tracing::error!("AI error: {msg}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "AI_ERROR",
                        "An AI processing error occurred".to_string(),
                    )
                }
            },
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
