//! Auth provider boundary.
//!
//! The hosted auth service is an external collaborator; it is exposed as an
//! injectable `AuthProvider` trait so handlers never touch the provider
//! directly and tests can substitute a fake.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated")]
    NotAuthenticated,

    #[error("auth provider rejected the request: {0}")]
    Rejected(String),

    #[error("network error calling auth provider: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid auth provider response: {0}")]
    InvalidResponse(String),
}

/// The authenticated subject as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSubject {
    pub id: String,
    pub display_name: String,
    pub email: String,
}

/// A subject plus the bearer token issued for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub subject: AuthSubject,
    pub token: String,
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthSession, AuthError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    async fn sign_out(&self, token: &str) -> Result<(), AuthError>;

    /// Resolves a bearer token to the current authenticated subject.
    async fn verify(&self, token: &str) -> Result<AuthSubject, AuthError>;
}

/// Resolves the request's bearer token to the authenticated subject.
pub async fn authenticate(
    state: &crate::state::AppState,
    headers: &HeaderMap,
) -> Result<AuthSubject, crate::errors::AppError> {
    let token = bearer_token(headers).map_err(|_| crate::errors::AppError::NotAuthenticated)?;
    Ok(state.auth.verify(token).await?)
}

/// Extracts the bearer token from an `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::NotAuthenticated)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    subject: AuthSubject,
    token: String,
}

/// Thin client for the hosted auth provider's REST surface. The provider's
/// exact wire format is out of scope; this speaks a minimal JSON shape
/// against a configurable base URL.
pub struct HttpAuthProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthProvider {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn session_request(
        &self,
        path: &str,
        body: &CredentialsRequest<'_>,
    ) -> Result<AuthSession, AuthError> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(AuthError::Rejected(format!(
                "status {}: {}",
                status.as_u16(),
                text
            )));
        }

        let session: SessionResponse = serde_json::from_str(&text)
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        Ok(AuthSession {
            subject: session.subject,
            token: session.token,
        })
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<AuthSession, AuthError> {
        self.session_request(
            "/v1/accounts/signup",
            &CredentialsRequest {
                email,
                password,
                display_name: Some(display_name),
            },
        )
        .await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.session_request(
            "/v1/accounts/signin",
            &CredentialsRequest {
                email,
                password,
                display_name: None,
            },
        )
        .await
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(format!("{}/v1/accounts/signout", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::NotAuthenticated);
        }
        Ok(())
    }

    async fn verify(&self, token: &str) -> Result<AuthSubject, AuthError> {
        let response = self
            .client
            .get(format!("{}/v1/accounts/me", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(AuthError::NotAuthenticated);
        }
        if !status.is_success() {
            return Err(AuthError::InvalidResponse(format!(
                "status {}",
                status.as_u16()
            )));
        }

        response
            .json::<AuthSubject>()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_extracts() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc123"),
        );
        assert_eq!(bearer_token(&headers).unwrap(), "abc123");
    }

    #[test]
    fn test_bearer_token_missing_header() {
        let headers = HeaderMap::new();
        assert!(matches!(
            bearer_token(&headers),
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_bearer_token_wrong_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic abc123"),
        );
        assert!(bearer_token(&headers).is_err());
    }

    #[test]
    fn test_bearer_token_empty_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_err());
    }
}
