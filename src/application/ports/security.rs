// src/application/ports/security.rs
use crate::application::{ApplicationResult, dto::AuthenticatedUser};
use async_trait::async_trait;

#[async_trait]
pub trait TokenManager: Send + Sync {
    /// Resolve a bearer token to the operator it belongs to.
    async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser>;
}
