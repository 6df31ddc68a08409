// src/infrastructure/security/token.rs
use crate::application::{
    dto::{AuthenticatedUser, Capability},
    error::{ApplicationError, ApplicationResult},
    ports::{security::TokenManager, time::Clock},
};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use std::{collections::HashSet, sync::Arc};

const ADMIN_SUBJECT: &str = "admin";

/// Grants full inventory and analytics access to holders of one shared
/// operator token.
#[derive(Clone)]
pub struct StaticTokenManager {
    digest: [u8; 32],
    clock: Arc<dyn Clock>,
}

impl StaticTokenManager {
    pub fn new(token: &str, clock: Arc<dyn Clock>) -> Self {
        Self {
            digest: Sha256::digest(token.as_bytes()).into(),
            clock,
        }
    }

    pub fn admin_capabilities() -> HashSet<Capability> {
        [
            Capability::new("listings", "*"),
            Capability::new("analytics", "read"),
        ]
        .into_iter()
        .collect()
    }
}

#[async_trait]
impl TokenManager for StaticTokenManager {
    async fn authenticate(&self, token: &str) -> ApplicationResult<AuthenticatedUser> {
        let presented: [u8; 32] = Sha256::digest(token.trim().as_bytes()).into();
        let matches: bool = presented.as_slice().ct_eq(self.digest.as_slice()).into();
        if !matches {
            return Err(ApplicationError::unauthorized("invalid token"));
        }

        Ok(AuthenticatedUser {
            subject: ADMIN_SUBJECT.to_string(),
            capabilities: Self::admin_capabilities(),
            authenticated_at: self.clock.now(),
        })
    }
}
