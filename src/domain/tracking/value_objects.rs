use crate::domain::errors::{DomainError, DomainResult};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use std::fmt;

const SESSION_ID_MAX_LEN: usize = 128;
const PATH_MAX_LEN: usize = 2048;

/// Opaque visitor identity carried by the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisitorSessionId(String);

impl VisitorSessionId {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if !Self::is_well_formed(&value) {
            return Err(DomainError::Validation("invalid visitor session id".into()));
        }
        Ok(Self(value))
    }

    pub fn is_well_formed(value: &str) -> bool {
        !value.is_empty()
            && value.len() <= SESSION_ID_MAX_LEN
            && value
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VisitorSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request path a site visit is keyed by. Query strings are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisitPath(String);

impl VisitPath {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if !value.starts_with('/') {
            return Err(DomainError::Validation("visit path must start with '/'".into()));
        }
        if value.len() > PATH_MAX_LEN {
            return Err(DomainError::Validation("visit path is too long".into()));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VisitPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct SiteVisitCursor {
    pub visited_at: DateTime<Utc>,
    pub id: i64,
}

impl SiteVisitCursor {
    pub fn new(visited_at: DateTime<Utc>, id: i64) -> Self {
        Self { visited_at, id }
    }

    pub fn encode(&self) -> String {
        let raw = format!("{}|{}", self.visited_at.to_rfc3339(), self.id);
        URL_SAFE_NO_PAD.encode(raw.as_bytes())
    }

    pub fn decode(token: &str) -> DomainResult<Self> {
        let invalid = || DomainError::Validation("invalid cursor token".into());
        let bytes = URL_SAFE_NO_PAD.decode(token).map_err(|_| invalid())?;
        let raw = String::from_utf8(bytes).map_err(|_| invalid())?;
        let (visited_at, id) = raw.split_once('|').ok_or_else(invalid)?;
        let visited_at = DateTime::parse_from_rfc3339(visited_at)
            .map_err(|_| invalid())?
            .with_timezone(&Utc);
        let id = id.parse::<i64>().map_err(|_| invalid())?;
        Ok(Self::new(visited_at, id))
    }
}
