use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// `resource:action` grant; an action of `*` covers every action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Capability {
    pub resource: String,
    pub action: String,
}

impl Capability {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }

    pub fn matches(&self, resource: &str, action: &str) -> bool {
        self.resource == resource && (self.action == "*" || self.action == action)
    }
}

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub subject: String,
    pub capabilities: HashSet<Capability>,
    pub authenticated_at: DateTime<Utc>,
}

impl AuthenticatedUser {
    pub fn has_capability(&self, resource: &str, action: &str) -> bool {
        self.capabilities
            .iter()
            .any(|cap| cap.matches(resource, action))
    }
}
