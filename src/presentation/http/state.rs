// src/presentation/http/state.rs
use crate::application::services::ApplicationServices;
use std::sync::Arc;

/// Attributes of the visitor session cookie.
#[derive(Debug, Clone)]
pub struct SessionCookieSettings {
    pub name: String,
    pub max_age_secs: u64,
    pub secure: bool,
}

impl Default for SessionCookieSettings {
    fn default() -> Self {
        Self {
            name: "visitor_id".into(),
            max_age_secs: 30 * 24 * 60 * 60,
            secure: false,
        }
    }
}

#[derive(Clone)]
pub struct HttpState {
    pub services: Arc<ApplicationServices>,
    pub session_cookie: Arc<SessionCookieSettings>,
}

impl HttpState {
    pub fn new(services: Arc<ApplicationServices>, session_cookie: SessionCookieSettings) -> Self {
        Self {
            services,
            session_cookie: Arc::new(session_cookie),
        }
    }
}
