// src/presentation/http/extractors.rs
use crate::{
    application::{dto::AuthenticatedUser, error::ApplicationError},
    presentation::http::{middleware::visitor_session::VisitorSession, state::HttpState},
};
use axum::{
    Extension,
    extract::{ConnectInfo, FromRequestParts},
    http::{Extensions, HeaderMap, request::Parts},
};
use headers::{Authorization, HeaderMapExt, UserAgent, authorization::Bearer};
use std::net::SocketAddr;

use super::error::HttpError;

pub const VIEW_TRACKING_HEADER: &str = "x-view-tracking";
pub const ANALYTICS_TAG_HEADER: &str = "x-requested-for-analytics";
const USER_AGENT_MAX_LEN: usize = 512;
const REFERRER_MAX_LEN: usize = 2048;

#[derive(Debug, Clone)]
pub struct Authenticated(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(app_state) = Extension::<HttpState>::from_request_parts(parts, state)
            .await
            .map_err(|_| {
                HttpError::from_error(ApplicationError::Infrastructure(
                    "application state missing".into(),
                ))
            })?;

        let header = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or_else(|| {
                HttpError::from_error(ApplicationError::Unauthorized(
                    "missing Authorization header".into(),
                ))
            })?;

        let manager = app_state.services.token_manager();
        let user = manager
            .authenticate(header.token())
            .await
            .map_err(HttpError::from_error)?;

        Ok(Self(user))
    }
}

/// Who is asking, as far as tracking cares.
#[derive(Debug, Clone)]
pub struct VisitorContext {
    pub session_id: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    /// `X-View-Tracking: false` was sent.
    pub tracking_opt_out: bool,
    /// `X-Requested-For-Analytics` was sent.
    pub analytics_tagged: bool,
}

impl VisitorContext {
    pub fn from_parts(headers: &HeaderMap, extensions: &Extensions) -> Option<Self> {
        let session = extensions.get::<VisitorSession>()?;
        Some(Self {
            session_id: session.id.clone(),
            ip_address: client_ip(headers, extensions),
            user_agent: headers.typed_get::<UserAgent>().map(|ua| {
                let mut ua = ua.as_str().to_string();
                truncate_chars(&mut ua, USER_AGENT_MAX_LEN);
                ua
            }),
            referrer: headers
                .get(axum::http::header::REFERER)
                .and_then(|value| value.to_str().ok())
                .filter(|value| !value.is_empty())
                .map(|value| {
                    let mut referrer = value.to_string();
                    truncate_chars(&mut referrer, REFERRER_MAX_LEN);
                    referrer
                }),
            tracking_opt_out: tracking_opt_out(headers),
            analytics_tagged: headers.contains_key(ANALYTICS_TAG_HEADER),
        })
    }
}

impl<S> FromRequestParts<S> for VisitorContext
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_parts(&parts.headers, &parts.extensions).ok_or_else(|| {
            HttpError::from_error(ApplicationError::infrastructure(
                "visitor session middleware not installed",
            ))
        })
    }
}

fn tracking_opt_out(headers: &HeaderMap) -> bool {
    headers
        .get(VIEW_TRACKING_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .is_some_and(|value| value.eq_ignore_ascii_case("false") || value == "0")
}

/// First `X-Forwarded-For` hop, then `X-Real-IP`, then the socket peer.
pub fn client_ip(headers: &HeaderMap, extensions: &Extensions) -> Option<String> {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    if let Some(forwarded) = header_value("x-forwarded-for") {
        if let Some(first) = forwarded.split(',').map(str::trim).find(|s| !s.is_empty()) {
            return Some(first.to_string());
        }
    }
    if let Some(real_ip) = header_value("x-real-ip") {
        return Some(real_ip.to_string());
    }
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

fn truncate_chars(value: &mut String, max: usize) {
    if let Some((idx, _)) = value.char_indices().nth(max) {
        value.truncate(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_for_wins_over_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("198.51.100.2"));
        assert_eq!(
            client_ip(&headers, &Extensions::new()).as_deref(),
            Some("203.0.113.7")
        );
    }

    #[test]
    fn falls_back_to_socket_peer() {
        let mut extensions = Extensions::new();
        extensions.insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4000))));
        assert_eq!(
            client_ip(&HeaderMap::new(), &extensions).as_deref(),
            Some("192.0.2.1")
        );
        assert_eq!(client_ip(&HeaderMap::new(), &Extensions::new()), None);
    }

    #[test]
    fn only_false_disables_view_tracking() {
        let mut headers = HeaderMap::new();
        assert!(!tracking_opt_out(&headers));
        headers.insert(VIEW_TRACKING_HEADER, HeaderValue::from_static("False"));
        assert!(tracking_opt_out(&headers));
        headers.insert(VIEW_TRACKING_HEADER, HeaderValue::from_static("true"));
        assert!(!tracking_opt_out(&headers));
    }
}
