// src/presentation/http/middleware/visitor_session.rs
use crate::domain::tracking::VisitorSessionId;
use crate::presentation::http::state::{HttpState, SessionCookieSettings};
use axum::{
    body::Body,
    http::{HeaderValue, Request, header::SET_COOKIE},
    middleware::Next,
    response::Response,
};
use cookie::{Cookie as SetCookie, SameSite, time::Duration};
use headers::{Cookie, HeaderMapExt};
use tracing::warn;
use uuid::Uuid;

/// Opaque visitor identity for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitorSession {
    pub id: String,
    /// Issued by this request rather than read from the cookie.
    pub is_new: bool,
}

impl VisitorSession {
    fn resolve(req: &Request<Body>, cookie_name: &str) -> Self {
        let existing = req
            .headers()
            .typed_get::<Cookie>()
            .and_then(|cookie| cookie.get(cookie_name).map(str::to_string))
            .filter(|value| VisitorSessionId::is_well_formed(value));

        match existing {
            Some(id) => Self { id, is_new: false },
            None => Self {
                id: Uuid::new_v4().to_string(),
                is_new: true,
            },
        }
    }
}

pub fn session_cookie(settings: &SessionCookieSettings, session_id: &str) -> SetCookie<'static> {
    let max_age = i64::try_from(settings.max_age_secs).unwrap_or(i64::MAX);
    SetCookie::build((settings.name.clone(), session_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .max_age(Duration::seconds(max_age))
        .build()
}

/// Reads or issues the visitor session, exposes it to handlers through
/// request extensions and refreshes the cookie on the way out.
pub async fn visitor_session(mut req: Request<Body>, next: Next) -> Response {
    let settings = req
        .extensions()
        .get::<HttpState>()
        .map(|state| state.session_cookie.clone())
        .unwrap_or_default();

    let session = VisitorSession::resolve(&req, &settings.name);
    req.extensions_mut().insert(session.clone());

    let mut response = next.run(req).await;

    match HeaderValue::from_str(&session_cookie(&settings, &session.id).to_string()) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        Err(err) => warn!(error = %err, "could not encode visitor session cookie"),
    }
    response
}
