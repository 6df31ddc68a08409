// src/presentation/http/middleware/site_visit.rs
use crate::application::commands::tracking::RecordSiteVisitCommand;
use crate::presentation::http::{extractors::VisitorContext, state::HttpState};
use axum::{
    body::Body,
    http::{Method, Request},
    middleware::Next,
    response::Response,
};

/// Records a deduplicated site visit for trackable requests. Must run inside
/// the visitor session middleware. Never alters the response.
pub async fn track_site_visit(req: Request<Body>, next: Next) -> Response {
    let state = req.extensions().get::<HttpState>().cloned();
    let context = VisitorContext::from_parts(req.headers(), req.extensions());

    if let (Some(state), Some(context)) = (state, context) {
        let is_read = matches!(*req.method(), Method::GET | Method::HEAD);
        state
            .services
            .tracking
            .record_site_visit(RecordSiteVisitCommand {
                path: req.uri().path().to_string(),
                session_id: context.session_id,
                ip_address: context.ip_address,
                user_agent: context.user_agent,
                referrer: context.referrer,
                is_read,
                analytics_tagged: context.analytics_tagged,
            })
            .await;
    }

    next.run(req).await
}
