/// Which request paths count as site visits.
#[derive(Debug, Clone)]
pub struct SiteVisitPolicy {
    excluded_prefixes: Vec<String>,
    api_prefix: String,
}

impl SiteVisitPolicy {
    pub fn new(excluded_prefixes: Vec<String>, api_prefix: impl Into<String>) -> Self {
        Self {
            excluded_prefixes,
            api_prefix: api_prefix.into(),
        }
    }

    pub fn excluded_prefixes(&self) -> &[String] {
        &self.excluded_prefixes
    }
}

impl Default for SiteVisitPolicy {
    fn default() -> Self {
        Self::new(vec!["/static/".into(), "/media/".into()], "/api/")
    }
}

/// Asset paths are never tracked. API calls are tracked only when they are
/// reads explicitly tagged for analytics by the caller.
pub struct TrackableVisitSpec<'a> {
    policy: &'a SiteVisitPolicy,
    path: &'a str,
    is_read: bool,
    analytics_tagged: bool,
}

impl<'a> TrackableVisitSpec<'a> {
    pub fn new(
        policy: &'a SiteVisitPolicy,
        path: &'a str,
        is_read: bool,
        analytics_tagged: bool,
    ) -> Self {
        Self {
            policy,
            path,
            is_read,
            analytics_tagged,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        if self
            .policy
            .excluded_prefixes
            .iter()
            .any(|prefix| self.path.starts_with(prefix.as_str()))
        {
            return false;
        }

        if self.path.starts_with(self.policy.api_prefix.as_str()) {
            return self.is_read && self.analytics_tagged;
        }

        true
    }
}
