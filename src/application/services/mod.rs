// src/application/services/mod.rs
use std::sync::Arc;

use crate::{
    application::{
        commands::{listings::ListingCommandService, tracking::VisitTrackingService},
        ports::{security::TokenManager, time::Clock, util::SlugGenerator},
        queries::{analytics::AnalyticsQueryService, listings::ListingQueryService},
    },
    domain::{
        listing::{
            ListingReadRepository, ListingWriteRepository,
            services::{ListingSlugService, SlugPolicy},
        },
        tracking::{
            DedupWindow, ListingViewRepository, SiteVisitPolicy, SiteVisitRepository,
            TrafficStatsRepository,
        },
    },
};

/// Policy knobs resolved from configuration.
#[derive(Debug, Clone, Default)]
pub struct ServiceSettings {
    pub slug_policy: SlugPolicy,
    pub dedup_window: DedupWindow,
    pub site_visit_policy: SiteVisitPolicy,
}

pub struct ApplicationServices {
    pub listing_commands: Arc<ListingCommandService>,
    pub listing_queries: Arc<ListingQueryService>,
    pub tracking: Arc<VisitTrackingService>,
    pub analytics_queries: Arc<AnalyticsQueryService>,
    token_manager: Arc<dyn TokenManager>,
}

impl ApplicationServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        listing_write_repo: Arc<dyn ListingWriteRepository>,
        listing_read_repo: Arc<dyn ListingReadRepository>,
        view_repo: Arc<dyn ListingViewRepository>,
        visit_repo: Arc<dyn SiteVisitRepository>,
        stats_repo: Arc<dyn TrafficStatsRepository>,
        token_manager: Arc<dyn TokenManager>,
        clock: Arc<dyn Clock>,
        slugger: Arc<dyn SlugGenerator>,
        settings: ServiceSettings,
    ) -> Self {
        let slug_service = Arc::new(ListingSlugService::new(
            Arc::clone(&listing_read_repo),
            Arc::clone(&slugger),
            settings.slug_policy,
        ));

        let listing_commands = Arc::new(ListingCommandService::new(
            Arc::clone(&listing_write_repo),
            Arc::clone(&listing_read_repo),
            Arc::clone(&slug_service),
            Arc::clone(&clock),
        ));

        let tracking = Arc::new(VisitTrackingService::new(
            view_repo,
            Arc::clone(&visit_repo),
            Arc::clone(&clock),
            settings.dedup_window,
            settings.site_visit_policy,
        ));

        let listing_queries = Arc::new(ListingQueryService::new(
            Arc::clone(&listing_read_repo),
            Arc::clone(&tracking),
        ));

        let analytics_queries = Arc::new(AnalyticsQueryService::new(
            stats_repo,
            visit_repo,
            Arc::clone(&clock),
        ));

        Self {
            listing_commands,
            listing_queries,
            tracking,
            analytics_queries,
            token_manager,
        }
    }

    pub fn token_manager(&self) -> Arc<dyn TokenManager> {
        Arc::clone(&self.token_manager)
    }
}
