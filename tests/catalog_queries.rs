use std::sync::Arc;

use chrono::Duration;
use dealership_core::application::{
    commands::tracking::RecordSiteVisitCommand,
    error::ApplicationError,
    queries::{
        analytics::{AnalyticsSummaryQuery, ListSiteVisitsQuery},
        listings::{ListListingsQuery, ViewListingQuery},
    },
    services::ServiceSettings,
};
use dealership_core::infrastructure::util::DefaultSlugGenerator;

mod support;

use support::{ListingBuilder, TestServices, admin_user, build_services, powerless_user};

async fn seeded() -> TestServices {
    let ctx = build_services(Arc::new(DefaultSlugGenerator), ServiceSettings::default());
    let cars = [
        ListingBuilder::new().make("Audi").model("A4").year(2019).price(18_500),
        ListingBuilder::new().make("Audi").model("Q5").year(2021).price(34_000),
        ListingBuilder::new().make("BMW").model("320d").year(2018).price(15_900),
        ListingBuilder::new().make("Volvo").model("V60").year(2020).price(24_250),
    ];
    for car in cars {
        ctx.services
            .listing_commands
            .create_listing(&admin_user(), car.command())
            .await
            .unwrap();
    }
    ctx
}

fn visit(path: &str, session: &str) -> RecordSiteVisitCommand {
    RecordSiteVisitCommand {
        path: path.to_string(),
        session_id: session.to_string(),
        ip_address: None,
        user_agent: None,
        referrer: None,
        is_read: true,
        analytics_tagged: false,
    }
}

#[tokio::test]
async fn listing_filters_and_sorting() {
    let ctx = seeded().await;
    let queries = &ctx.services.listing_queries;

    let audis = queries
        .list_listings(ListListingsQuery {
            make: Some("audi".into()),
            sort: Some("price_desc".into()),
            ..ListListingsQuery::default()
        })
        .await
        .unwrap();
    let models: Vec<&str> = audis.items.iter().map(|l| l.model.as_str()).collect();
    assert_eq!(audis.total, 2);
    assert_eq!(models, ["Q5", "A4"]);

    let affordable = queries
        .list_listings(ListListingsQuery {
            max_price: Some(20_000),
            sort: Some("price_asc".into()),
            ..ListListingsQuery::default()
        })
        .await
        .unwrap();
    let prices: Vec<Option<i64>> = affordable.items.iter().map(|l| l.price).collect();
    assert_eq!(prices, [Some(15_900), Some(18_500)]);

    let searched = queries
        .list_listings(ListListingsQuery {
            search: Some("v60".into()),
            ..ListListingsQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(searched.total, 1);
    assert_eq!(searched.items[0].make, "Volvo");
}

#[tokio::test]
async fn listing_pages_report_totals() {
    let ctx = seeded().await;
    let page = ctx
        .services
        .listing_queries
        .list_listings(ListListingsQuery {
            page: Some(2),
            page_size: Some(3),
            ..ListListingsQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.items.len(), 1);
}

#[tokio::test]
async fn listing_query_rejects_bad_input() {
    let ctx = seeded().await;
    let queries = &ctx.services.listing_queries;

    let err = queries
        .list_listings(ListListingsQuery {
            sort: Some("cheapest".into()),
            ..ListListingsQuery::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Validation(_)));

    let err = queries
        .list_listings(ListListingsQuery {
            min_price: Some(30_000),
            max_price: Some(10_000),
            ..ListListingsQuery::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Validation(_)));
}

#[tokio::test]
async fn summary_aggregates_visits_and_views() {
    let ctx = seeded().await;
    let services = &ctx.services;

    let popular = services
        .listing_queries
        .list_listings(ListListingsQuery {
            model: Some("Q5".into()),
            ..ListListingsQuery::default()
        })
        .await
        .unwrap()
        .items
        .remove(0);
    for session in ["sess-a", "sess-b"] {
        services
            .listing_queries
            .view_listing(ViewListingQuery {
                slug: popular.slug.clone(),
                session_id: session.into(),
                ip_address: None,
                suppress_tracking: false,
            })
            .await
            .unwrap();
    }

    services.tracking.record_site_visit(visit("/", "sess-a")).await;
    services.tracking.record_site_visit(visit("/cars", "sess-a")).await;
    ctx.clock.advance(Duration::days(1));
    services.tracking.record_site_visit(visit("/", "sess-b")).await;

    let summary = services
        .analytics_queries
        .summary(&admin_user(), AnalyticsSummaryQuery { days: Some(7) })
        .await
        .unwrap();
    assert_eq!(summary.days, 7);
    assert_eq!(summary.unique_visitors, 2);
    assert_eq!(summary.total_page_views, 3);
    assert_eq!(summary.listing_views, 2);
    assert_eq!(summary.most_viewed[0].slug, popular.slug);
    assert_eq!(summary.most_viewed[0].views, 2);
    let per_day: Vec<u64> = summary.daily_visits.iter().map(|d| d.views).collect();
    assert_eq!(per_day, [2, 1]);
}

#[tokio::test]
async fn summary_validates_range_and_capability() {
    let ctx = seeded().await;
    let analytics = &ctx.services.analytics_queries;

    let err = analytics
        .summary(&admin_user(), AnalyticsSummaryQuery { days: Some(0) })
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Validation(_)));

    let err = analytics
        .summary(&powerless_user(), AnalyticsSummaryQuery { days: None })
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Forbidden(_)));
}

#[tokio::test]
async fn site_visit_log_pages_newest_first() {
    let ctx = seeded().await;
    for path in ["/a", "/b", "/c"] {
        ctx.services.tracking.record_site_visit(visit(path, "sess-a")).await;
        ctx.clock.advance(Duration::seconds(1));
    }

    let analytics = &ctx.services.analytics_queries;
    let first = analytics
        .list_site_visits(
            &admin_user(),
            ListSiteVisitsQuery {
                limit: Some(2),
                cursor: None,
            },
        )
        .await
        .unwrap();
    let paths: Vec<&str> = first.items.iter().map(|v| v.path.as_str()).collect();
    assert_eq!(paths, ["/c", "/b"]);
    assert!(first.has_more);

    let second = analytics
        .list_site_visits(
            &admin_user(),
            ListSiteVisitsQuery {
                limit: Some(2),
                cursor: first.next_cursor.clone(),
            },
        )
        .await
        .unwrap();
    let paths: Vec<&str> = second.items.iter().map(|v| v.path.as_str()).collect();
    assert_eq!(paths, ["/a"]);
    assert!(second.next_cursor.is_none());

    let err = analytics
        .list_site_visits(
            &admin_user(),
            ListSiteVisitsQuery {
                limit: None,
                cursor: Some("garbage!".into()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApplicationError::Validation(_)));
}
