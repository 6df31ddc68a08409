use anyhow::Result;
use dealership_core::application::{
    ports::{security::TokenManager, time::Clock, util::SlugGenerator},
    services::{ApplicationServices, ServiceSettings},
};
use dealership_core::config::AppConfig;
use dealership_core::domain::{
    listing::{ListingReadRepository, ListingWriteRepository},
    tracking::{ListingViewRepository, SiteVisitRepository, TrafficStatsRepository},
};
use dealership_core::infrastructure::{
    database,
    repositories::{
        InMemoryStore, PostgresListingReadRepository, PostgresListingViewRepository,
        PostgresListingWriteRepository, PostgresSiteVisitRepository,
        PostgresTrafficStatsRepository,
    },
    security::token::StaticTokenManager,
    time::SystemClock,
    util::DefaultSlugGenerator,
};
use dealership_core::presentation::http::{routes::build_router_with_options, state::HttpState};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct Repositories {
    listing_write: Arc<dyn ListingWriteRepository>,
    listing_read: Arc<dyn ListingReadRepository>,
    views: Arc<dyn ListingViewRepository>,
    visits: Arc<dyn SiteVisitRepository>,
    stats: Arc<dyn TrafficStatsRepository>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let repos = build_repositories(&config).await?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::default());
    let token_manager: Arc<dyn TokenManager> = Arc::new(StaticTokenManager::new(
        config.admin_api_token(),
        Arc::clone(&clock),
    ));
    let slugger: Arc<dyn SlugGenerator> = Arc::new(DefaultSlugGenerator::default());

    let settings = ServiceSettings {
        slug_policy: config.slug_policy(),
        dedup_window: config.dedup_window()?,
        site_visit_policy: config.site_visit_policy(),
    };

    let services = Arc::new(ApplicationServices::new(
        repos.listing_write,
        repos.listing_read,
        repos.views,
        repos.visits,
        repos.stats,
        Arc::clone(&token_manager),
        Arc::clone(&clock),
        Arc::clone(&slugger),
        settings,
    ));

    let state = HttpState::new(Arc::clone(&services), config.session_cookie().clone());
    let app = build_router_with_options(
        state,
        config.rate_limit(),
        config.allowed_origins(),
    );

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn build_repositories(config: &AppConfig) -> Result<Repositories> {
    if config.uses_memory_store() {
        tracing::warn!("using in-memory storage; data is lost on restart");
        let store = InMemoryStore::new();
        return Ok(Repositories {
            listing_write: Arc::new(store.clone()),
            listing_read: Arc::new(store.clone()),
            views: Arc::new(store.clone()),
            visits: Arc::new(store.clone()),
            stats: Arc::new(store),
        });
    }

    let pool = database::init_pool(config.database_url()).await?;
    database::run_migrations(&pool).await?;

    Ok(Repositories {
        listing_write: Arc::new(PostgresListingWriteRepository::new(pool.clone())),
        listing_read: Arc::new(PostgresListingReadRepository::new(pool.clone())),
        views: Arc::new(PostgresListingViewRepository::new(pool.clone())),
        visits: Arc::new(PostgresSiteVisitRepository::new(pool.clone())),
        stats: Arc::new(PostgresTrafficStatsRepository::new(pool)),
    })
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
