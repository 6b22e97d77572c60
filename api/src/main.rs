//! PR Reviewer API Server
//!
//! Assigns pull request reviewers from the author's team, reassigns them on
//! request, and moves open reviews away from members deactivated in bulk.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{
    routing::{get, post},
    Json, Router,
};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    PostgresPullRequestRepository, PostgresStatsRepository, PostgresTeamRepository,
    PostgresUserRepository, StdRandomSource,
};
use app::{BulkDeactivationService, PullRequestService, StatsService, TeamService, UserService};
use config::Config;

type Users = PostgresUserRepository;
type Teams = PostgresTeamRepository;
type PullRequests = PostgresPullRequestRepository;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub team_service: Arc<TeamService<Teams, Users>>,
    pub user_service: Arc<UserService<Users, PullRequests>>,
    pub pr_service: Arc<PullRequestService<Users, PullRequests, StdRandomSource>>,
    pub bulk_deactivation_service:
        Arc<BulkDeactivationService<Users, Teams, PullRequests, StdRandomSource>>,
    pub stats_service: Arc<StatsService<PostgresStatsRepository>>,
}

impl AppState {
    /// Wire every service onto one connection pool
    pub fn new(db: DatabaseConnection, random: StdRandomSource) -> Self {
        let user_repo = Arc::new(PostgresUserRepository::new(db.clone()));
        let team_repo = Arc::new(PostgresTeamRepository::new(db.clone()));
        let pr_repo = Arc::new(PostgresPullRequestRepository::new(db.clone()));
        let stats_repo = Arc::new(PostgresStatsRepository::new(db));

        let pr_service = Arc::new(PullRequestService::new(
            user_repo.clone(),
            pr_repo.clone(),
            Arc::new(random),
        ));

        let bulk_deactivation_service = Arc::new(BulkDeactivationService::new(
            user_repo.clone(),
            team_repo.clone(),
            pr_repo.clone(),
            pr_service.clone(),
        ));

        Self {
            team_service: Arc::new(TeamService::new(team_repo, user_repo.clone())),
            user_service: Arc::new(UserService::new(user_repo, pr_repo)),
            pr_service,
            bulk_deactivation_service,
            stats_service: Arc::new(StatsService::new(stats_repo)),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Routes plus middleware; a request running past `request_timeout` gets 408
/// and its handler future is dropped
fn build_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health))
        // Teams
        .route("/team/add", post(handlers::add_team))
        .route("/team/get", get(handlers::get_team))
        .route("/team/deactivateMembers", post(handlers::deactivate_members))
        // Users
        .route("/users/setIsActive", post(handlers::set_is_active))
        .route("/users/getReview", get(handlers::get_review))
        // Pull requests
        .route("/pullRequest/create", post(handlers::create_pr))
        .route("/pullRequest/merge", post(handlers::merge_pr))
        .route("/pullRequest/reassign", post(handlers::reassign_reviewer))
        // Stats
        .route("/stats/reviewers", get(handlers::reviewer_stats))
        // Middleware
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

fn init_tracing(json_logs: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,pr_reviewer_api=debug,sqlx=warn".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    init_tracing(config.json_logs);
    tracing::info!("Starting PR reviewer API...");

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .max_lifetime(config.db_max_lifetime)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .context("failed to connect to database")?;
    tracing::info!("Database connected");

    if config.run_migrations {
        adapters::run_migrations(&db)
            .await
            .context("failed to apply database schema")?;
    }

    let random = match config.random_seed {
        Some(seed) => {
            tracing::info!(seed, "using seeded reviewer selection");
            StdRandomSource::new(seed)
        }
        None => StdRandomSource::from_entropy(),
    };

    let app = build_router(AppState::new(db, random), config.request_timeout);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}
