//! Housecall triage engine entrypoint.
//!
//! Loads configuration, wires the adapters to the application handlers,
//! and serves the HTTP surface.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use housecall::adapters::{
    triage_router, HttpRiskClassifier, HttpRiskClassifierConfig, InMemoryLeadRepository,
    InMemoryProDirectory, InMemorySessionStore, PostgresLeadRepository, PostgresProDirectory,
    SessionStoreConfig, TracingLeadNotifier, TriageAppState,
};
use housecall::application::handlers::{
    AdvanceConversationHandler, CreateLeadHandler, MatchProsHandler, TriageService,
};
use housecall::config::AppConfig;
use housecall::ports::{LeadRepository, ProDirectory, RiskClassifier};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    let classifier: Arc<dyn RiskClassifier> = match config.classifier.endpoint.as_deref() {
        Some(endpoint) if !endpoint.is_empty() => {
            let mut classifier_config = HttpRiskClassifierConfig::new(endpoint)
                .with_timeout(config.classifier.timeout());
            if let Some(key) = &config.classifier.api_key {
                classifier_config = classifier_config.with_api_key(key.clone());
            }
            Arc::new(HttpRiskClassifier::new(classifier_config)?)
        }
        _ => return Err("HOUSECALL__CLASSIFIER__ENDPOINT is required to serve traffic".into()),
    };

    let store = Arc::new(InMemorySessionStore::new(SessionStoreConfig {
        max_sessions: config.engine.max_sessions,
        shard_count: config.engine.shard_count,
    }));

    let (lead_repository, pro_directory): (Arc<dyn LeadRepository>, Arc<dyn ProDirectory>) =
        match &config.database {
            Some(database) => {
                let pool = PgPoolOptions::new()
                    .min_connections(database.min_connections)
                    .max_connections(database.max_connections)
                    .acquire_timeout(database.acquire_timeout())
                    .connect(&database.url)
                    .await?;
                info!("Connected to PostgreSQL");
                (
                    Arc::new(PostgresLeadRepository::new(pool.clone())),
                    Arc::new(PostgresProDirectory::new(pool)),
                )
            }
            None => {
                info!("No database configured, using in-memory lead and pro adapters");
                (
                    Arc::new(InMemoryLeadRepository::new()),
                    Arc::new(InMemoryProDirectory::new()),
                )
            }
        };

    let conversation = Arc::new(AdvanceConversationHandler::new(store, classifier));
    let leads = Arc::new(CreateLeadHandler::new(
        lead_repository,
        Arc::new(TracingLeadNotifier::new()),
    ));
    let matching = Arc::new(
        MatchProsHandler::new(pro_directory).with_default_limit(config.engine.match_limit),
    );
    let service = Arc::new(TriageService::new(conversation, leads, matching));

    let app = triage_router(TriageAppState::new(service))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let addr = config.server.socket_addr()?;
    info!(%addr, "Housecall triage engine listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
