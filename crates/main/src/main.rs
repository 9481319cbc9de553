//! Application entry point.
//!
//! Wires the PostgreSQL repositories into the event and chat services and
//! serves the HTTP and WebSocket API.

use std::sync::Arc;

use application::{
    ChatService, ChatServiceDependencies, Clock, EventService, EventServiceDependencies,
    LocalMessageBroadcaster, MessageBroadcaster, SystemClock,
};
use config::AppConfig;
use infrastructure::{create_pg_pool, PgEventRepository, PgFamilyGroupRepository};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env_with_defaults();

    let redacted_db = config
        .database
        .url
        .split('@')
        .next_back()
        .unwrap_or("unknown");
    tracing::info!(database = redacted_db, "connecting to database");

    let pg_pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;
    sqlx::migrate!("../../migrations").run(&pg_pool).await?;

    let group_repository = Arc::new(PgFamilyGroupRepository::new(pg_pool.clone()));
    let event_repository = Arc::new(PgEventRepository::new(pg_pool));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let broadcaster = LocalMessageBroadcaster::new(config.broadcast.capacity);

    let event_service = EventService::new(EventServiceDependencies {
        group_repository: group_repository.clone(),
        event_repository,
        clock: clock.clone(),
    });

    let chat_service = ChatService::new(ChatServiceDependencies {
        group_repository,
        clock,
        broadcaster: Arc::new(broadcaster.clone()) as Arc<dyn MessageBroadcaster>,
    });

    let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));

    let state = AppState::new(
        Arc::new(event_service),
        Arc::new(chat_service),
        broadcaster,
        jwt_service,
    );

    let app = router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, "familyhub server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
