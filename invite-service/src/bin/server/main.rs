use std::sync::Arc;

use auth::SignedTokenIssuer;
use auth::TokenConfig;
use invite_service::config::Config;
use invite_service::config::StoreBackend;
use invite_service::domain::account::models::EmailAddress;
use invite_service::domain::session::ports::AuthServicePort;
use invite_service::domain::session::service::AuthService;
use invite_service::inbound::http::rate_limit::RateLimitConfig;
use invite_service::inbound::http::rate_limit::RateLimiter;
use invite_service::inbound::http::router::create_router;
use invite_service::outbound::repositories::PostgresAccountDirectory;
use invite_service::outbound::stores::InMemoryInvitationTokenStore;
use invite_service::outbound::stores::RedisInvitationTokenStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "invite_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "invite-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        invitation_store = ?config.invitation.store,
        invitation_ttl_hours = config.invitation.ttl_hours,
        deadline_ms = config.auth.deadline_ms,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let issuer = Arc::new(SignedTokenIssuer::new(TokenConfig::new(
        config.jwt.secret.clone(),
        config.jwt.access_token_expiry_secs,
        config.jwt.refresh_token_expiry_secs,
    )));
    let directory = Arc::new(PostgresAccountDirectory::new(pg_pool));
    let deadline = config.auth.deadline();
    let admin_emails = config
        .auth
        .admin_emails
        .iter()
        .map(|email| EmailAddress::new(email.clone()))
        .collect::<Result<Vec<_>, _>>()?;

    let auth_service: Arc<dyn AuthServicePort> = match config.invitation.store {
        StoreBackend::Redis => {
            let store = RedisInvitationTokenStore::connect(
                &config.redis.url,
                config.redis.key_prefix.clone(),
                config.invitation.ttl(),
            )
            .await?;
            tracing::info!(
                key_prefix = %config.redis.key_prefix,
                "Redis invitation store connected"
            );
            Arc::new(
                AuthService::new(directory, Arc::new(store), issuer, deadline)
                    .with_admin_emails(admin_emails),
            )
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory invitation store; tokens are lost on restart");
            let store = InMemoryInvitationTokenStore::new(config.invitation.ttl());
            Arc::new(
                AuthService::new(directory, Arc::new(store), issuer, deadline)
                    .with_admin_emails(admin_emails),
            )
        }
    };

    let rate_limiter = RateLimiter::new(RateLimitConfig {
        max_requests: config.rate_limit.max_requests,
        window: std::time::Duration::from_secs(config.rate_limit.window_secs),
    });

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(auth_service, rate_limiter)).await?;

    Ok(())
}
