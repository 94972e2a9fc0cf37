//! Commission engine service entry point.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commission_engine::adapters::cache::{InMemoryRateCache, RedisRateCache};
use commission_engine::adapters::gateway::{AsaasConfig, AsaasGateway};
use commission_engine::adapters::http::{app_router, AppState};
use commission_engine::adapters::postgres::{
    PostgresPayoutRepository, PostgresRateRepository, PostgresReconciliationQueue,
    PostgresStoreRepository, PostgresTransactionRepository, PostgresWebhookEventRepository,
};
use commission_engine::application::handlers::{
    CreatePayoutHandler, IngestWebhookHandler, ManageRatesHandler, RateResolver,
    RecordCommissionHandler, UpdatePayoutStatusHandler,
};
use commission_engine::config::AppConfig;
use commission_engine::ports::RateCache;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.server.log_level)
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    // Repositories
    let rates = Arc::new(PostgresRateRepository::new(pool.clone()));
    let transactions = Arc::new(PostgresTransactionRepository::new(pool.clone()));
    let payouts = Arc::new(PostgresPayoutRepository::new(pool.clone()));
    let stores = Arc::new(PostgresStoreRepository::new(pool.clone()));
    let webhook_events = Arc::new(PostgresWebhookEventRepository::new(pool.clone()));
    let reconciliation = Arc::new(PostgresReconciliationQueue::new(pool.clone()));

    // Rate cache: Redis when configured, in-process otherwise
    let cache: Arc<dyn RateCache> = match &config.cache.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            let conn = client.get_multiplexed_tokio_connection().await?;
            tracing::info!("using redis rate cache");
            Arc::new(RedisRateCache::new(conn, config.cache.ttl_secs))
        }
        None => {
            tracing::info!("using in-process rate cache");
            Arc::new(InMemoryRateCache::new(Duration::from_secs(
                config.cache.ttl_secs,
            )))
        }
    };

    // Payment gateway
    let mut gateway_config = AsaasConfig::new(
        config.gateway.api_key.clone(),
        config.gateway.webhook_secret.clone(),
    )
    .with_request_timeout(Duration::from_secs(config.gateway.request_timeout_secs));
    if let Some(base_url) = &config.gateway.api_base_url {
        gateway_config = gateway_config.with_base_url(base_url.clone());
    }
    let gateway = Arc::new(AsaasGateway::new(gateway_config)?);

    // Command handlers
    let resolver = Arc::new(RateResolver::new(rates.clone(), cache.clone()));
    let state = AppState {
        rates: Arc::new(ManageRatesHandler::new(
            rates.clone(),
            transactions.clone(),
            cache,
        )),
        record_commission: Arc::new(RecordCommissionHandler::new(
            stores.clone(),
            transactions.clone(),
            resolver,
        )),
        create_payout: Arc::new(CreatePayoutHandler::new(
            stores.clone(),
            transactions.clone(),
            payouts.clone(),
        )),
        update_payout_status: Arc::new(UpdatePayoutStatusHandler::new(
            payouts.clone(),
            transactions.clone(),
            reconciliation,
        )),
        ingest_webhook: Arc::new(IngestWebhookHandler::new(gateway, webhook_events, stores)),
        payout_reads: payouts,
        transaction_reads: transactions,
    };

    let addr = config.server.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "commission engine listening");
    axum::serve(listener, app_router(state)).await?;

    Ok(())
}
