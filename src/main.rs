use std::sync::Arc;

use dotenvy::dotenv;
use order_ingest::application::ingest::IngestPipeline;
use order_ingest::application::order_service::OrderService;
use order_ingest::cache::OrderCache;
use order_ingest::config::{AppConfig, ConfigError};
use order_ingest::domain::errors::StoreError;
use order_ingest::infrastructure::kafka::KafkaSource;
use order_ingest::infrastructure::order_repo::DieselOrderRepository;
use order_ingest::{build_server, create_pool, run_migrations};
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error)]
enum StartupError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("order store is unreachable: {0}")]
    StoreConnection(#[from] diesel::r2d2::PoolError),
    #[error("failed to run database migrations: {0}")]
    Migrations(String),
    #[error("failed to warm the cache: {0}")]
    Warmup(#[from] StoreError),
    #[error("failed to create Kafka consumer: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[actix_web::main]
async fn main() {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    if let Err(e) = run().await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let cfg = AppConfig::from_env()?;

    let pool = create_pool(&cfg.database_url)?;
    run_migrations(&pool).map_err(|e| StartupError::Migrations(e.to_string()))?;
    let repo = Arc::new(DieselOrderRepository::new(pool));

    let cache = Arc::new(OrderCache::new(cfg.cache_capacity));
    let service = OrderService::new(repo.clone(), Arc::clone(&cache));
    let warmed = service.warm(cfg.cache_warm_limit)?;
    log::info!(
        "Cache warmed with {} orders (capacity {})",
        warmed,
        cache.capacity()
    );

    let source = KafkaSource::new(&cfg.kafka)?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let pipeline = IngestPipeline::new(repo, Arc::clone(&cache), source);
    let consumer = tokio::spawn(pipeline.run(shutdown_rx));

    log::info!("Starting server at http://{}:{}", cfg.host, cfg.port);
    let served = match build_server(service, cfg.static_dir.clone(), &cfg.host, cfg.port) {
        Ok(server) => server.await,
        Err(e) => Err(e),
    };

    // Stop consuming once the HTTP side is gone, whichever way it ended.
    let _ = shutdown_tx.send(true);
    match consumer.await {
        Ok(summary) => log::info!("Consumer stopped: {:?}", summary),
        Err(e) => log::error!("Consumer task failed: {}", e),
    }

    served?;
    Ok(())
}
