use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use roomance::config::{Settings, StorageBackend};
use roomance::routes::{self, AppState};
use roomance::services::{CacheManager, CachedProfileStore, PostgresClient, Storage};
use std::sync::Arc;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

async fn build_storage(settings: &Settings) -> std::io::Result<Storage> {
    let storage = match settings.database.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on restart");
            Storage::in_memory()
        }
        StorageBackend::Postgres => {
            let postgres = PostgresClient::from_settings(
                &settings.database.url,
                settings.database.max_connections,
                settings.database.min_connections,
                settings.database.acquire_timeout_secs,
                settings.database.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::other(e)
            })?;

            info!(
                "PostgreSQL client initialized (max: {} connections)",
                settings.database.max_connections.unwrap_or(10)
            );
            Storage::from_backend(Arc::new(postgres))
        }
    };

    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = match &settings.cache.redis_url {
        Some(redis_url) => match CacheManager::new(redis_url, cache_ttl).await {
            Ok(cache) => cache,
            Err(e) => {
                warn!("Failed to connect to Redis ({}), profile cache runs in-process", e);
                CacheManager::in_memory(l1_cache_size, cache_ttl)
            }
        },
        None => CacheManager::in_memory(l1_cache_size, cache_ttl),
    };

    if cache.stats().l2_enabled {
        info!("Profile cache initialized (Redis, TTL: {}s)", cache_ttl);
    } else {
        info!(
            "Profile cache initialized (in-process, {} entries, TTL: {}s)",
            l1_cache_size, cache_ttl
        );
    }

    let profiles = CachedProfileStore::new(storage.profiles.clone(), Arc::new(cache));
    Ok(storage.with_profiles(Arc::new(profiles)))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            init_tracing("info", "pretty");
            error!("Failed to load configuration: {}", e);
            return Err(std::io::Error::other(e));
        }
    };

    init_tracing(&settings.logging.level, &settings.logging.format);
    info!("Starting Roomance backend...");

    let storage = build_storage(&settings).await?;
    let app_state = AppState::new(storage, settings.chat.clone());

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
            .app_data(routes::query_config())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
