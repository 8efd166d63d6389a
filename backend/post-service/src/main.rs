use std::io;
use std::sync::Arc;
use std::time::Duration;

use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use post_service::clients::{HttpImageClient, HttpProfileClient};
use post_service::consumers::ProfileEventsConsumer;
use post_service::db::{PgPostStore, PostStore};
use post_service::handlers;
use post_service::services::{FeedReader, PostService};
use sqlx::postgres::PgPoolOptions;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

async fn health_summary(store: web::Data<PgPostStore>) -> HttpResponse {
    match store.health_check().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "post-service",
            "version": env!("CARGO_PKG_VERSION"),
        })),
        Err(e) => {
            tracing::error!("health check failed: {e}");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unhealthy",
                "service": "post-service",
            }))
        }
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = match post_service::Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("configuration loading failed: {e}");
            eprintln!("ERROR: failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!("starting post-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("environment: {}", config.app.env);

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("database connect: {e}")))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("migrations: {e}")))?;

    tracing::info!("connected to database, schema up to date");

    let pg_store = PgPostStore::new(pool);
    let store: Arc<dyn PostStore> = Arc::new(pg_store.clone());

    let timeout = Duration::from_millis(config.remote.request_timeout_ms);
    let profiles = Arc::new(
        HttpProfileClient::new(&config.remote.user_service_url, timeout)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?,
    );
    let images = Arc::new(
        HttpImageClient::new(&config.remote.image_service_url, timeout)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?,
    );

    let post_service = web::Data::new(PostService::new(store.clone(), profiles, images));
    let feed_reader = web::Data::new(FeedReader::new(store.clone()));
    let store_data = web::Data::new(pg_store);

    let consumer = ProfileEventsConsumer::new(&config.kafka, store.clone())
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("kafka consumer: {e}")))?;

    let (shutdown_tx, _) = broadcast::channel(1);
    let consumer_shutdown = shutdown_tx.subscribe();

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("starting HTTP server at {bind_address}");

    let server = HttpServer::new(move || {
        App::new()
            .app_data(post_service.clone())
            .app_data(feed_reader.clone())
            .app_data(store_data.clone())
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/api/v1/health", web::get().to(health_summary))
            .service(
                web::scope("/api/v1/posts")
                    .service(
                        web::resource("")
                            .route(web::post().to(handlers::create_post))
                            .route(web::get().to(handlers::list_posts)),
                    )
                    .service(
                        web::resource("/user/{owner_id}")
                            .route(web::get().to(handlers::list_posts_by_owner)),
                    )
                    .service(
                        web::resource("/{post_id}")
                            .route(web::get().to(handlers::get_post))
                            .route(web::post().to(handlers::update_post))
                            .route(web::delete().to(handlers::delete_post)),
                    ),
            )
    })
    .bind(&bind_address)?
    .shutdown_timeout(config.app.shutdown_grace_secs)
    .run();

    let server_handle = server.handle();

    let mut tasks: JoinSet<io::Result<()>> = JoinSet::new();

    tasks.spawn(async move {
        tracing::info!("HTTP server is running");
        server.await
    });

    tasks.spawn(async move {
        consumer
            .run(consumer_shutdown)
            .await
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
    });

    let mut first_error: Option<io::Error> = None;

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = tasks.join_next() => {
                match result {
                    Some(Ok(Ok(_))) => {
                        tracing::info!("background task completed");
                    }
                    Some(Ok(Err(e))) => {
                        tracing::error!("task returned error: {e}");
                        if first_error.is_none() {
                            first_error = Some(e);
                        }
                        let _ = shutdown_tx.send(());
                        server_handle.stop(true).await;
                        tasks.shutdown().await;
                        break;
                    }
                    Some(Err(e)) => {
                        tracing::error!("task join error: {e}");
                        if first_error.is_none() {
                            first_error = Some(io::Error::new(io::ErrorKind::Other, e.to_string()));
                        }
                        let _ = shutdown_tx.send(());
                        server_handle.stop(true).await;
                        tasks.shutdown().await;
                        break;
                    }
                    None => break,
                }
            }
            _ = &mut shutdown => {
                tracing::info!("shutdown signal received");
                let _ = shutdown_tx.send(());
                server_handle.stop(true).await;
                tasks.shutdown().await;
                break;
            }
        }
    }

    tracing::info!("post-service shut down");

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
