/// Configuration management for post-service
///
/// All settings come from environment variables with development-friendly
/// defaults, loaded once at startup.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub kafka: KafkaConfig,
    pub remote: RemoteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
    /// Grace period for in-flight requests at shutdown, in seconds.
    pub shutdown_grace_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafkaConfig {
    pub brokers: String,
    pub group_id: String,
    /// Topic carrying profile-change events from the user service.
    pub profile_events_topic: String,
    /// Dead-letter topic for events that exhaust their retries.
    pub dlq_topic: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub user_service_url: String,
    pub image_service_url: String,
    /// Bound on every outbound remote call, in milliseconds.
    pub request_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) if app_env.eq_ignore_ascii_case("production") => {
                return Err("DATABASE_URL must be set in production".to_string())
            }
            Err(_) => "postgresql://localhost/posts".to_string(),
        };

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("POST_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("POST_SERVICE_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8084),
                shutdown_grace_secs: std::env::var("SHUTDOWN_GRACE_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|c| c.parse().ok())
                    .unwrap_or(10),
            },
            kafka: KafkaConfig {
                brokers: std::env::var("KAFKA_BROKERS")
                    .unwrap_or_else(|_| "localhost:9092".to_string()),
                group_id: std::env::var("KAFKA_GROUP_ID")
                    .unwrap_or_else(|_| "post-service".to_string()),
                profile_events_topic: std::env::var("KAFKA_PROFILE_EVENTS_TOPIC")
                    .unwrap_or_else(|_| "user.profile.updated".to_string()),
                dlq_topic: std::env::var("KAFKA_PROFILE_EVENTS_DLQ_TOPIC")
                    .unwrap_or_else(|_| "user.profile.updated.dlq".to_string()),
            },
            remote: RemoteConfig {
                user_service_url: std::env::var("USER_SERVICE_URL")
                    .unwrap_or_else(|_| "http://user-service:8082".to_string()),
                image_service_url: std::env::var("IMAGE_SERVICE_URL")
                    .unwrap_or_else(|_| "http://image-service:8083".to_string()),
                request_timeout_ms: std::env::var("REMOTE_REQUEST_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10_000),
            },
        })
    }
}
