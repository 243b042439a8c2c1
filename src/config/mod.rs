use std::env;

pub mod cors;
pub mod security;

pub use cors::create_cors_layer;
pub use security::create_security_headers_layer;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_TOKEN_EXPIRY_HOURS: i64 = 24;

pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub token_expiry_hours: i64,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, falling back to development secret");
            "dev-secret-change-me".to_string()
        });

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/eventhub".to_string()),
            jwt_secret,
            token_expiry_hours: env::var("TOKEN_EXPIRY_HOURS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_EXPIRY_HOURS),
            port: env::var("PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        }
    }
}
