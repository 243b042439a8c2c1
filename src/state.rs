use sqlx::PgPool;

use crate::auth::AuthKeys;

/// Shared per-request context: the connection pool and token signing material.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: AuthKeys,
}

impl AppState {
    pub fn new(pool: PgPool, auth: AuthKeys) -> Self {
        Self { pool, auth }
    }
}
