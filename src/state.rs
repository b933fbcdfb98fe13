use std::path::PathBuf;
use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::RoleTokens;
use crate::rate_limit::RateLimiter;

/// Shared state handed to every handler. Owned instances rather than
/// globals, so tests can build isolated copies.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub tokens: RoleTokens,
    pub request_limiter: Arc<RateLimiter>,
    pub report_path: PathBuf,
}
