use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::database::connection::DatabaseManager;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub database: DatabaseHealth,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub status: String,
    pub connection_pool_size: u32,
    pub response_time_ms: u64,
}

impl DatabaseHealth {
    /// Round-trips a trivial query through the pool.
    async fn measure(db: &DatabaseManager) -> Self {
        let started = Instant::now();
        let reachable = match sqlx::query("SELECT 1").fetch_one(&db.pool).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, "database ping failed");
                false
            }
        };

        Self {
            status: status_label(reachable).to_string(),
            connection_pool_size: db.pool.size(),
            response_time_ms: started.elapsed().as_millis() as u64,
        }
    }

    fn is_healthy(&self) -> bool {
        self.status == status_label(true)
    }
}

fn status_label(healthy: bool) -> &'static str {
    if healthy {
        "healthy"
    } else {
        "unhealthy"
    }
}

#[derive(Clone)]
struct HealthState {
    db: Arc<DatabaseManager>,
    started_at: DateTime<Utc>,
}

/// Health endpoints served next to the bot on `HTTP_PORT`.
pub struct HealthService {
    pub router: Router,
}

impl HealthService {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        let state = HealthState {
            db,
            started_at: Utc::now(),
        };

        let router = Router::new()
            .route("/health", get(health_check))
            .route("/health/ready", get(readiness_check))
            .route("/health/live", get(|| async { Json("alive") }))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
            .with_state(state);

        Self { router }
    }
}

/// Always returns a report; the status code is 503 when the database is unreachable.
async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let database = DatabaseHealth::measure(&state.db).await;
    let code = if database.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let now = Utc::now();
    let report = HealthResponse {
        status: database.status.clone(),
        timestamp: now,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: now.signed_duration_since(state.started_at).num_seconds().max(0) as u64,
        database,
    };

    (code, Json(report))
}

/// Ready only once the invite schema exists.
async fn readiness_check(State(state): State<HealthState>) -> Result<Json<&'static str>, StatusCode> {
    sqlx::query("SELECT 1 FROM invite_tokens LIMIT 1")
        .fetch_optional(&state.db.pool)
        .await
        .map(|_| Json("ready"))
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)
}
