use crate::api::response::{failure, ok};
use actix_web::{HttpResponse, get, http::StatusCode, web};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;

/// Liveness plus a round trip to the database
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database reachable", body = Object, example = json!({
            "data": {"status": "ok"}, "error": null, "meta": null
        })),
        (status = 503, description = "Database unreachable")
    ),
    tag = "Health"
)]
#[get("/health")]
pub async fn health(pool: web::Data<MySqlPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => ok(json!({"status": "ok"})),
        Err(e) => {
            error!(error = %e, "Health check failed");
            failure(
                StatusCode::SERVICE_UNAVAILABLE,
                "unavailable",
                "Database unreachable",
            )
        }
    }
}
