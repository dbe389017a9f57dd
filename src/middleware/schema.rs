use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::error;

use crate::db::InventoryStorage;

/// Make sure the schema exists before any routed request runs. After the
/// first success this is a single once-cell read. Failures are logged and the
/// request continues; handlers then surface the storage error themselves.
pub async fn schema_guard(
    State(storage): State<InventoryStorage>,
    req: Request,
    next: Next,
) -> Response {
    if let Err(e) = storage.ensure_schema().await {
        error!(error = %e, "database initialization failed");
    }
    next.run(req).await
}
