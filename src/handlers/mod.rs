pub mod auth;
pub mod dashboard;
pub mod items;

use axum::http::StatusCode;
use axum::response::Html;
use tracing::error;

use crate::error::StockError;
use crate::views;

/// Log internal failures with context; user-facing failures stay quiet.
pub(crate) fn log_failure(err: &StockError, action: &'static str) {
    if err.is_internal() {
        error!(error = %err, action, "request failed");
    }
}

pub async fn not_found() -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(views::error_page(StatusCode::NOT_FOUND, "Page not found")),
    )
}
