use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

use crate::views;

#[derive(Debug, ThisError)]
pub enum StockError {
    #[error("{0}")]
    Validation(String),

    #[error("Item {0} not found")]
    NotFound(i64),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Password hash error: {0}")]
    PasswordHash(#[from] argon2::password_hash::Error),

    #[error("Blocking task failed: {0}")]
    Blocking(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),
}

impl StockError {
    /// Message safe to show to the end user. Internal failures collapse into a
    /// generic notice; the detail only goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            StockError::Validation(msg) => msg.clone(),
            StockError::NotFound(_) => "Item not found".to_string(),
            StockError::InvalidCredentials => "Invalid username or password".to_string(),
            StockError::Database(_)
            | StockError::PasswordHash(_)
            | StockError::Blocking(_)
            | StockError::Config(_)
            | StockError::Figment(_) => "An error occurred. Please try again.".to_string(),
        }
    }

    /// True for failures the operator needs to see in the log.
    pub fn is_internal(&self) -> bool {
        !matches!(
            self,
            StockError::Validation(_) | StockError::NotFound(_) | StockError::InvalidCredentials
        )
    }

    pub fn status(&self) -> StatusCode {
        match self {
            StockError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StockError::NotFound(_) => StatusCode::NOT_FOUND,
            StockError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for StockError {
    fn into_response(self) -> axum::response::Response {
        if self.is_internal() {
            error!(error = %self, "request failed");
        }
        let status = self.status();
        let page = views::error_page(status, &self.user_message());
        (status, Html(page)).into_response()
    }
}
