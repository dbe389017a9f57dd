use chrono::NaiveDateTime;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2 PHC string; never rendered.
    #[sqlx(rename = "password")]
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct StockItem {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub description: Option<String>,
    /// UTC, as written by SQLite's `CURRENT_TIMESTAMP`.
    pub created_at: NaiveDateTime,
}

impl StockItem {
    pub fn value(&self) -> f64 {
        self.quantity as f64 * self.price
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity < super::schema::LOW_STOCK_THRESHOLD
    }
}

/// Aggregate shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashboardSummary {
    pub total_items: i64,
    pub total_value: f64,
    pub low_stock_count: i64,
}

/// Validated field set written by add and edit.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStockItem {
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub description: Option<String>,
}
