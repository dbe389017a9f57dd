//! Database module: models, schema and the SQLite-backed storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL and seed data for initializing the database
//! - `sqlite.rs`: `InventoryStorage`, every SQL statement the app issues

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{DashboardSummary, NewStockItem, StockItem, User};
pub use schema::{LOW_STOCK_THRESHOLD, STOCK_ITEMS_INIT, USERS_INIT};
pub use sqlite::{InventoryStorage, SqlitePool, connect};
