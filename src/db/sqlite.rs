use crate::db::models::{DashboardSummary, NewStockItem, StockItem, User};
use crate::db::schema::{
    DEFAULT_ADMIN_USERNAME, LOW_STOCK_THRESHOLD, SAMPLE_ITEMS, STOCK_ITEMS_INIT, USERS_INIT,
};
use crate::error::StockError;
use crate::service::password;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

const ITEM_COLUMNS: &str = "id, name, quantity, price, description, created_at";

/// Open a pool against `database_url`, creating the database file if needed.
pub async fn connect(database_url: &str) -> Result<SqlitePool, StockError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
    Ok(pool)
}

/// Which tables a schema pass had to create.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaReport {
    pub users_created: bool,
    pub stock_items_created: bool,
}

#[derive(Clone)]
pub struct InventoryStorage {
    pool: SqlitePool,
    admin_password: Arc<str>,
    schema_ready: Arc<OnceCell<SchemaReport>>,
}

impl InventoryStorage {
    pub fn new(pool: SqlitePool, admin_password: impl Into<Arc<str>>) -> Self {
        Self {
            pool,
            admin_password: admin_password.into(),
            schema_ready: Arc::new(OnceCell::new()),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run [`Self::init_schema`] at most once per process. A failed attempt
    /// leaves the cell empty so the next caller retries.
    pub async fn ensure_schema(&self) -> Result<SchemaReport, StockError> {
        self.schema_ready
            .get_or_try_init(|| self.init_schema())
            .await
            .copied()
    }

    /// Create missing tables and seed the ones that were just created.
    pub async fn init_schema(&self) -> Result<SchemaReport, StockError> {
        let mut report = SchemaReport::default();

        let mut tx = self.pool.begin().await?;
        if !table_exists(&mut tx, "users").await? {
            sqlx::query(USERS_INIT).execute(&mut *tx).await?;
            let hash = password::hash_blocking(self.admin_password.to_string()).await?;
            sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
                .bind(DEFAULT_ADMIN_USERNAME)
                .bind(hash)
                .execute(&mut *tx)
                .await?;
            report.users_created = true;
        }
        tx.commit().await?;

        let mut tx = self.pool.begin().await?;
        if !table_exists(&mut tx, "stock_items").await? {
            sqlx::query(STOCK_ITEMS_INIT).execute(&mut *tx).await?;
            for sample in SAMPLE_ITEMS.iter() {
                sqlx::query(
                    "INSERT INTO stock_items (name, quantity, price, description) \
                     VALUES (?, ?, ?, ?)",
                )
                .bind(sample.name)
                .bind(sample.quantity)
                .bind(sample.price)
                .bind(sample.description)
                .execute(&mut *tx)
                .await?;
            }
            report.stock_items_created = true;
        }
        tx.commit().await?;

        if report.users_created {
            info!(username = DEFAULT_ADMIN_USERNAME, "users table created with default admin");
        }
        if report.stock_items_created {
            info!(count = SAMPLE_ITEMS.len(), "stock_items table created with sample rows");
        }
        Ok(report)
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StockError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Insert a user with an already-hashed password. Returns the row id.
    pub async fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<i64, StockError> {
        let rec: (i64,) =
            sqlx::query_as("INSERT INTO users (username, password) VALUES (?, ?) RETURNING id")
                .bind(username)
                .bind(password_hash)
                .fetch_one(&self.pool)
                .await?;
        Ok(rec.0)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, StockError> {
        let users =
            sqlx::query_as::<_, User>("SELECT id, username, password FROM users ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(users)
    }

    /// Newest first; rows written within the same second fall back to id order.
    pub async fn list_items(&self) -> Result<Vec<StockItem>, StockError> {
        let items = sqlx::query_as::<_, StockItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM stock_items ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn get_item(&self, id: i64) -> Result<Option<StockItem>, StockError> {
        let item = sqlx::query_as::<_, StockItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM stock_items WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    pub async fn insert_item(&self, item: &NewStockItem) -> Result<StockItem, StockError> {
        let stored = sqlx::query_as::<_, StockItem>(&format!(
            "INSERT INTO stock_items (name, quantity, price, description) VALUES (?, ?, ?, ?) \
             RETURNING {ITEM_COLUMNS}"
        ))
        .bind(&item.name)
        .bind(item.quantity)
        .bind(item.price)
        .bind(item.description.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    /// Overwrite every mutable column. `None` when no row has this id.
    pub async fn update_item(
        &self,
        id: i64,
        item: &NewStockItem,
    ) -> Result<Option<StockItem>, StockError> {
        let stored = sqlx::query_as::<_, StockItem>(&format!(
            "UPDATE stock_items SET name = ?, quantity = ?, price = ?, description = ? \
             WHERE id = ? RETURNING {ITEM_COLUMNS}"
        ))
        .bind(&item.name)
        .bind(item.quantity)
        .bind(item.price)
        .bind(item.description.as_deref())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(stored)
    }

    /// Deleting an id that does not exist is not an error.
    pub async fn delete_item(&self, id: i64) -> Result<(), StockError> {
        sqlx::query("DELETE FROM stock_items WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn summary(&self) -> Result<DashboardSummary, StockError> {
        let (total_items, total_value, low_stock_count): (i64, f64, i64) = sqlx::query_as(
            r#"SELECT
                   COUNT(*),
                   CAST(COALESCE(SUM(quantity * price), 0) AS REAL),
                   COALESCE(SUM(CASE WHEN quantity < ? THEN 1 ELSE 0 END), 0)
               FROM stock_items"#,
        )
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_one(&self.pool)
        .await?;
        Ok(DashboardSummary {
            total_items,
            total_value,
            low_stock_count,
        })
    }
}

async fn table_exists(conn: &mut SqliteConnection, name: &str) -> Result<bool, StockError> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(row.is_some())
}
