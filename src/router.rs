use axum::{
    Router,
    extract::FromRef,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;

use crate::config::Config;
use crate::db::{self, InventoryStorage};
use crate::error::StockError;
use crate::handlers::{auth, dashboard, items, not_found};
use crate::middleware::CookieSettings;
use crate::middleware::schema::schema_guard;
use crate::service::{AuthService, InventoryService};

/// Shared, cheaply clonable application state.
#[derive(Clone)]
pub struct StockroomState {
    pub storage: InventoryStorage,
    pub auth: AuthService,
    pub inventory: InventoryService,
    pub key: Key,
    pub cookies: CookieSettings,
}

impl StockroomState {
    pub fn new(storage: InventoryStorage, key: Key, cookies: CookieSettings) -> Self {
        Self {
            auth: AuthService::new(storage.clone()),
            inventory: InventoryService::new(storage.clone()),
            storage,
            key,
            cookies,
        }
    }

    /// Open the database named in `cfg` and assemble the state. Schema
    /// creation is left to the caller (see [`InventoryStorage::ensure_schema`]).
    pub async fn from_config(cfg: &Config) -> Result<Self, StockError> {
        let pool = db::connect(&cfg.database_url).await?;
        let storage = InventoryStorage::new(pool, cfg.admin_password.as_str());
        Ok(Self::new(
            storage,
            cfg.cookie_key()?,
            CookieSettings::from_config(cfg),
        ))
    }
}

impl FromRef<StockroomState> for Key {
    fn from_ref(state: &StockroomState) -> Self {
        state.key.clone()
    }
}

pub fn stockroom_router(state: StockroomState) -> Router {
    Router::new()
        .route("/", get(auth::index))
        .route("/login", get(auth::login_page))
        .route("/auth/login", post(auth::login_submit))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/items", get(items::list_items))
        .route(
            "/items/add",
            get(items::add_item_form).post(items::add_item_submit),
        )
        .route(
            "/items/edit/{id}",
            get(items::edit_item_form).post(items::edit_item_submit),
        )
        .route("/items/delete/{id}", get(items::delete_item))
        .fallback(not_found)
        .layer(from_fn_with_state(state.storage.clone(), schema_guard))
        .with_state(state)
}
