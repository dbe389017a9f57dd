#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use std::{
    collections::BTreeMap,
    fs,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};
use stockroom::db::InventoryStorage;
use tower::ServiceExt;

pub const SECRET: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A throwaway SQLite file, removed on drop.
pub struct TempDb {
    pub path: PathBuf,
    pub url: String,
}

impl TempDb {
    pub fn new(tag: &str) -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before UNIX_EPOCH")
            .as_nanos();
        let seq = COUNTER.fetch_add(1, Ordering::SeqCst);

        let mut path = std::env::temp_dir();
        path.push(format!(
            "stockroom-{tag}-{}-{nanos}-{seq}.sqlite",
            std::process::id()
        ));
        let url = format!("sqlite:{}", path.display());
        Self { path, url }
    }

    pub async fn storage(&self) -> InventoryStorage {
        let pool = stockroom::db::connect(&self.url)
            .await
            .expect("failed to open test database");
        InventoryStorage::new(pool, "admin123")
    }

    pub fn config(&self) -> stockroom::Config {
        stockroom::Config {
            secret_key: SECRET.to_string(),
            database_url: self.url.clone(),
            insecure_cookie: true,
            ..Default::default()
        }
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
        let _ = fs::remove_file(self.path.with_extension("sqlite-wal"));
        let _ = fs::remove_file(self.path.with_extension("sqlite-shm"));
    }
}

/// Storage with the schema initialized and the sample rows removed.
pub async fn empty_storage(db: &TempDb) -> InventoryStorage {
    let storage = db.storage().await;
    storage.ensure_schema().await.expect("schema init failed");
    sqlx::query("DELETE FROM stock_items")
        .execute(storage.pool())
        .await
        .expect("failed to clear sample items");
    storage
}

pub async fn item_count(storage: &InventoryStorage) -> i64 {
    let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM stock_items")
        .fetch_one(storage.pool())
        .await
        .expect("count query failed");
    n
}

/// Drives the router in-process and carries cookies between requests the
/// way a browser would.
pub struct TestClient {
    app: Router,
    pub storage: InventoryStorage,
    cookies: BTreeMap<String, String>,
}

impl TestClient {
    pub async fn new(db: &TempDb) -> Self {
        let state = stockroom::StockroomState::from_config(&db.config())
            .await
            .expect("failed to build state");
        let storage = state.storage.clone();
        Self {
            app: stockroom::stockroom_router(state),
            storage,
            cookies: BTreeMap::new(),
        }
    }

    pub async fn get(&mut self, uri: &str) -> Response<Body> {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .header(header::COOKIE, self.cookie_header())
            .body(Body::empty())
            .expect("failed to build request");
        self.send(req).await
    }

    pub async fn post_form(&mut self, uri: &str, body: &str) -> Response<Body> {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::COOKIE, self.cookie_header())
            .body(Body::from(body.to_string()))
            .expect("failed to build request");
        self.send(req).await
    }

    pub async fn login(&mut self) {
        let resp = self
            .post_form("/auth/login", "username=admin&password=admin123")
            .await;
        assert_eq!(location(&resp), "/dashboard");
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub fn set_cookie(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    async fn send(&mut self, req: Request<Body>) -> Response<Body> {
        let resp = self
            .app
            .clone()
            .oneshot(req)
            .await
            .expect("request failed");
        for value in resp.headers().get_all(header::SET_COOKIE) {
            let raw = value.to_str().expect("set-cookie was not ascii");
            let pair = raw.split(';').next().unwrap_or_default();
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            if value.is_empty() {
                self.cookies.remove(name.trim());
            } else {
                self.cookies
                    .insert(name.trim().to_string(), value.trim().to_string());
            }
        }
        resp
    }

    fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub fn location(resp: &Response<Body>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

pub async fn body_string(resp: Response<Body>) -> String {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(body.to_vec()).expect("response body was not utf-8")
}
