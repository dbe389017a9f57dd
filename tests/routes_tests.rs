mod common;

use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum_extra::extract::cookie::{Key, PrivateCookieJar};
use common::{SECRET, TempDb, TestClient, body_string, item_count, location};
use stockroom::middleware::{CookieSettings, SessionIdentity, session::start_session};

const PROTECTED_GETS: [&str; 5] = [
    "/dashboard",
    "/items",
    "/items/add",
    "/items/edit/1",
    "/items/delete/1",
];

#[tokio::test]
async fn protected_routes_redirect_to_login_without_session() {
    let db = TempDb::new("routes-guard");
    let mut client = TestClient::new(&db).await;

    for path in PROTECTED_GETS {
        let resp = client.get(path).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "GET {path}");
        assert_eq!(location(&resp), "/login", "GET {path}");
    }

    // The delete above must not have run: all five sample rows remain.
    assert_eq!(item_count(&client.storage).await, 5);

    for path in ["/items/add", "/items/edit/1"] {
        let resp = client
            .post_form(path, "name=Sneaky&quantity=1&price=1")
            .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "POST {path}");
        assert_eq!(location(&resp), "/login", "POST {path}");
    }

    assert_eq!(item_count(&client.storage).await, 5);
    let first = client.storage.get_item(1).await.unwrap().expect("sample row missing");
    assert_eq!(first.name, "Laptop");
}

#[tokio::test]
async fn index_and_login_page_follow_session_state() {
    let db = TempDb::new("routes-index");
    let mut client = TestClient::new(&db).await;

    let resp = client.get("/").await;
    assert_eq!(location(&resp), "/login");

    let resp = client.get("/login").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains(r#"action="/auth/login""#));

    client.login().await;

    assert_eq!(location(&client.get("/").await), "/dashboard");
    assert_eq!(location(&client.get("/login").await), "/dashboard");
}

#[tokio::test]
async fn login_shows_dashboard_summary_and_flash_once() {
    let db = TempDb::new("routes-login");
    let mut client = TestClient::new(&db).await;
    client.login().await;
    assert!(client.has_cookie("stockroom_session"));

    let resp = client.get("/dashboard").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("Welcome, admin"));
    assert!(html.contains("Login successful!"));
    // Seeded rows: five items, two of them below the threshold.
    assert!(html.contains(r#"<div class="figure">5</div>"#));
    assert!(html.contains(r#"<div class="figure">2</div>"#));

    let html = body_string(client.get("/dashboard").await).await;
    assert!(!html.contains("Login successful!"));
}

#[tokio::test]
async fn failed_login_redirects_back_with_generic_message() {
    let db = TempDb::new("routes-badlogin");
    let mut client = TestClient::new(&db).await;

    for body in ["username=admin&password=wrong", "username=nobody&password=admin123"] {
        let resp = client.post_form("/auth/login", body).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/login");
        assert!(!client.has_cookie("stockroom_session"));

        let html = body_string(client.get("/login").await).await;
        assert!(html.contains("Invalid username or password"));
    }

    let resp = client.post_form("/auth/login", "username=admin").await;
    assert_eq!(location(&resp), "/login");
    let html = body_string(client.get("/login").await).await;
    assert!(html.contains("Please enter both username and password"));
}

#[tokio::test]
async fn logout_clears_session() {
    let db = TempDb::new("routes-logout");
    let mut client = TestClient::new(&db).await;
    client.login().await;

    let resp = client.get("/logout").await;
    assert_eq!(location(&resp), "/login");
    assert!(!client.has_cookie("stockroom_session"));

    let html = body_string(client.get("/login").await).await;
    assert!(html.contains("You have been logged out"));

    assert_eq!(location(&client.get("/dashboard").await), "/login");

    // Logging out twice is harmless.
    assert_eq!(location(&client.get("/logout").await), "/login");
}

#[tokio::test]
async fn tampered_session_cookie_is_rejected() {
    let db = TempDb::new("routes-tamper");
    let mut client = TestClient::new(&db).await;
    client.set_cookie(
        "stockroom_session",
        r#"{"user_id":1,"username":"admin","expires_at":9999999999}"#,
    );

    let resp = client.get("/dashboard").await;
    assert_eq!(location(&resp), "/login");
}

#[tokio::test]
async fn add_item_via_form_lists_it_first() {
    let db = TempDb::new("routes-add");
    let mut client = TestClient::new(&db).await;
    client.login().await;

    let resp = client.get("/items/add").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post_form(
            "/items/add",
            "name=Widget&quantity=10&price=5.50&description=blue+%3Cb%3E",
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/items");

    let html = body_string(client.get("/items").await).await;
    assert!(html.contains("Item added successfully"));
    let widget = html.find("Widget").expect("new item missing");
    let laptop = html.find("Laptop").expect("sample item missing");
    assert!(widget < laptop, "newest item should be listed first");
    assert!(html.contains("$5.50"));
    assert!(html.contains("blue &lt;b&gt;"));
}

#[tokio::test]
async fn invalid_add_rerenders_form_and_inserts_nothing() {
    let db = TempDb::new("routes-add-invalid");
    let mut client = TestClient::new(&db).await;
    client.login().await;
    let before = item_count(&client.storage).await;

    let resp = client
        .post_form("/items/add", "name=Widget&quantity=abc&price=5.50")
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_string(resp).await;
    assert!(html.contains("Quantity must be a whole number"));
    assert!(html.contains(r#"value="abc""#));

    assert_eq!(item_count(&client.storage).await, before);
}

#[tokio::test]
async fn edit_flow_updates_in_place() {
    let db = TempDb::new("routes-edit");
    let mut client = TestClient::new(&db).await;
    client.login().await;

    let item = client.storage.list_items().await.unwrap().remove(0);
    let path = format!("/items/edit/{}", item.id);

    let html = body_string(client.get(&path).await).await;
    assert!(html.contains(&format!(r#"value="{}""#, item.name)));

    let resp = client
        .post_form(&path, "name=Renamed&quantity=2&price=3.5&description=")
        .await;
    assert_eq!(location(&resp), "/items");

    let stored = client.storage.get_item(item.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Renamed");
    assert_eq!(stored.quantity, 2);
    assert_eq!(stored.price, 3.5);
    assert_eq!(stored.description, None);
}

#[tokio::test]
async fn edit_of_missing_item_redirects_with_not_found() {
    let db = TempDb::new("routes-edit-missing");
    let mut client = TestClient::new(&db).await;
    client.login().await;
    let before = item_count(&client.storage).await;

    let resp = client.get("/items/edit/424242").await;
    assert_eq!(location(&resp), "/items");
    let html = body_string(client.get("/items").await).await;
    assert!(html.contains("Item not found"));

    let resp = client
        .post_form("/items/edit/424242", "name=Ghost&quantity=1&price=1")
        .await;
    assert_eq!(location(&resp), "/items");
    assert_eq!(item_count(&client.storage).await, before);
}

#[tokio::test]
async fn delete_removes_item_and_tolerates_missing_ids() {
    let db = TempDb::new("routes-delete");
    let mut client = TestClient::new(&db).await;
    client.login().await;

    let item = client.storage.list_items().await.unwrap().remove(0);
    let before = item_count(&client.storage).await;

    let resp = client.get(&format!("/items/delete/{}", item.id)).await;
    assert_eq!(location(&resp), "/items");
    assert_eq!(item_count(&client.storage).await, before - 1);
    assert!(client.storage.get_item(item.id).await.unwrap().is_none());

    let resp = client.get(&format!("/items/delete/{}", item.id)).await;
    assert_eq!(location(&resp), "/items");
    assert_eq!(item_count(&client.storage).await, before - 1);
    let html = body_string(client.get("/items").await).await;
    assert!(html.contains("Item deleted successfully"));
}

#[tokio::test]
async fn unknown_path_is_404() {
    let db = TempDb::new("routes-404");
    let mut client = TestClient::new(&db).await;

    let resp = client.get("/nope").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_string(resp).await.contains("Page not found"));
}

/// Encrypt a session cookie the way the app would, with the given lifetime.
fn sealed_session(ttl: time::Duration) -> String {
    let jar = PrivateCookieJar::new(Key::from(SECRET.as_bytes()));
    let identity = SessionIdentity {
        user_id: 1,
        username: "admin".to_string(),
    };
    let settings = CookieSettings {
        secure: false,
        session_ttl: ttl,
    };
    let resp = start_session(jar, identity, &settings).into_response();
    let raw = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("session cookie was not set");
    let pair = raw.split(';').next().unwrap_or_default();
    let (_, value) = pair.split_once('=').expect("malformed set-cookie");
    value.to_string()
}

#[tokio::test]
async fn expired_session_cookie_redirects_to_login() {
    let db = TempDb::new("routes-expired");
    let mut client = TestClient::new(&db).await;

    client.set_cookie("stockroom_session", &sealed_session(time::Duration::minutes(5)));
    assert_eq!(client.get("/dashboard").await.status(), StatusCode::OK);

    client.set_cookie("stockroom_session", &sealed_session(time::Duration::minutes(-1)));
    let resp = client.get("/dashboard").await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
}

#[tokio::test]
async fn edit_form_keeps_full_price_precision() {
    let db = TempDb::new("routes-price-precision");
    let mut client = TestClient::new(&db).await;
    client.login().await;

    let resp = client
        .post_form("/items/add", "name=Bolt&quantity=100&price=0.125")
        .await;
    assert_eq!(location(&resp), "/items");
    let item = client.storage.list_items().await.unwrap().remove(0);
    assert_eq!(item.name, "Bolt");
    let path = format!("/items/edit/{}", item.id);

    let html = body_string(client.get(&path).await).await;
    assert!(html.contains(r#"value="0.125""#), "price rounded in form");

    // Only the name changes; the other fields are posted back as rendered.
    let resp = client
        .post_form(&path, "name=Hex+bolt&quantity=100&price=0.125&description=")
        .await;
    assert_eq!(location(&resp), "/items");
    let stored = client.storage.get_item(item.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Hex bolt");
    assert_eq!(stored.price, 0.125);
}

#[tokio::test]
async fn non_numeric_item_ids_redirect_to_list() {
    let db = TempDb::new("routes-bad-id");
    let mut client = TestClient::new(&db).await;
    client.login().await;
    let before = item_count(&client.storage).await;

    for path in ["/items/edit/abc", "/items/delete/abc", "/items/edit/1.5"] {
        let resp = client.get(path).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "GET {path}");
        assert_eq!(location(&resp), "/items", "GET {path}");
    }
    let resp = client
        .post_form("/items/edit/abc", "name=Ghost&quantity=1&price=1")
        .await;
    assert_eq!(location(&resp), "/items");

    let html = body_string(client.get("/items").await).await;
    assert!(html.contains("Item not found"));
    assert_eq!(item_count(&client.storage).await, before);
}

#[tokio::test]
async fn pages_still_render_while_schema_init_keeps_failing() {
    let db = TempDb::new("routes-schema-retry");
    let mut client = TestClient::new(&db).await;
    sqlx::query("CREATE VIEW stock_items AS SELECT 1 AS x")
        .execute(client.storage.pool())
        .await
        .unwrap();

    let resp = client.get("/login").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("Sign in"));

    // The users table was committed before the failing step.
    client.login().await;
    let html = body_string(client.get("/items").await).await;
    assert!(html.contains("An error occurred. Please try again."));

    sqlx::query("DROP VIEW stock_items")
        .execute(client.storage.pool())
        .await
        .unwrap();
    let html = body_string(client.get("/items").await).await;
    assert!(html.contains("Laptop"));
}
