use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::config::{Config, MAX_SESSION_TTL_MINUTES};

pub const SESSION_COOKIE: &str = "stockroom_session";

/// The server-trusted record of who is logged in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: i64,
    pub username: String,
}

/// What actually goes into the encrypted cookie. The expiry is checked on
/// every read so a copied cookie dies with its `Max-Age`.
#[derive(Debug, Serialize, Deserialize)]
struct SessionPayload {
    #[serde(flatten)]
    identity: SessionIdentity,
    expires_at: i64,
}

/// Attributes shared by every cookie the app sets.
#[derive(Debug, Clone, Copy)]
pub struct CookieSettings {
    pub secure: bool,
    pub session_ttl: Duration,
}

impl CookieSettings {
    /// The lifetime is clamped to `1..=MAX_SESSION_TTL_MINUTES` so an
    /// unvalidated config cannot overflow the duration.
    pub fn from_config(cfg: &Config) -> Self {
        let minutes = cfg.session_ttl_minutes.clamp(1, MAX_SESSION_TTL_MINUTES);
        Self {
            secure: !cfg.insecure_cookie,
            session_ttl: Duration::minutes(minutes),
        }
    }

    pub fn build_cookie(
        &self,
        name: &str,
        value: String,
        max_age: Option<Duration>,
    ) -> Cookie<'static> {
        let mut builder = Cookie::build(Cookie::new(name.to_string(), value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax);
        if let Some(age) = max_age {
            builder = builder.max_age(age);
        }
        builder.build()
    }

    pub fn clear_cookie(&self, name: &str) -> Cookie<'static> {
        Cookie::build(Cookie::new(name.to_string(), ""))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .build()
    }
}

/// Decode the session cookie, if present, intact and not expired.
pub fn read_session(jar: &PrivateCookieJar) -> Option<SessionIdentity> {
    let cookie = jar.get(SESSION_COOKIE)?;
    let payload: SessionPayload = serde_json::from_str(cookie.value()).ok()?;
    (payload.expires_at > Utc::now().timestamp()).then_some(payload.identity)
}

pub fn start_session(
    jar: PrivateCookieJar,
    identity: SessionIdentity,
    settings: &CookieSettings,
) -> PrivateCookieJar {
    let payload = SessionPayload {
        identity,
        expires_at: Utc::now().timestamp() + settings.session_ttl.whole_seconds(),
    };
    // Serializing two integers and a string cannot fail.
    let value = serde_json::to_string(&payload).unwrap_or_default();
    jar.add(settings.build_cookie(SESSION_COOKIE, value, Some(settings.session_ttl)))
}

/// Drop the session cookie. Harmless when no session exists.
pub fn end_session(jar: PrivateCookieJar, settings: &CookieSettings) -> PrivateCookieJar {
    jar.remove(settings.clear_cookie(SESSION_COOKIE))
}

/// Guard for protected routes: extracts the session identity or redirects
/// to the login page without running the handler.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionIdentity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::<Key>::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };
        read_session(&jar)
            .map(CurrentUser)
            .ok_or_else(|| Redirect::to("/login"))
    }
}
