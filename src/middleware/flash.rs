//! One-shot notices carried across a redirect in an encrypted cookie.

use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};

use super::session::CookieSettings;

pub const FLASH_COOKIE: &str = "stockroom_flash";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

impl FlashLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Info => "info",
            FlashLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

fn pending(jar: &PrivateCookieJar) -> Vec<Flash> {
    jar.get(FLASH_COOKIE)
        .and_then(|c| serde_json::from_str(c.value()).ok())
        .unwrap_or_default()
}

/// Queue `flash` for the next rendered page.
pub fn push_flash(
    jar: PrivateCookieJar,
    flash: Flash,
    settings: &CookieSettings,
) -> PrivateCookieJar {
    let mut queued = pending(&jar);
    queued.push(flash);
    let value = serde_json::to_string(&queued).unwrap_or_default();
    jar.add(settings.build_cookie(FLASH_COOKIE, value, None))
}

/// Drain queued notices. The cookie is only touched when something was queued.
pub fn take_flashes(
    jar: PrivateCookieJar,
    settings: &CookieSettings,
) -> (PrivateCookieJar, Vec<Flash>) {
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, Vec::new());
    }
    let flashes = pending(&jar);
    (jar.remove(settings.clear_cookie(FLASH_COOKIE)), flashes)
}
