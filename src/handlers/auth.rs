use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;

use super::log_failure;
use crate::middleware::flash::{Flash, push_flash, take_flashes};
use crate::middleware::session::{end_session, read_session, start_session};
use crate::router::StockroomState;
use crate::views;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// GET / -> dashboard when logged in, login page otherwise.
pub async fn index(jar: PrivateCookieJar) -> Redirect {
    if read_session(&jar).is_some() {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/login")
    }
}

/// GET /login
pub async fn login_page(State(state): State<StockroomState>, jar: PrivateCookieJar) -> Response {
    if read_session(&jar).is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    let (jar, flashes) = take_flashes(jar, &state.cookies);
    (jar, Html(views::login_page(&flashes))).into_response()
}

/// POST /auth/login
pub async fn login_submit(
    State(state): State<StockroomState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> (PrivateCookieJar, Redirect) {
    match state.auth.authenticate(&form.username, &form.password).await {
        Ok(identity) => {
            let jar = start_session(jar, identity, &state.cookies);
            let jar = push_flash(jar, Flash::success("Login successful!"), &state.cookies);
            (jar, Redirect::to("/dashboard"))
        }
        Err(err) => {
            log_failure(&err, "login");
            let jar = push_flash(jar, Flash::error(err.user_message()), &state.cookies);
            (jar, Redirect::to("/login"))
        }
    }
}

/// GET /logout
pub async fn logout(
    State(state): State<StockroomState>,
    jar: PrivateCookieJar,
) -> (PrivateCookieJar, Redirect) {
    let jar = end_session(jar, &state.cookies);
    let jar = push_flash(jar, Flash::info("You have been logged out"), &state.cookies);
    (jar, Redirect::to("/login"))
}
