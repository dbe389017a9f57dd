use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;

use super::log_failure;
use crate::db::DashboardSummary;
use crate::middleware::CurrentUser;
use crate::middleware::flash::{Flash, take_flashes};
use crate::router::StockroomState;
use crate::views;

/// GET /dashboard
pub async fn dashboard(
    State(state): State<StockroomState>,
    CurrentUser(user): CurrentUser,
    jar: PrivateCookieJar,
) -> Response {
    let (jar, mut flashes) = take_flashes(jar, &state.cookies);
    let summary = match state.inventory.dashboard_summary().await {
        Ok(summary) => summary,
        Err(err) => {
            log_failure(&err, "dashboard_summary");
            flashes.push(Flash::error(err.user_message()));
            DashboardSummary::default()
        }
    };
    let page = views::dashboard_page(&user.username, &summary, &flashes);
    (jar, Html(page)).into_response()
}
