use axum::{
    Form,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::debug;

use super::log_failure;
use crate::error::StockError;
use crate::middleware::CurrentUser;
use crate::middleware::flash::{Flash, push_flash, take_flashes};
use crate::router::StockroomState;
use crate::service::ItemForm;
use crate::views;

fn redirect_to_list(
    state: &StockroomState,
    jar: PrivateCookieJar,
    flash: Flash,
) -> (PrivateCookieJar, Redirect) {
    (push_flash(jar, flash, &state.cookies), Redirect::to("/items"))
}

/// Path ids that are not integers can never name a row, so they get the
/// same treatment as a missing item.
fn unknown_item(state: &StockroomState, jar: PrivateCookieJar, raw_id: &str) -> Response {
    debug!(raw_id, "non-numeric item id");
    redirect_to_list(state, jar, Flash::error("Item not found")).into_response()
}

/// Re-render the form with the submitted values and the validation message.
fn rerender_form(
    username: &str,
    item_id: Option<i64>,
    form: &ItemForm,
    err: &StockError,
) -> Response {
    let flashes = [Flash::error(err.user_message())];
    let page = views::item_form_page(username, item_id, form, &flashes);
    (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response()
}

/// GET /items
pub async fn list_items(
    State(state): State<StockroomState>,
    CurrentUser(user): CurrentUser,
    jar: PrivateCookieJar,
) -> Response {
    let (jar, mut flashes) = take_flashes(jar, &state.cookies);
    let items = match state.inventory.list_items().await {
        Ok(items) => items,
        Err(err) => {
            log_failure(&err, "list_items");
            flashes.push(Flash::error(err.user_message()));
            Vec::new()
        }
    };
    (jar, Html(views::items_page(&user.username, &items, &flashes))).into_response()
}

/// GET /items/add
pub async fn add_item_form(
    State(state): State<StockroomState>,
    CurrentUser(user): CurrentUser,
    jar: PrivateCookieJar,
) -> Response {
    let (jar, flashes) = take_flashes(jar, &state.cookies);
    let page = views::item_form_page(&user.username, None, &ItemForm::default(), &flashes);
    (jar, Html(page)).into_response()
}

/// POST /items/add
pub async fn add_item_submit(
    State(state): State<StockroomState>,
    CurrentUser(user): CurrentUser,
    jar: PrivateCookieJar,
    Form(form): Form<ItemForm>,
) -> Response {
    match state.inventory.add_item(&form).await {
        Ok(_) => {
            let flash = Flash::success("Item added successfully");
            redirect_to_list(&state, jar, flash).into_response()
        }
        Err(err @ StockError::Validation(_)) => rerender_form(&user.username, None, &form, &err),
        Err(err) => {
            log_failure(&err, "add_item");
            redirect_to_list(&state, jar, Flash::error(err.user_message())).into_response()
        }
    }
}

/// GET /items/edit/{id}
pub async fn edit_item_form(
    State(state): State<StockroomState>,
    CurrentUser(user): CurrentUser,
    Path(raw_id): Path<String>,
    jar: PrivateCookieJar,
) -> Response {
    let Ok(id) = raw_id.parse::<i64>() else {
        return unknown_item(&state, jar, &raw_id);
    };
    match state.inventory.get_item(id).await {
        Ok(item) => {
            let (jar, flashes) = take_flashes(jar, &state.cookies);
            let form = ItemForm::from(&item);
            let page = views::item_form_page(&user.username, Some(id), &form, &flashes);
            (jar, Html(page)).into_response()
        }
        Err(err) => {
            log_failure(&err, "get_item");
            redirect_to_list(&state, jar, Flash::error(err.user_message())).into_response()
        }
    }
}

/// POST /items/edit/{id}
pub async fn edit_item_submit(
    State(state): State<StockroomState>,
    CurrentUser(user): CurrentUser,
    Path(raw_id): Path<String>,
    jar: PrivateCookieJar,
    Form(form): Form<ItemForm>,
) -> Response {
    let Ok(id) = raw_id.parse::<i64>() else {
        return unknown_item(&state, jar, &raw_id);
    };
    match state.inventory.edit_item(id, &form).await {
        Ok(_) => {
            let flash = Flash::success("Item updated successfully");
            redirect_to_list(&state, jar, flash).into_response()
        }
        Err(err @ StockError::Validation(_)) => {
            rerender_form(&user.username, Some(id), &form, &err)
        }
        Err(err) => {
            log_failure(&err, "edit_item");
            redirect_to_list(&state, jar, Flash::error(err.user_message())).into_response()
        }
    }
}

/// GET /items/delete/{id}
pub async fn delete_item(
    State(state): State<StockroomState>,
    CurrentUser(_user): CurrentUser,
    Path(raw_id): Path<String>,
    jar: PrivateCookieJar,
) -> Response {
    let Ok(id) = raw_id.parse::<i64>() else {
        return unknown_item(&state, jar, &raw_id);
    };
    match state.inventory.delete_item(id).await {
        Ok(()) => {
            let flash = Flash::success("Item deleted successfully");
            redirect_to_list(&state, jar, flash).into_response()
        }
        Err(err) => {
            log_failure(&err, "delete_item");
            redirect_to_list(&state, jar, Flash::error(err.user_message())).into_response()
        }
    }
}
