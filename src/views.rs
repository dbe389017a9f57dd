//! Server-side HTML pages. Every dynamic value goes through [`escape`].

use axum::http::StatusCode;
use std::fmt::Write;

use crate::db::{DashboardSummary, LOW_STOCK_THRESHOLD, StockItem};
use crate::middleware::Flash;
use crate::service::ItemForm;

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #f5f6f8; color: #222; }
nav { background: #2d3e50; color: #fff; padding: .75rem 1.5rem; display: flex; gap: 1rem; align-items: center; }
nav a { color: #fff; text-decoration: none; }
nav .spacer { flex: 1; }
main { max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
.flash { padding: .6rem 1rem; border-radius: 4px; margin-bottom: 1rem; }
.flash.success { background: #dff0d8; }
.flash.info { background: #d9edf7; }
.flash.error { background: #f2dede; }
.cards { display: flex; gap: 1rem; }
.card { background: #fff; border-radius: 6px; padding: 1rem 1.5rem; flex: 1; }
.card .figure { font-size: 1.8rem; font-weight: 600; }
table { width: 100%; border-collapse: collapse; background: #fff; }
th, td { text-align: left; padding: .5rem; border-bottom: 1px solid #e3e3e3; }
tr.low td.qty { color: #b94a48; font-weight: 600; }
form.stacked label { display: block; margin-top: .75rem; }
form.stacked input, form.stacked textarea { width: 100%; padding: .4rem; box-sizing: border-box; }
button { margin-top: 1rem; padding: .5rem 1.2rem; }
"#;

/// Minimal HTML escaping for text and attribute contexts.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

fn render_flashes(flashes: &[Flash]) -> String {
    flashes.iter().fold(String::new(), |mut out, f| {
        let _ = write!(
            out,
            r#"<div class="flash {}">{}</div>"#,
            f.level.as_str(),
            escape(&f.message)
        );
        out
    })
}

fn layout(title: &str, username: Option<&str>, flashes: &[Flash], body: &str) -> String {
    let nav = match username {
        Some(name) => format!(
            r#"<nav><strong>Stockroom</strong><a href="/dashboard">Dashboard</a><a href="/items">Items</a><a href="/items/add">Add item</a><span class="spacer"></span><span>{}</span><a href="/logout">Log out</a></nav>"#,
            escape(name)
        ),
        None => "<nav><strong>Stockroom</strong></nav>".to_string(),
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{title} - Stockroom</title><style>{STYLE}</style></head>
<body>
{nav}
<main>
{flashes}
{body}
</main>
</body>
</html>"#,
        title = escape(title),
        flashes = render_flashes(flashes),
    )
}

pub fn login_page(flashes: &[Flash]) -> String {
    let body = r#"<h1>Sign in</h1>
<form class="stacked" method="post" action="/auth/login">
<label>Username <input name="username" autocomplete="username" required></label>
<label>Password <input name="password" type="password" autocomplete="current-password" required></label>
<button type="submit">Log in</button>
</form>"#;
    layout("Login", None, flashes, body)
}

pub fn dashboard_page(username: &str, summary: &DashboardSummary, flashes: &[Flash]) -> String {
    let body = format!(
        r#"<h1>Welcome, {user}</h1>
<div class="cards">
<div class="card"><div>Total items</div><div class="figure">{total}</div></div>
<div class="card"><div>Total value</div><div class="figure">${value:.2}</div></div>
<div class="card"><div>Low stock (&lt; {threshold})</div><div class="figure">{low}</div></div>
</div>
<p><a href="/items">View all items</a></p>"#,
        user = escape(username),
        total = summary.total_items,
        value = summary.total_value,
        threshold = LOW_STOCK_THRESHOLD,
        low = summary.low_stock_count,
    );
    layout("Dashboard", Some(username), flashes, &body)
}

pub fn items_page(username: &str, items: &[StockItem], flashes: &[Flash]) -> String {
    let mut body = String::from(r#"<h1>Stock items</h1><p><a href="/items/add">Add item</a></p>"#);
    if items.is_empty() {
        body.push_str("<p>No items yet.</p>");
        return layout("Items", Some(username), flashes, &body);
    }

    body.push_str(
        "<table><thead><tr><th>Name</th><th>Quantity</th><th>Price</th><th>Value</th>\
         <th>Description</th><th>Added</th><th></th></tr></thead><tbody>",
    );
    for item in items {
        let _ = write!(
            body,
            r#"<tr class="{class}"><td>{name}</td><td class="qty">{qty}</td><td>${price:.2}</td><td>${value:.2}</td><td>{desc}</td><td>{created}</td><td><a href="/items/edit/{id}">Edit</a> <a href="/items/delete/{id}" onclick="return confirm('Delete this item?')">Delete</a></td></tr>"#,
            class = if item.is_low_stock() { "low" } else { "" },
            name = escape(&item.name),
            qty = item.quantity,
            price = item.price,
            value = item.value(),
            desc = escape(item.description.as_deref().unwrap_or("")),
            created = item.created_at.format("%Y-%m-%d %H:%M"),
            id = item.id,
        );
    }
    body.push_str("</tbody></table>");
    layout("Items", Some(username), flashes, &body)
}

/// Add and edit share one form; `item_id` selects the edit variant.
pub fn item_form_page(
    username: &str,
    item_id: Option<i64>,
    form: &ItemForm,
    flashes: &[Flash],
) -> String {
    let (title, action) = match item_id {
        Some(id) => ("Edit item", format!("/items/edit/{id}")),
        None => ("Add item", "/items/add".to_string()),
    };
    let body = format!(
        r#"<h1>{title}</h1>
<form class="stacked" method="post" action="{action}">
<label>Name <input name="name" value="{name}" required></label>
<label>Quantity <input name="quantity" value="{quantity}" inputmode="numeric" required></label>
<label>Price <input name="price" value="{price}" inputmode="decimal" required></label>
<label>Description <textarea name="description" rows="3">{description}</textarea></label>
<button type="submit">Save</button> <a href="/items">Cancel</a>
</form>"#,
        name = escape(&form.name),
        quantity = escape(&form.quantity),
        price = escape(&form.price),
        description = escape(&form.description),
    );
    layout(title, Some(username), flashes, &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<h1>{code}</h1><p>{message}</p><p><a href="/">Back to start</a></p>"#,
        code = status.as_u16(),
        message = escape(message),
    );
    layout(status.canonical_reason().unwrap_or("Error"), None, &[], &body)
}
