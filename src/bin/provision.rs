//! Initial database setup outside the web process.
//!
//! Usage: `provision [USERNAME PASSWORD]`
//!
//! Creates the schema (seeding the default admin and sample items on first
//! run), optionally adds one more account, then lists every user.

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use stockroom::db::{self, InventoryStorage};
use stockroom::service::AuthService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // The cookie secret is irrelevant here, so skip `Config::validate`.
    let cfg: stockroom::Config = stockroom::Config::figment().extract()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let new_user = match (args.next(), args.next()) {
        (Some(username), Some(password)) => Some((username, password)),
        (None, None) => None,
        _ => {
            error!("expected either no arguments or USERNAME PASSWORD");
            std::process::exit(2);
        }
    };

    info!(database_url = %cfg.database_url, "provisioning database");
    let pool = db::connect(&cfg.database_url).await?;
    let storage = InventoryStorage::new(pool, cfg.admin_password.as_str());

    let report = storage.init_schema().await?;
    if report.users_created {
        info!("default admin user created: username=admin");
    } else {
        info!("users table already present");
    }

    if let Some((username, password)) = new_user {
        let auth = AuthService::new(storage.clone());
        match auth.create_user(&username, &password).await {
            Ok(id) => info!(id, username = %username, "user created"),
            Err(e) => {
                error!(username = %username, error = %e, "failed to create user");
                return Err(e.into());
            }
        }
    }

    let users = storage.list_users().await?;
    info!(total = users.len(), "users");
    for user in users {
        info!(id = user.id, username = %user.username);
    }

    storage.pool().close().await;
    Ok(())
}
