use std::sync::Arc;

use expense_tracker_api::{
    app::{build_app, AppServices},
    config::{DatabaseConfig, LISTEN_ADDR},
};
use expense_tracker_auth::PasswordHasher;
use expense_tracker_infra::{bootstrap, MySqlExpenseStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    expense_tracker_observability::init();
    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!(error = %e, "could not read .env");
        }
    }

    let config = DatabaseConfig::from_env();
    tracing::info!(?config, "connecting to MySQL");

    // A failed connection leaves the server up but unable to serve any flow.
    let store = match bootstrap(&config.connect_options()).await {
        Ok(provisioned) => {
            if !provisioned.is_complete() {
                tracing::warn!(
                    failed_steps = provisioned.failures.len(),
                    "schema bootstrap incomplete"
                );
            }
            MySqlExpenseStore::new(provisioned.connection)
        }
        Err(e) => {
            tracing::error!(error = %e, "error connecting to MySQL; database requests will fail");
            MySqlExpenseStore::disconnected()
        }
    };

    let services = AppServices::new(Arc::new(store), PasswordHasher::default());
    let app = build_app(services);

    let listener = tokio::net::TcpListener::bind(LISTEN_ADDR).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
