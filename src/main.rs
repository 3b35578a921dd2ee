mod app;
mod modules;
mod types;
mod utils;

use crate::{
    app::App,
    types::{Config, StartupError, ToContext},
};
use std::sync::Arc;
use tracing_subscriber::prelude::*;

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug,sqlx=warn".into()),
        )
        .init();
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;
    let ctx = Arc::new(config.to_context().await?);

    App::new(ctx).serve().await
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(err) = run().await {
        tracing::error!("Failed to start: {}", err);
        std::process::exit(1);
    }
}
