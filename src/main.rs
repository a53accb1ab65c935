mod actions;
mod auth;
mod config;
mod constants;
mod error;
mod forms;
mod handlers;
mod macros;
mod repo;
mod server;
mod services;
mod session;
mod store;
mod utils;
mod views;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = server::run().await {
        tracing::error!("Error: {:#}", err);
        std::process::exit(1);
    }
}
