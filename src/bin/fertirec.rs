//! Fertilizer recommendation server
//!
//! Loads configuration (file, environment, `.env`), loads the model
//! artifacts once and serves the HTTP API until shut down.

use fertirec::server::{self, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;

    server::start_server(config).await?;

    Ok(())
}
