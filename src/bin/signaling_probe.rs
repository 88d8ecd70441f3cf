//! Opens a signaling connection and logs its events until Ctrl-C.
//!
//! Usage: `signaling_probe <USERNAME>`

use rust_contratos_core::config::Config;
use rust_contratos_core::obs::init_tracing;
use rust_contratos_core::signaling::{connect, SignalingConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let username = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Usage: signaling_probe <USERNAME>"))?;

    let config = Config::from_env()?;
    let connection = connect(&username, &SignalingConfig::from(&config)).await?;

    tracing::info!("Connected as {}. Press Ctrl-C to disconnect.", connection.username());
    tokio::signal::ctrl_c().await?;

    connection.disconnect().await?;
    Ok(())
}
