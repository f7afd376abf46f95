use std::sync::Arc;

use igr_core::config::Config;
use igr_instagram::{InstagramClient, InstagramConfig};

#[tokio::main]
async fn main() -> Result<(), igr_core::Error> {
    igr_core::logging::init("igr")?;

    let cfg = match Config::load() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            tracing::error!(error = %e, "configuration incomplete, refusing to start");
            return Err(e);
        }
    };
    tracing::debug!(config = ?cfg, "configuration loaded");

    let client = Arc::new(InstagramClient::new(InstagramConfig::from(cfg.as_ref()))?);

    igr_telegram::router::run_polling(cfg, client)
        .await
        .map_err(|e| igr_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
