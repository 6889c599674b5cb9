use anyhow::Result;
use circuit_rotation::{api, config, controller, telemetry};
use config::Config;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;

    #[cfg(feature = "db")]
    if !cfg.rotation.demo_data && cfg.db.url.starts_with("__SET_VIA_ENV") {
        anyhow::bail!("ROTATION__DB__URL must point at the rotation database");
    }

    let app_state = controller::AppState::new(cfg.clone()).await?;
    let app = api::router(app_state, &cfg);

    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("server binding to 0.0.0.0, the API will be reachable from the network");
    }

    info!(
        %addr,
        tolerance_ratio = cfg.rotation.tolerance_ratio,
        demo_data = cfg.rotation.demo_data,
        "starting circuit rotation service"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
