use std::net::Ipv4Addr;

use anyhow::Context as _;
use contact_relay::{build_state, router, serve, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,contact_relay=debug"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let config = Config::load().context("could not read configuration from environment")?;
    let port = config.port;

    let state = build_state(&config).context("could not initialise mail dispatch")?;
    match (config.smtp(), state.dispatcher.verify_transport().await) {
        (Some(smtp), Some(Ok(true))) => {
            tracing::info!(host = %smtp.host, port = smtp.port, "SMTP server reachable")
        }
        (Some(smtp), Some(Ok(false))) => {
            tracing::warn!(host = %smtp.host, "SMTP server did not accept the connection test")
        }
        (Some(smtp), Some(Err(e))) => {
            tracing::warn!(host = %smtp.host, error = %e, "SMTP connection test failed")
        }
        _ => tracing::warn!(
            "SMTP_HOST, SMTP_USER or SMTP_PASS missing; emails will only be logged (test mode)"
        ),
    }
    state.rate_limit.spawn_pruner();

    let app = router(state, &config);
    serve((Ipv4Addr::UNSPECIFIED, port), app)
        .await
        .context("error running HTTP server")?;
    Ok(())
}
