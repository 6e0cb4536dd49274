use actix_web::{middleware, HttpServer};
use clap::Parser;
use tracing::info;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use directory_api::collector::CollectorClient;
use directory_api::config::Config;
use directory_api::{routes, telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Logging
    let _ = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish()
        .try_init();

    // Config
    let cfg = Config::parse();

    // Init subsystems
    let prometheus = telemetry::install_recorder()?;
    let collector = CollectorClient::new(
        cfg.collector_url.clone(),
        &cfg.user_agent,
        cfg.upstream_timeout(),
    )?;

    info!(collector = %collector.url(), bind = %cfg.bind, "starting api");
    let mut server = HttpServer::new(move || {
        routes::app(collector.clone(), prometheus.clone()).wrap(middleware::Logger::default())
    })
    .bind(&cfg.bind)?;
    if let Some(workers) = cfg.workers {
        server = server.workers(workers);
    }
    server.run().await?;
    Ok(())
}
