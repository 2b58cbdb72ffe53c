//! Qiniu CDN Exporter Binary
//!
//! Serves Qiniu CDN statistics (hit rates, bandwidth, status code shares) as
//! Prometheus metrics.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
#[cfg(feature = "mocks")]
use qiniu_cdn_exporter_lib::data::qiniu::MockConnection;
use qiniu_cdn_exporter_lib::{
    api::create_app,
    config::{Config, DomainRefresh, LogFormat},
    data::qiniu::{AnyQiniuConnection, HttpConfig, HttpConnection, QBoxSigner},
    log::initialize_logging,
    services::Services,
    window::Granularity,
};
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "qiniu-cdn-exporter")]
#[command(about = "Prometheus exporter for Qiniu CDN statistics", long_about = None)]
struct Args {
    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Qiniu access key
    #[arg(long, env = "QINIU_ACCESS_KEY", hide_env_values = true)]
    access_key: Option<String>,

    /// Qiniu secret key
    #[arg(long, env = "QINIU_SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Override server host
    #[arg(long)]
    host: Option<String>,

    /// Override server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Seconds between the end of the window and now
    #[arg(long)]
    delay_time: Option<i64>,

    /// Seconds between the start of the window and now
    #[arg(long)]
    range_time: Option<i64>,

    /// Sample granularity: 5min, 1hour or 1day
    #[arg(long)]
    granularity: Option<Granularity>,

    /// Path the metrics are served on
    #[arg(long)]
    metrics_path: Option<String>,

    /// Log format: auto, json or text
    #[arg(long)]
    log_format: Option<LogFormat>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;

    initialize_logging(config.log_format);

    info!("Starting Qiniu CDN Exporter");
    config.validate().context("Invalid configuration")?;
    info!("Server will run on {}:{}", config.host, config.port);

    let connection = create_connection(&config).await?;
    let services = Services::new(connection, &config);

    if services.domains.refresh_policy() == DomainRefresh::Startup {
        // a failed enumeration is retried by the first scrape
        if let Err(e) = services.domains.refresh().await {
            warn!("Initial domain enumeration failed: {}", e);
        }
    }

    let app = create_app(services);
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .context("Failed to bind TCP listener")?;

    info!(
        "Serving metrics on http://{}:{}{}",
        config.host, config.port, config.metrics_path
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn load_config() -> Result<Config> {
    let args = Args::parse();

    let mut config = match args.config {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to read config file: {}", path))?,
        None => {
            debug!("No config file specified, using defaults");
            Config::default()
        }
    };

    // Apply CLI and environment overrides
    if let Some(access_key) = args.access_key {
        config.qiniu.access_key = access_key;
    }
    if let Some(secret_key) = args.secret_key {
        config.qiniu.secret_key = secret_key;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(delay_time) = args.delay_time {
        config.window.delay_secs = delay_time;
    }
    if let Some(range_time) = args.range_time {
        config.window.range_secs = range_time;
    }
    if let Some(granularity) = args.granularity {
        config.window.granularity = granularity;
    }
    if let Some(metrics_path) = args.metrics_path {
        config.metrics_path = metrics_path;
    }
    if let Some(log_format) = args.log_format {
        config.log_format = log_format;
    }

    Ok(config)
}

async fn create_connection(config: &Config) -> Result<Arc<AnyQiniuConnection>> {
    #[cfg(feature = "mocks")]
    {
        if config.qiniu.mock_mode {
            info!("Using mock provider connection (mock_mode enabled)");

            let mock_conn = MockConnection::sample().await;
            return Ok(Arc::new(AnyQiniuConnection::Mock(mock_conn)));
        }
    }

    let http_config = HttpConfig::from(&config.qiniu);
    let signer = Arc::new(QBoxSigner::new(
        config.qiniu.access_key.clone(),
        config.qiniu.secret_key.clone(),
    ));

    let http_conn =
        HttpConnection::new(http_config, signer).context("Failed to create provider connection")?;

    info!(
        "Using Qiniu provider at {} and {}",
        config.qiniu.api_host, config.qiniu.fusion_host
    );
    Ok(Arc::new(AnyQiniuConnection::Real(http_conn)))
}
