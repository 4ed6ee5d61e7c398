use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset: the service crate and HTTP tracing at
/// info, sqlx only when a query misbehaves.
pub fn default_directives(service_name: &str) -> String {
    format!(
        "{}=info,shared=info,tower_http=info,sqlx=warn",
        service_name.replace('-', "_")
    )
}

pub fn init_tracing(service_name: &'static str) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(service_name)))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .compact(),
        )
        .try_init()?;

    tracing::info!(service = service_name, "Tracing initialized");

    Ok(())
}

/// Serve Prometheus metrics on `0.0.0.0:<port>/metrics`.
pub fn init_metrics(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    PrometheusBuilder::new().with_http_listener(addr).install()?;

    tracing::info!(addr = %addr, "Metrics exporter listening");

    Ok(())
}

pub fn record_timing(metric_name: &'static str, duration_secs: f64) {
    metrics::histogram!(metric_name).record(duration_secs);
}

pub fn record_counter(metric_name: &'static str, value: u64) {
    metrics::counter!(metric_name).increment(value);
}
