use metrics::Unit;
use std::net::SocketAddr;

pub fn init_tracing(log_level: &str, log_format: &str) -> Result<(), String> {
    let filter = std::env::var("TICKSTAT_LOG").unwrap_or_else(|_| log_level.to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    if log_format.trim().eq_ignore_ascii_case("json") {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

/// Every metric the harness and loaders emit, with the unit the exporter
/// should advertise.
const BENCH_METRICS: [(&str, MetricKind, Unit, &str); 6] = [
    (
        "tickstat.bench.elapsed_seconds",
        MetricKind::Histogram,
        Unit::Seconds,
        "fastest wall-clock time over the repeated trials of one (strategy, size)",
    ),
    (
        "tickstat.bench.peak_memory_mib",
        MetricKind::Gauge,
        Unit::Mebibytes,
        "peak resident memory sampled during one (strategy, size) run",
    ),
    (
        "tickstat.bench.trials_total",
        MetricKind::Counter,
        Unit::Count,
        "timed trials run, one fresh strategy instance each",
    ),
    (
        "tickstat.data.ticks_loaded",
        MetricKind::Gauge,
        Unit::Count,
        "ticks loaded and validated for the current run",
    ),
    (
        "tickstat.data.load_ms",
        MetricKind::Histogram,
        Unit::Milliseconds,
        "time spent loading and validating ticks",
    ),
    (
        "tickstat.infra.csv.rows_total",
        MetricKind::Counter,
        Unit::Count,
        "rows parsed from tick CSV files",
    ),
];

fn describe_metrics() {
    for (name, kind, unit, description) in BENCH_METRICS {
        match kind {
            MetricKind::Counter => {
                metrics::describe_counter!(name, unit, description);
            }
            MetricKind::Gauge => {
                metrics::describe_gauge!(name, unit, description);
            }
            MetricKind::Histogram => {
                metrics::describe_histogram!(name, unit, description);
            }
        }
    }
}

fn parse_metrics_addr(raw: &str) -> Result<SocketAddr, String> {
    raw.trim()
        .parse()
        .map_err(|err| format!("invalid --metrics-addr {raw:?} (expected host:port): {err}"))
}

/// Installs the Prometheus exporter when an address is given, then publishes
/// units and help text for the tickstat metrics.
pub fn init_metrics(metrics_addr: Option<&str>) -> Result<Option<SocketAddr>, String> {
    let Some(raw) = metrics_addr else {
        return Ok(None);
    };
    let addr = parse_metrics_addr(raw)?;
    install_exporter(addr)?;
    describe_metrics();
    tracing::info!(
        metrics_addr = %addr,
        described = BENCH_METRICS.len(),
        "serving tickstat metrics"
    );
    Ok(Some(addr))
}

#[cfg(feature = "prometheus")]
fn install_exporter(addr: SocketAddr) -> Result<(), String> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|err| format!("prometheus exporter on {addr}: {err}"))
}

#[cfg(not(feature = "prometheus"))]
fn install_exporter(_addr: SocketAddr) -> Result<(), String> {
    Err("--metrics-addr needs tickstat-bench built with feature `prometheus`".to_string())
}
