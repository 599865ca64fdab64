use crate::errors::{Error, Result};
use lazy_static::lazy_static;
use prometheus::{Counter, Encoder, Gauge, Histogram, HistogramOpts, Opts, Registry, TextEncoder};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
    pub static ref FETCH_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_fetch_total",
        "Total read requests issued to the backend"
    ))
    .unwrap();
    pub static ref FETCH_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_fetch_failures_total",
        "Total read requests that failed on the network or while parsing"
    ))
    .unwrap();
    pub static ref FETCH_LATENCY_SECONDS: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "dashboard_fetch_latency_seconds",
            "Time taken by a backend read"
        )
        .buckets(vec![
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0
        ])
    )
    .unwrap();
    pub static ref RENDERS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_renders_total",
        "Total full-replace renders of the page"
    ))
    .unwrap();
    pub static ref MARKERS: Gauge = Gauge::with_opts(Opts::new(
        "dashboard_markers",
        "Markers currently on the map"
    ))
    .unwrap();
    pub static ref MUTATIONS_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_mutations_total",
        "Total write requests accepted by the backend"
    ))
    .unwrap();
    pub static ref MUTATION_FAILURES_TOTAL: Counter = Counter::with_opts(Opts::new(
        "dashboard_mutation_failures_total",
        "Total write requests that failed"
    ))
    .unwrap();
}

/// Registers every collector with [`REGISTRY`]. Safe to call more than once.
pub fn init_metrics() -> Result<()> {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(FETCH_TOTAL.clone()),
        Box::new(FETCH_FAILURES_TOTAL.clone()),
        Box::new(FETCH_LATENCY_SECONDS.clone()),
        Box::new(RENDERS_TOTAL.clone()),
        Box::new(MARKERS.clone()),
        Box::new(MUTATIONS_TOTAL.clone()),
        Box::new(MUTATION_FAILURES_TOTAL.clone()),
    ];

    for collector in collectors {
        match REGISTRY.register(collector) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(Error::Metrics(e)),
        }
    }
    Ok(())
}

pub fn gather_metrics() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| Error::Validation(format!("metrics are not UTF-8: {}", e)))
}
