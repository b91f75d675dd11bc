use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use meshwatch::data::{ChartColumns, MetricsData, ServiceTarget, TimeWindow};
use meshwatch::overlay::SpanOverlay;
use meshwatch::settings::Settings;
use meshwatch::source::{FileSource, HttpSource, MetricsQuery, MetricsSource};

/// Window length used when no --from is given.
const DEFAULT_LOOKBACK_SECS: f64 = 1800.0;

#[derive(Parser, Debug)]
#[command(name = "meshwatch")]
#[command(about = "Export chart-ready columns from service-mesh telemetry")]
struct Args {
    /// Path to a captured metrics payload (JSON)
    #[arg(short, long, default_value = "metrics.json", conflicts_with = "endpoint")]
    file: PathBuf,

    /// Query a console API instead of a file (base URL)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Namespace of the target service
    #[arg(short, long, default_value = "default")]
    namespace: String,

    /// Service to query (required with --endpoint)
    #[arg(short, long)]
    service: Option<String>,

    /// Metric to include, repeatable; all metrics when omitted
    #[arg(short, long = "metric")]
    metrics: Vec<String>,

    /// Window start, epoch seconds (default: 30 minutes ago)
    #[arg(long)]
    from: Option<f64>,

    /// Window end, epoch seconds (default: open-ended)
    #[arg(long)]
    to: Option<f64>,

    /// Also fetch a trace-span overlay for the service
    #[arg(long, requires = "endpoint")]
    spans: bool,

    /// Write the export to a file instead of stdout
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Path to a settings file (TOML/JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bearer token override for the console API
    #[arg(long)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("meshwatch=info")),
        )
        // stdout carries the export; keep logs out of it
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let export = if args.endpoint.is_some() {
        run_with_endpoint(&args).await?
    } else {
        run_with_file(&args).await?
    };

    write_export(&export, args.out.as_deref())
}

/// Query a console API for metrics (and optionally spans).
async fn run_with_endpoint(args: &Args) -> Result<serde_json::Value> {
    let settings = load_settings(args)?;
    let service = args
        .service
        .clone()
        .context("--service is required with --endpoint")?;
    let target = ServiceTarget::new(args.namespace.clone(), service);
    let window = resolve_window(args);

    let mut builder = HttpSource::builder()
        .endpoint(settings.endpoint.clone())
        .timeout(settings.timeout());
    if let Some(token) = &settings.token {
        builder = builder.token(token.clone());
    }
    let source = builder.build();

    info!("querying {} via {}", target, source.description());
    let query = MetricsQuery {
        target: target.clone(),
        metrics: args.metrics.clone(),
        window,
    };
    let data = source.fetch_metrics(&query).await?;
    let mut export = build_export(&data);

    if args.spans {
        let (mut overlay, mut rx) = SpanOverlay::create(Box::new(source), target);
        overlay.fetch(window).await?;
        let view = rx.borrow_and_update().clone();
        info!("fetched {} spans ({} errored)", view.points.len(), view.error_count());
        export["overlay"] = serde_json::to_value(&view)?;
    }

    Ok(export)
}

/// Read a captured payload from disk.
async fn run_with_file(args: &Args) -> Result<serde_json::Value> {
    let source = FileSource::new(&args.file);
    info!("reading {}", source.description());

    let query = MetricsQuery {
        target: ServiceTarget::new(
            args.namespace.clone(),
            args.service.clone().unwrap_or_default(),
        ),
        metrics: args.metrics.clone(),
        window: resolve_window(args),
    };
    let data = source.fetch_metrics(&query).await?;
    Ok(build_export(&data))
}

/// Apply command-line overrides on top of loaded settings.
fn load_settings(args: &Args) -> Result<Settings> {
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(endpoint) = &args.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if let Some(token) = &args.token {
        settings.token = Some(token.clone());
    }
    Ok(settings)
}

fn resolve_window(args: &Args) -> TimeWindow {
    let from = args.from.unwrap_or_else(|| {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        now - DEFAULT_LOOKBACK_SECS
    });
    TimeWindow::from_epoch_seconds(from, args.to)
}

/// Build the export document: plain-series columns plus one column set
/// per histogram metric.
fn build_export(data: &MetricsData) -> serde_json::Value {
    let columns = ChartColumns::from_series(&data.series);
    let histograms: serde_json::Map<String, serde_json::Value> = data
        .histograms
        .iter()
        .map(|(metric, histogram)| {
            (metric.clone(), ChartColumns::from_histogram(histogram).to_json())
        })
        .collect();

    serde_json::json!({
        "columns": columns.to_json(),
        "histograms": histograms,
    })
}

/// Write the export as pretty JSON to a file or stdout.
fn write_export(export: &serde_json::Value, out: Option<&Path>) -> Result<()> {
    use std::io::Write;

    let json = serde_json::to_string_pretty(export)?;
    match out {
        Some(path) => {
            let mut file = std::fs::File::create(path)?;
            file.write_all(json.as_bytes())?;
            println!("Exported chart data to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
