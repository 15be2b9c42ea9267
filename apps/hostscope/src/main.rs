//! hostscope entry point: prints a JSON telemetry snapshot to stdout.

mod config;
mod report;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use hostscope_protocol::Facet;
use hostscope_telemetry::ProbeOptions;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Point-in-time hardware and OS telemetry as JSON")]
struct Cli {
    /// Facet to query; repeat to select several. Defaults to every facet.
    #[arg(long = "facet", value_name = "FACET")]
    facets: Vec<Facet>,

    /// Path whose filesystem is reported by `disk_usage`.
    #[arg(long, value_name = "PATH")]
    disk_path: Option<PathBuf>,

    /// External command timeout in seconds.
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Print the report on a single line.
    #[arg(long)]
    compact: bool,

    /// Configuration file to use instead of the default location.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays pure JSON.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.disk_path {
        config.disk_path = path;
    }
    if let Some(secs) = cli.timeout {
        config.command_timeout_secs = secs;
    }
    if cli.compact {
        config.pretty = false;
    }

    let facets = if cli.facets.is_empty() {
        Facet::ALL.to_vec()
    } else {
        cli.facets
    };

    let probe = hostscope_telemetry::detect(&ProbeOptions {
        command_timeout: config.command_timeout(),
    });
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        family = %probe.family(),
        facets = facets.len(),
        "collecting telemetry"
    );

    let report = report::collect(probe.as_ref(), &facets, &config.disk_path);
    tracing::info!(
        collected = report.collected(),
        unavailable = report.unavailable_count(),
        "collection finished"
    );

    let mut stdout = std::io::stdout().lock();
    if config.pretty {
        serde_json::to_writer_pretty(&mut stdout, &report)?;
    } else {
        serde_json::to_writer(&mut stdout, &report)?;
    }
    writeln!(stdout)?;
    Ok(())
}
