use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use procsnap::config::{Config, config_path, load_config, load_config_from_path};
use procsnap::format::format_kib;
use procsnap::logging::{LogFormat, init_tracing, level_for_verbosity};
use procsnap::report::{Report, ReportBuilder, ReportKind};
use procsnap::watch;

#[derive(Parser)]
#[command(
    name = "procsnap",
    about = "JSON snapshots of host memory and process telemetry"
)]
struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Maximum command-line length in bytes, including the terminator
    #[arg(long, global = true)]
    cmdline_max: Option<usize>,

    /// Per-report enumeration deadline in milliseconds
    #[arg(long, global = true)]
    deadline_ms: Option<u64>,

    /// Log format on stderr: text, json
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report every visible process
    System(OutputArgs),
    /// Report only processes that look like container workloads
    Containers(OutputArgs),
    /// Periodically rewrite both reports to files
    Watch {
        /// Refresh interval in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Directory the report files are written to
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Stop after this many refreshes (default: run until Ctrl-C)
        #[arg(long)]
        iterations: Option<usize>,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Write the report to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Emit single-line JSON
    #[arg(long, default_value_t = false)]
    compact: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);

    let log_format = LogFormat::from_str_config(&config.general.log_format);
    init_tracing(log_format, level_for_verbosity(cli.verbose))?;

    let builder = ReportBuilder::new(config.report_options(), config.classifier());

    match &cli.command {
        Command::System(args) => run_once(&builder, ReportKind::System, args, &config),
        Command::Containers(args) => run_once(&builder, ReportKind::Containers, args, &config),
        Command::Watch {
            interval_ms,
            out_dir,
            iterations,
        } => {
            let interval = Duration::from_millis(interval_ms.unwrap_or(config.watch.interval_ms));
            watch::validate(interval, *iterations)?;
            let out_dir = out_dir
                .clone()
                .unwrap_or_else(|| config.watch.output_dir.clone());
            run_watch(builder, &config, interval, &out_dir, *iterations).await
        }
    }
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(max) = cli.cmdline_max {
        config.general.cmdline_max_bytes = max;
    }
    if let Some(deadline) = cli.deadline_ms {
        config.general.deadline_ms = deadline;
    }
    if let Some(ref format) = cli.log_format {
        config.general.log_format = format.clone();
    }

    config
}

fn run_once(builder: &ReportBuilder, kind: ReportKind, args: &OutputArgs, config: &Config) -> Result<()> {
    let report = builder.generate_live(kind)?;
    let json = report.to_json(config.report.pretty && !args.compact)?;

    match &args.output {
        Some(path) => {
            write_atomically(path, &json)?;
            tracing::info!(path = %path.display(), records = report.records.len(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

async fn run_watch(
    builder: ReportBuilder,
    config: &Config,
    interval: Duration,
    out_dir: &Path,
    iterations: Option<usize>,
) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .wrap_err_with(|| format!("failed to create {}", out_dir.display()))?;
    let system_path = out_dir.join(&config.watch.system_file);
    let container_path = out_dir.join(&config.watch.container_file);
    let pretty = config.report.pretty;

    tracing::info!(
        dir = %out_dir.display(),
        interval_ms = interval.as_millis() as u64,
        config = ?config_path(),
        "watch started"
    );

    let shutdown = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    let completed = watch::run_until(interval, iterations, shutdown, move || {
        refresh_files(&builder, &system_path, &container_path, pretty)
    })
    .await;

    tracing::info!(refreshes = completed, "watch stopped");
    Ok(())
}

fn refresh_files(
    builder: &ReportBuilder,
    system_path: &Path,
    container_path: &Path,
    pretty: bool,
) -> Result<()> {
    let system = builder.generate_live(ReportKind::System)?;
    write_report(&system, system_path, pretty)?;

    let containers = builder.generate_live(ReportKind::Containers)?;
    write_report(&containers, container_path, pretty)?;

    tracing::info!(
        processes = system.records.len(),
        containers = containers.records.len(),
        used = %format_kib(system.memory.used_kb()),
        total = %format_kib(system.memory.total_kb),
        "snapshots refreshed"
    );
    Ok(())
}

fn write_report(report: &Report, path: &Path, pretty: bool) -> Result<()> {
    if report.partial {
        tracing::warn!(kind = report.kind.label(), path = %path.display(), "writing partial report");
    }
    write_atomically(path, &report.to_json(pretty)?)
}

/// Readers polling the file never observe a half-written report.
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, contents).wrap_err_with(|| format!("failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .wrap_err_with(|| format!("failed to move report into {}", path.display()))?;
    Ok(())
}
