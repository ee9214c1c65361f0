use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};
use trackload::{
    load::{self, SinkConfig},
    process::{self, TransformOutcome},
    schema::MotorLayout,
};

/// Load track-day lap-telemetry CSV exports into Postgres.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Postgres host name
    host: String,

    /// Postgres user
    user: String,

    /// Postgres password
    password: String,

    /// Destination table name, e.g. buttonwillow_tc38_20241221
    table: String,

    /// Drive-motor count of the vehicle (2 or 3)
    motor_count: u32,

    /// Telemetry CSV export(s), processed sequentially in the order given
    #[arg(long = "file", default_value = "1.csv")]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) parse args + init logging ────────────────────────────────
    let args = Cli::parse();
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) resolve configuration ────────────────────────────────────
    let layout = MotorLayout::from_motor_count(args.motor_count)?;
    let sink = SinkConfig {
        host: args.host,
        user: args.user,
        password: args.password,
    };

    // ─── 3) process each export sequentially ─────────────────────────
    let mut failures = 0usize;
    for file in &args.files {
        if let Err(err) = run_batch(file, &sink, &args.table, layout).await {
            error!("{} failed: {:#}", file.display(), err);
            failures += 1;
        }
    }

    info!("all files processed");
    if failures > 0 {
        anyhow::bail!("{} of {} files failed", failures, args.files.len());
    }
    Ok(())
}

async fn run_batch(file: &Path, sink: &SinkConfig, table: &str, layout: MotorLayout) -> Result<()> {
    // the transform is file-and-CPU bound and stays synchronous
    let (artifact, rows) = match process::transform_file(file)? {
        TransformOutcome::NoData => {
            info!("{}: no data to load; skipping", file.display());
            return Ok(());
        }
        TransformOutcome::Written { artifact, rows } => (artifact, rows),
    };

    let pool = load::connect(sink).await?;
    load::ensure_table(&pool, table, layout).await?;
    let copied = load::copy_artifact(&pool, table, layout, &artifact).await?;
    info!(rows, copied, "batch loaded");
    Ok(())
}
