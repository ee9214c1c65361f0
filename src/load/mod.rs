// src/load/mod.rs
use anyhow::{bail, Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolCopyExt, PgPoolOptions};
use std::path::Path;
use tracing::info;

use crate::schema::{self, MotorLayout};

/// Fixed sink coordinates; everything else arrives on the command line.
pub const DB_NAME: &str = "tesla_track_db";
pub const DB_PORT: u16 = 5432;

/// Connection parameters for the telemetry sink.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    pub host: String,
    pub user: String,
    pub password: String,
}

/// Connect to the sink. A single blocking round trip with no retry; an
/// unreachable host or rejected credentials aborts the batch.
pub async fn connect(cfg: &SinkConfig) -> Result<PgPool> {
    let opts = PgConnectOptions::new()
        .host(&cfg.host)
        .port(DB_PORT)
        .database(DB_NAME)
        .username(&cfg.user)
        .password(&cfg.password);
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .with_context(|| format!("connecting to postgres at {}:{}", cfg.host, DB_PORT))?;
    info!(host = %cfg.host, db = DB_NAME, "connected to postgres");
    Ok(pool)
}

/// Create the destination table if it does not exist yet. Runs in its
/// own implicit transaction; a failure here aborts the batch before any
/// copy is attempted.
pub async fn ensure_table(pool: &PgPool, table: &str, layout: MotorLayout) -> Result<()> {
    let ddl = schema::create_table_sql(table, layout);
    sqlx::query(&ddl)
        .execute(pool)
        .await
        .with_context(|| format!("creating table {}", table))?;
    info!(table, "destination table ensured");
    Ok(())
}

/// Bulk-append the transformed artifact via COPY, in a transaction
/// separate from the create. COPY maps columns by position, so the
/// artifact's header row must match the destination schema
/// column-for-column; the alignment is checked before any bytes are
/// sent.
#[tracing::instrument(level = "info", skip(pool, artifact), fields(artifact = %artifact.as_ref().display()))]
pub async fn copy_artifact<P: AsRef<Path>>(
    pool: &PgPool,
    table: &str,
    layout: MotorLayout,
    artifact: P,
) -> Result<u64> {
    let artifact = artifact.as_ref();
    let payload = tokio::fs::read(artifact)
        .await
        .with_context(|| format!("reading {}", artifact.display()))?;
    check_header_alignment(&payload, layout)?;

    let stmt = format!("COPY {} FROM STDIN WITH (FORMAT csv, HEADER true)", table);
    let mut copy = pool
        .copy_in_raw(&stmt)
        .await
        .with_context(|| format!("starting COPY into {}", table))?;
    copy.send(payload).await.context("streaming COPY payload")?;
    let rows = copy
        .finish()
        .await
        .with_context(|| format!("finishing COPY into {}", table))?;
    info!(table, rows, "bulk copy committed");
    Ok(rows)
}

fn check_header_alignment(payload: &[u8], layout: MotorLayout) -> Result<()> {
    let header_line = payload.split(|&b| b == b'\n').next().unwrap_or_default();
    let header_line = std::str::from_utf8(header_line)
        .context("artifact header row is not UTF-8")?
        .trim_end_matches('\r');
    let got: Vec<&str> = header_line.split(',').collect();
    let want: Vec<String> = layout.columns().into_iter().map(|c| c.name).collect();
    if got != want {
        bail!(
            "artifact columns do not match the destination schema\n  artifact: {}\n  schema:   {}",
            got.join(","),
            want.join(",")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_for(layout: MotorLayout) -> Vec<u8> {
        let header = layout
            .columns()
            .into_iter()
            .map(|c| c.name)
            .collect::<Vec<_>>()
            .join(",");
        format!("{}\n2024-01-01 18:00:01.000,1,1,1000\n", header).into_bytes()
    }

    #[test]
    fn aligned_header_passes() -> Result<()> {
        check_header_alignment(&payload_for(MotorLayout::Dual), MotorLayout::Dual)?;
        check_header_alignment(&payload_for(MotorLayout::Tri), MotorLayout::Tri)?;
        Ok(())
    }

    #[test]
    fn layout_mismatch_is_rejected_before_copy() {
        let err =
            check_header_alignment(&payload_for(MotorLayout::Dual), MotorLayout::Tri).unwrap_err();
        assert!(err.to_string().contains("do not match"));
    }

    #[test]
    fn crlf_header_rows_still_align() -> Result<()> {
        let mut payload = payload_for(MotorLayout::Dual);
        let pos = payload.iter().position(|&b| b == b'\n').unwrap();
        payload.insert(pos, b'\r');
        check_header_alignment(&payload, MotorLayout::Dual)
    }
}
