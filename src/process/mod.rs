// src/process/mod.rs
use anyhow::{Context, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};
use tracing::info;

pub mod filter;
pub mod headers;
pub mod project;
pub mod session;
pub mod timestamps;

pub use session::SessionId;

/// An in-memory telemetry batch: the header row plus every data row of
/// one logger export. Cells stay as text end-to-end; only `lap` and
/// `elapsed_time` are ever parsed.
#[derive(Debug)]
pub struct LapTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl LapTable {
    /// Index of a named column, by exact match on the normalized header.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("required column `{}` not found in {:?}", name, self.headers))
    }
}

/// Result of transforming one export.
#[derive(Debug)]
pub enum TransformOutcome {
    /// Every row carried lap 0; nothing was written and the sink must
    /// not be contacted for this file.
    NoData,
    /// The transformed batch was written to `artifact`.
    Written { artifact: PathBuf, rows: usize },
}

/// Run the full transformation pipeline over one export: normalize
/// headers, drop lap-0 rows, tag the session, rebuild the time column,
/// project to the canonical column order, and write the intermediate
/// artifact the bulk loader copies from.
#[tracing::instrument(level = "info", skip(input), fields(file = %input.as_ref().display()))]
pub fn transform_file<P: AsRef<Path>>(input: P) -> Result<TransformOutcome> {
    let input = input.as_ref();
    info!("processing file");

    let mut table = read_table(input)?;
    table.headers = headers::normalize(&table.headers);
    info!("headers normalized");

    let lap_idx = table.column_index("lap")?;
    let mut table = filter::retain_live_laps(table, lap_idx)?;
    info!(rows = table.rows.len(), "rows after dropping lap 0");
    if table.rows.is_empty() {
        info!("no live laps; skipping file");
        return Ok(TransformOutcome::NoData);
    }

    let stem = file_stem(input);
    let session = SessionId::from_batch_name(&stem);
    session::tag_rows(&mut table, &session);
    info!(session = %session, "session column added");

    let elapsed_idx = table.column_index("elapsed_time")?;
    let elapsed = parse_elapsed(&table, elapsed_idx)?;
    let times = timestamps::reconstruct(&elapsed, timestamps::epoch());
    table.headers.push("time".to_string());
    for (row, t) in table.rows.iter_mut().zip(&times) {
        row.push(timestamps::format_timestamp(*t));
    }
    info!("time column populated");

    project::promote_lead_columns(&mut table)?;

    let artifact = artifact_path(input);
    write_table(&artifact, &table)?;
    info!(artifact = %artifact.display(), "transformed file written");

    Ok(TransformOutcome::Written {
        artifact,
        rows: table.rows.len(),
    })
}

/// Where the intermediate artifact for `input` lives: next to the
/// input, named `<stem>_transformed.csv`.
pub fn artifact_path(input: &Path) -> PathBuf {
    input.with_file_name(format!("{}_transformed.csv", file_stem(input)))
}

fn file_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn read_table(path: &Path) -> Result<LapTable> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("reading header row of {}", path.display()))?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result
            .with_context(|| format!("CSV parse error in {} at record {}", path.display(), idx))?;
        rows.push(record.iter().map(|s| s.to_string()).collect());
    }

    Ok(LapTable { headers, rows })
}

fn write_table(path: &Path, table: &LapTable) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

fn parse_elapsed(table: &LapTable, idx: usize) -> Result<Vec<i64>> {
    table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let cell = row.get(idx).map(String::as_str).unwrap_or("");
            cell.trim().parse::<i64>().with_context(|| {
                format!("row {}: elapsed_time value {:?} is not an integer", i, cell)
            })
        })
        .collect()
}
