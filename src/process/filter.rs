use anyhow::{Context, Result};

use super::LapTable;

/// Drop warm-up samples. Lap 0 marks out-lap/invalid data in the logger
/// export; every other row is kept in file order.
pub fn retain_live_laps(table: LapTable, lap_idx: usize) -> Result<LapTable> {
    let LapTable { headers, rows } = table;
    let mut kept = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        let cell = row.get(lap_idx).map(String::as_str).unwrap_or("");
        let lap: i64 = cell
            .trim()
            .parse()
            .with_context(|| format!("row {}: lap value {:?} is not an integer", i, cell))?;
        if lap != 0 {
            kept.push(row);
        }
    }
    Ok(LapTable { headers, rows: kept })
}
