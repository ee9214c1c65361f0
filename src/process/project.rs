use anyhow::{Context, Result};

use super::LapTable;

/// Reorder the batch into the canonical presentation order: `time`
/// first, `session` second, every other column left in its
/// post-normalization order. Values are untouched.
pub fn promote_lead_columns(table: &mut LapTable) -> Result<()> {
    // promoting session first, then time, leaves time ahead of session
    promote(table, "session")?;
    promote(table, "time")?;
    Ok(())
}

fn promote(table: &mut LapTable, name: &str) -> Result<()> {
    let idx = table
        .headers
        .iter()
        .position(|h| h == name)
        .with_context(|| format!("column `{}` missing before projection", name))?;
    let header = table.headers.remove(idx);
    table.headers.insert(0, header);
    for row in &mut table.rows {
        if idx < row.len() {
            let cell = row.remove(idx);
            row.insert(0, cell);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LapTable {
        LapTable {
            headers: vec![
                "lap".into(),
                "elapsed_time".into(),
                "speed".into(),
                "session".into(),
                "time".into(),
            ],
            rows: vec![vec![
                "1".into(),
                "1000".into(),
                "88.2".into(),
                "4".into(),
                "2024-01-01 18:00:01.000".into(),
            ]],
        }
    }

    #[test]
    fn time_then_session_lead_the_output() -> Result<()> {
        let mut t = table();
        promote_lead_columns(&mut t)?;
        assert_eq!(
            t.headers,
            vec!["time", "session", "lap", "elapsed_time", "speed"]
        );
        Ok(())
    }

    #[test]
    fn row_values_follow_their_headers() -> Result<()> {
        let mut t = table();
        promote_lead_columns(&mut t)?;
        assert_eq!(
            t.rows[0],
            vec!["2024-01-01 18:00:01.000", "4", "1", "1000", "88.2"]
        );
        Ok(())
    }

    #[test]
    fn remaining_columns_keep_their_relative_order() -> Result<()> {
        let mut t = table();
        promote_lead_columns(&mut t)?;
        let rest: Vec<&str> = t.headers[2..].iter().map(String::as_str).collect();
        assert_eq!(rest, vec!["lap", "elapsed_time", "speed"]);
        Ok(())
    }

    #[test]
    fn missing_time_column_is_an_error() {
        let mut t = LapTable {
            headers: vec!["lap".into(), "session".into()],
            rows: vec![],
        };
        let err = promote_lead_columns(&mut t).unwrap_err();
        assert!(err.to_string().contains("`time` missing"));
    }
}
