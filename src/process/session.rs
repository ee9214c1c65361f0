use std::fmt;

use super::LapTable;

/// Session identifier derived from the export's file stem: numeric when
/// the stem parses as an integer (the logger names exports `1.csv`,
/// `2.csv`, ...), textual for anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionId {
    Number(i64),
    Text(String),
}

impl SessionId {
    pub fn from_batch_name(name: &str) -> SessionId {
        match name.parse::<i64>() {
            Ok(n) => SessionId::Number(n),
            Err(_) => SessionId::Text(name.to_string()),
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionId::Number(n) => write!(f, "{}", n),
            SessionId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Append the `session` column, one identical value on every row of the
/// batch.
pub fn tag_rows(table: &mut LapTable, id: &SessionId) {
    table.headers.push("session".to_string());
    let value = id.to_string();
    for row in &mut table.rows {
        row.push(value.clone());
    }
}
