//! Lap-telemetry CSV importer: normalizes logger exports, rebuilds
//! wall-clock timestamps from the elapsed-time counter, and bulk-loads
//! the result into Postgres.

pub mod load;
pub mod process;
pub mod schema;
