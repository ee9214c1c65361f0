use chrono::{Duration, NaiveDate, NaiveDateTime};
use tracing::warn;

/// Synthetic wall-clock anchor for the derived time column. The logger
/// only records elapsed milliseconds, so every session is re-anchored at
/// this fixed instant.
pub fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .expect("valid epoch date")
        .and_hms_opt(18, 0, 0)
        .expect("valid epoch time")
}

/// Rebuild absolute timestamps from the cumulative elapsed-time counter.
///
/// The first retained sample lands at `epoch + elapsed[0]`; each later
/// sample advances by its delta to the previous sample. A scan keeps the
/// row-to-row dependency explicit and leaves the recurrence open to a
/// prefix-sum reformulation over the deltas.
///
/// Negative deltas are passed through: the logger promises a
/// non-decreasing counter and this stage does not enforce it, so a
/// corrupt counter produces a decreasing time column. Each occurrence is
/// logged.
pub fn reconstruct(elapsed_ms: &[i64], epoch: NaiveDateTime) -> Vec<NaiveDateTime> {
    elapsed_ms
        .iter()
        .scan(None::<(i64, NaiveDateTime)>, |prev, &ms| {
            let t = match *prev {
                None => epoch + Duration::milliseconds(ms),
                Some((prev_ms, prev_t)) => {
                    let delta = ms - prev_ms;
                    if delta < 0 {
                        warn!(
                            delta,
                            elapsed = ms,
                            "elapsed_time went backwards; derived time will decrease"
                        );
                    }
                    prev_t + Duration::milliseconds(delta)
                }
            };
            *prev = Some((ms, t));
            Some(t)
        })
        .collect()
}

/// Render a derived timestamp the way the destination TIMESTAMP column
/// expects it, with millisecond precision and no timezone.
pub fn format_timestamp(t: NaiveDateTime) -> String {
    t.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}
