//! The time window bounding one run's measurement query.

use chrono::{DateTime, Duration, Timelike, Utc};

/// A half-open measurement window `(start, end]`.
///
/// Created once per run, typically as "now minus a fixed look-back", and
/// discarded after the query call. Frames are published on a fixed cadence,
/// so [`QueryWindow::slots`] enumerates the timestamps a complete provider
/// would have inside the window: a 60-minute window on a 10-minute cadence
/// yields exactly six slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QueryWindow {
    /// Builds a window from explicit bounds. `start` must not be after `end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        assert!(start <= end, "query window start after end");
        Self { start, end }
    }

    /// The window ending at `end` and reaching `look_back` into the past.
    pub fn trailing(end: DateTime<Utc>, look_back: Duration) -> Self {
        Self::new(end - look_back, end)
    }

    /// Whether `ts` lies inside the window (start exclusive, end inclusive).
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts > self.start && ts <= self.end
    }

    /// Timestamps on the `cadence_minutes` grid that fall inside the window,
    /// ascending. Grid points are aligned to whole multiples of the cadence
    /// within the hour, matching the provider's publication times.
    pub fn slots(&self, cadence_minutes: i64) -> Vec<DateTime<Utc>> {
        assert!(cadence_minutes > 0, "cadence must be positive");
        let step = Duration::minutes(cadence_minutes);
        let mut slot = align_down(self.end, cadence_minutes);
        let mut out = Vec::new();
        while slot > self.start {
            out.push(slot);
            slot -= step;
        }
        out.reverse();
        out
    }
}

/// Snaps `ts` down to the previous whole multiple of `cadence_minutes`.
fn align_down(ts: DateTime<Utc>, cadence_minutes: i64) -> DateTime<Utc> {
    let step = cadence_minutes * 60;
    let rem = ts.timestamp().rem_euclid(step);
    ts - Duration::seconds(rem) - Duration::nanoseconds(ts.nanosecond() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 9, 4, h, m, 0).unwrap()
    }

    #[test]
    fn one_hour_window_yields_six_ten_minute_slots() {
        let window = QueryWindow::trailing(ts(13, 0), Duration::minutes(60));
        let slots = window.slots(10);
        assert_eq!(slots.len(), 6);
        assert_eq!(slots.first().copied(), Some(ts(12, 10)));
        assert_eq!(slots.last().copied(), Some(ts(13, 0)));
        for pair in slots.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::minutes(10));
        }
    }

    #[test]
    fn unaligned_window_end_snaps_to_grid() {
        let window = QueryWindow::trailing(ts(13, 7), Duration::minutes(60));
        let slots = window.slots(10);
        assert_eq!(slots.len(), 6);
        assert_eq!(slots.first().copied(), Some(ts(12, 10)));
        assert_eq!(slots.last().copied(), Some(ts(13, 0)));
    }

    #[test]
    fn contains_is_start_exclusive_end_inclusive() {
        let window = QueryWindow::new(ts(12, 0), ts(13, 0));
        assert!(!window.contains(ts(12, 0)));
        assert!(window.contains(ts(12, 10)));
        assert!(window.contains(ts(13, 0)));
        assert!(!window.contains(ts(13, 10)));
    }

    #[test]
    fn empty_window_has_no_slots() {
        let window = QueryWindow::new(ts(12, 0), ts(12, 0));
        assert!(window.slots(10).is_empty());
    }
}
