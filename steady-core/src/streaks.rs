//! Daily streak detection.
//!
//! Instants are bucketed into local calendar days, deduplicated and walked
//! newest-first. Two days are consecutive when their local midnights are at
//! most [`STREAK_SLACK_HOURS`] apart, so 23 h and 25 h DST days still chain.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::time::{Timestamp, local_midnight};

/// 1.5 days.
pub const STREAK_SLACK_HOURS: i64 = 36;

/// Length of the longest run of consecutive local days.
pub fn longest_daily_run(stamps: impl IntoIterator<Item = Timestamp>, tz: Tz) -> usize {
    let days: BTreeSet<NaiveDate> = stamps.into_iter().map(|t| t.local_date(tz)).collect();

    let mut best = 0usize;
    let mut run = 0usize;
    let mut newer: Option<chrono::DateTime<chrono::Utc>> = None;

    for day in days.into_iter().rev() {
        let midnight = local_midnight(day, tz);
        run = match newer {
            Some(prev) if (prev - midnight).num_minutes() <= STREAK_SLACK_HOURS * 60 => run + 1,
            _ => 1,
        };
        best = best.max(run);
        newer = Some(midnight);
    }

    best
}

/// Whether some run of `days` consecutive local days exists.
pub fn has_daily_streak(stamps: impl IntoIterator<Item = Timestamp>, tz: Tz, days: usize) -> bool {
    days == 0 || longest_daily_run(stamps, tz) >= days
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn at(y: i32, m: u32, d: u32, h: u32) -> Timestamp {
        Timestamp::new(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
    }

    #[test]
    fn test_same_day_entries_count_once() {
        let stamps = vec![at(2024, 1, 1, 8), at(2024, 1, 1, 20), at(2024, 1, 2, 9)];
        assert_eq!(longest_daily_run(stamps, Tz::UTC), 2);
    }

    #[test]
    fn test_gap_resets_run() {
        let stamps = vec![at(2024, 1, 1, 8), at(2024, 1, 2, 8), at(2024, 1, 4, 8), at(2024, 1, 5, 8), at(2024, 1, 6, 8)];
        assert_eq!(longest_daily_run(stamps, Tz::UTC), 3);
        assert!(!has_daily_streak(Vec::new(), Tz::UTC, 1));
        assert!(has_daily_streak(Vec::new(), Tz::UTC, 0));
    }

    #[test]
    fn test_dst_spring_forward_keeps_streak() {
        let ny: Tz = "America/New_York".parse().unwrap();
        let start = Utc.with_ymd_and_hms(2024, 3, 7, 17, 0, 0).unwrap();
        let stamps: Vec<Timestamp> = (0..7).map(|i| Timestamp::new(start + Duration::days(i))).collect();
        assert!(has_daily_streak(stamps, ny, 7));
    }

    #[test]
    fn test_days_follow_display_timezone() {
        // 23:30 and 00:30 Chicago time on consecutive local days, but the same UTC day.
        let chicago: Tz = "America/Chicago".parse().unwrap();
        let a = Timestamp::parse("2024-01-10T05:30:00Z").unwrap();
        let b = Timestamp::parse("2024-01-10T06:30:00Z").unwrap();
        assert_eq!(longest_daily_run(vec![a, b], chicago), 2);
        assert_eq!(longest_daily_run(vec![a, b], Tz::UTC), 1);
    }
}
