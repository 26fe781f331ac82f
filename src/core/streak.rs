//! Day-level streak counting.
//!
//! Both functions take a map from calendar day to "every dose that day was
//! taken". Only days with at least one recorded dose appear in the map, so a
//! day with nothing scheduled neither breaks nor extends a streak on its own;
//! what breaks a streak is a gap of more than one day between recorded days.

use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Consecutive qualifying days ending today, or yesterday when nothing is
/// recorded for today yet. Days after `today` are ignored.
pub fn current_streak(days: &BTreeMap<NaiveDate, bool>, today: NaiveDate) -> u32 {
    let mut streak = 0u32;
    // Measured from today, the first day walked must be today or yesterday.
    let mut prev = today;

    for (&day, &qualifies) in days.range(..=today).rev() {
        if (prev - day).num_days() > 1 || !qualifies {
            break;
        }
        streak += 1;
        prev = day;
    }
    streak
}

/// Longest run of consecutive qualifying days anywhere in `days`.
pub fn longest_streak(days: &BTreeMap<NaiveDate, bool>) -> u32 {
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;

    for (&day, &qualifies) in days.iter().rev() {
        if let Some(p) = prev
            && (p - day).num_days() > 1
        {
            run = 0;
        }
        if qualifies {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
        prev = Some(day);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn days(entries: &[(u32, bool)]) -> BTreeMap<NaiveDate, bool> {
        entries.iter().map(|&(day, ok)| (d(day), ok)).collect()
    }

    #[test]
    fn empty_map_has_no_streaks() {
        let map = BTreeMap::new();
        assert_eq!(current_streak(&map, d(10)), 0);
        assert_eq!(longest_streak(&map), 0);
    }

    #[test]
    fn current_streak_starts_yesterday_when_today_is_empty() {
        let map = days(&[(7, true), (8, true), (9, true)]);
        assert_eq!(current_streak(&map, d(10)), 3);
    }

    #[test]
    fn current_streak_zero_when_last_recorded_day_is_older() {
        // Nothing recorded on the 10th or the 9th.
        let map = days(&[(6, true), (7, true), (8, true)]);
        assert_eq!(current_streak(&map, d(10)), 0);
        assert_eq!(longest_streak(&map), 3);
    }

    #[test]
    fn current_streak_stops_at_gap() {
        let map = days(&[(5, true), (6, true), (8, true), (9, true)]);
        assert_eq!(current_streak(&map, d(9)), 2);
    }

    #[test]
    fn current_streak_zero_when_latest_day_incomplete() {
        let map = days(&[(8, true), (9, false)]);
        assert_eq!(current_streak(&map, d(9)), 0);
    }

    #[test]
    fn current_streak_ignores_future_days() {
        let map = days(&[(8, true), (9, true), (12, false)]);
        assert_eq!(current_streak(&map, d(10)), 2);
    }

    #[test]
    fn longest_streak_resets_on_miss_and_gap() {
        let map = days(&[
            (1, true),
            (2, true),
            (3, true),
            (4, false),
            (5, true),
            (7, true),
            (8, true),
        ]);
        assert_eq!(longest_streak(&map), 3);
    }

    #[test]
    fn longest_streak_counts_run_after_gap() {
        let map = days(&[(1, true), (3, true), (4, true), (5, true), (6, true)]);
        assert_eq!(longest_streak(&map), 4);
    }
}
