mod common;

use chrono::{Duration, FixedOffset};
use common::{at, date, event, event_for_slot, make_med};
use medtrack::models::{AdherenceStats, DoseStatus};
use medtrack::{AdherenceAnalyzer, Error};

const P: &str = "profile-1";

fn analyzer() -> AdherenceAnalyzer<chrono::Utc> {
    // "Now" is 2024-03-10 18:00 UTC.
    AdherenceAnalyzer::utc(at(date(2024, 3, 10), 18, 0))
}

fn today() -> chrono::NaiveDate {
    date(2024, 3, 10)
}

// ---------------------------------------------------------------------------
// Reference scenarios
// ---------------------------------------------------------------------------

#[test]
fn five_days_all_taken() {
    let med = make_med(P, "metformin", &[(8, 0)]);
    let events: Vec<_> = (0..5)
        .map(|i| event(&med, today() - Duration::days(i), 8, 0, DoseStatus::Taken))
        .collect();

    let stats = analyzer().calculate_stats(P, &events, 30).unwrap();

    assert_eq!(stats.total, 5);
    assert_eq!(stats.taken, 5);
    assert_eq!(stats.current_streak, 5);
    assert_eq!(stats.longest_streak, 5);
    assert!((stats.adherence_rate - 100.0).abs() < f64::EPSILON);
}

#[test]
fn miss_three_days_ago_splits_streak() {
    let med = make_med(P, "metformin", &[(8, 0)]);
    let events: Vec<_> = (0..5)
        .map(|i| {
            let status = if i == 2 {
                DoseStatus::Missed
            } else {
                DoseStatus::Taken
            };
            event(&med, today() - Duration::days(i), 8, 0, status)
        })
        .collect();

    let stats = analyzer().calculate_stats(P, &events, 30).unwrap();

    assert_eq!(stats.current_streak, 2);
    assert_eq!(stats.longest_streak, 2);
    assert_eq!(stats.missed, 1);
    assert!((stats.adherence_rate - 80.0).abs() < 1e-9);
}

#[test]
fn no_events_gives_zeroed_stats() {
    let stats = analyzer().calculate_stats(P, &[], 30).unwrap();
    assert_eq!(stats, AdherenceStats::default());
    assert_eq!(stats.adherence_rate, 0.0);
}

// ---------------------------------------------------------------------------
// Window and scoping
// ---------------------------------------------------------------------------

#[test]
fn counts_only_events_inside_window() {
    let med = make_med(P, "lisinopril", &[(9, 0)]);
    let events = vec![
        event(&med, today(), 9, 0, DoseStatus::Taken),
        event(&med, today() - Duration::days(3), 9, 0, DoseStatus::Skipped),
        event(&med, today() - Duration::days(20), 9, 0, DoseStatus::Missed),
    ];

    let stats = analyzer().calculate_stats(P, &events, 7).unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.taken, 1);
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.missed, 0);
    assert!((stats.adherence_rate - 50.0).abs() < 1e-9);
}

#[test]
fn events_after_now_are_outside_window() {
    let med = make_med(P, "lisinopril", &[(9, 0), (20, 0)]);
    let events = vec![
        event_for_slot(&med, 0, today(), 9, 0, DoseStatus::Taken),
        // Later today than "now" (18:00), and months ahead.
        event_for_slot(&med, 1, today(), 20, 0, DoseStatus::Missed),
        event_for_slot(&med, 0, date(2024, 6, 1), 9, 0, DoseStatus::Missed),
    ];

    let stats = analyzer().calculate_stats(P, &events, 30).unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.missed, 0);
    assert!((stats.adherence_rate - 100.0).abs() < f64::EPSILON);
}

#[test]
fn streaks_use_history_outside_window() {
    let med = make_med(P, "lisinopril", &[(9, 0)]);
    let events: Vec<_> = (0..10)
        .map(|i| event(&med, today() - Duration::days(i), 9, 0, DoseStatus::Taken))
        .collect();

    let stats = analyzer().calculate_stats(P, &events, 3).unwrap();
    // 18:00 now minus 3 days keeps today, -1 and -2 (09:00 of -3 is before the cutoff).
    assert_eq!(stats.total, 3);
    assert_eq!(stats.current_streak, 10);
    assert_eq!(stats.longest_streak, 10);
}

#[test]
fn other_profiles_are_ignored() {
    let mine = make_med(P, "statin", &[(9, 0)]);
    let theirs = make_med("profile-2", "statin", &[(9, 0)]);
    let events = vec![
        event(&mine, today(), 9, 0, DoseStatus::Taken),
        event(&theirs, today(), 9, 0, DoseStatus::Missed),
        event(&theirs, today() - Duration::days(1), 9, 0, DoseStatus::Missed),
    ];

    let stats = analyzer().calculate_stats(P, &events, 30).unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.missed, 0);
    assert_eq!(stats.current_streak, 1);
}

#[test]
fn zero_window_is_invalid_input() {
    let err = analyzer().calculate_stats(P, &[], 0).unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

// ---------------------------------------------------------------------------
// Streak rules
// ---------------------------------------------------------------------------

#[test]
fn day_with_any_non_taken_dose_breaks_streak() {
    let med = make_med(P, "antibiotic", &[(8, 0), (20, 0)]);
    let events = vec![
        common::event_for_slot(&med, 0, today(), 8, 0, DoseStatus::Taken),
        common::event_for_slot(&med, 1, today(), 20, 0, DoseStatus::Skipped),
        common::event_for_slot(&med, 0, today() - Duration::days(1), 8, 0, DoseStatus::Taken),
        common::event_for_slot(&med, 1, today() - Duration::days(1), 20, 0, DoseStatus::Taken),
    ];

    let stats = analyzer().calculate_stats(P, &events, 30).unwrap();
    assert_eq!(stats.current_streak, 0);
    assert_eq!(stats.longest_streak, 1);
}

#[test]
fn current_streak_starts_yesterday_when_today_is_empty() {
    let med = make_med(P, "vitamin-d", &[(8, 0)]);
    let events: Vec<_> = (1..4)
        .map(|i| event(&med, today() - Duration::days(i), 8, 0, DoseStatus::Taken))
        .collect();

    let stats = analyzer().calculate_stats(P, &events, 30).unwrap();
    assert_eq!(stats.current_streak, 3);
}

#[test]
fn old_run_is_not_a_current_streak() {
    let med = make_med(P, "vitamin-d", &[(8, 0)]);
    let events: Vec<_> = (60..65)
        .map(|i| event(&med, today() - Duration::days(i), 8, 0, DoseStatus::Taken))
        .collect();

    let stats = analyzer().calculate_stats(P, &events, 30).unwrap();
    assert_eq!(stats.total, 0);
    assert_eq!(stats.current_streak, 0);
    assert_eq!(stats.longest_streak, 5);
}

#[test]
fn two_day_gap_before_today_resets_current_streak() {
    let med = make_med(P, "vitamin-d", &[(8, 0)]);
    let events: Vec<_> = (2..5)
        .map(|i| event(&med, today() - Duration::days(i), 8, 0, DoseStatus::Taken))
        .collect();

    let stats = analyzer().calculate_stats(P, &events, 30).unwrap();
    assert_eq!(stats.current_streak, 0);
    assert_eq!(stats.longest_streak, 3);
}

#[test]
fn gap_day_breaks_current_streak() {
    let med = make_med(P, "vitamin-d", &[(8, 0)]);
    let events = vec![
        event(&med, today(), 8, 0, DoseStatus::Taken),
        event(&med, today() - Duration::days(2), 8, 0, DoseStatus::Taken),
        event(&med, today() - Duration::days(3), 8, 0, DoseStatus::Taken),
    ];

    let stats = analyzer().calculate_stats(P, &events, 30).unwrap();
    assert_eq!(stats.current_streak, 1);
    assert_eq!(stats.longest_streak, 2);
}

#[test]
fn duplicate_events_for_same_slot_and_day_count_once() {
    medtrack::logging::init_test();
    let med = make_med(P, "metformin", &[(8, 0)]);
    let first = event(&med, today(), 8, 0, DoseStatus::Taken);
    let mut dup = event(&med, today(), 8, 0, DoseStatus::Missed);
    dup.scheduled_time = first.scheduled_time + Duration::minutes(1);

    let stats = analyzer().calculate_stats(P, &[first, dup], 30).unwrap();
    assert_eq!(stats.total, 1);
    assert_eq!(stats.taken, 1);
    assert_eq!(stats.current_streak, 1);
}

#[test]
fn days_follow_the_analyzer_time_zone() {
    let med = make_med(P, "metformin", &[(23, 30)]);
    // 23:30 UTC on consecutive days is the next morning in UTC+02:00.
    let events = vec![
        event(&med, date(2024, 3, 9), 23, 30, DoseStatus::Taken),
        event(&med, date(2024, 3, 8), 23, 30, DoseStatus::Taken),
    ];
    let tz = FixedOffset::east_opt(2 * 3600).unwrap();
    let now = at(date(2024, 3, 10), 12, 0);
    let analyzer = AdherenceAnalyzer::new(now, tz);

    assert_eq!(analyzer.today(), date(2024, 3, 10));
    let stats = analyzer.calculate_stats(P, &events, 30).unwrap();
    // Local days 03-09 and 03-10: the streak includes today.
    assert_eq!(stats.current_streak, 2);
}

#[test]
fn repeated_calls_are_identical() {
    let med = make_med(P, "metformin", &[(8, 0)]);
    let events: Vec<_> = (0..6)
        .map(|i| {
            let status = if i % 4 == 1 {
                DoseStatus::Missed
            } else {
                DoseStatus::Taken
            };
            event(&med, today() - Duration::days(i), 8, 0, status)
        })
        .collect();

    let a = analyzer();
    assert_eq!(
        a.calculate_stats(P, &events, 30).unwrap(),
        a.calculate_stats(P, &events, 30).unwrap()
    );
}
