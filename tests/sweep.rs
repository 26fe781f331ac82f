mod common;

use chrono::{Duration, Utc, Weekday};
use common::{at, date, event, hm, make_med, setup_db, setup_profile};
use medtrack::core::sweep::{infer_missed, run_sweep};
use medtrack::models::config::Config;
use medtrack::models::{DoseSlot, DoseStatus, Medication};

const P: &str = "profile-1";

fn grace() -> Duration {
    Duration::minutes(30)
}

#[test]
fn infers_every_elapsed_unrecorded_occurrence() {
    let med = make_med(P, "antibiotic", &[(8, 0), (20, 0)]);
    let now = at(date(2024, 3, 10), 9, 0);

    let missed = infer_missed(&[med.clone()], &[], now, &Utc, grace(), 2);

    // 8th and 9th both slots, 10th only the morning one.
    assert_eq!(missed.len(), 5);
    assert!(missed.iter().all(|e| e.status == DoseStatus::Missed));
    assert!(missed.iter().all(|e| e.action_time.is_none()));
    assert!(missed.iter().all(|e| e.profile_id == P && e.medication_id == med.id));
    assert!(missed.iter().any(|e| e.scheduled_time == at(date(2024, 3, 10), 8, 0)));
    assert!(!missed.iter().any(|e| e.scheduled_time == at(date(2024, 3, 10), 20, 0)));
}

#[test]
fn recorded_occurrences_are_left_alone() {
    let med = make_med(P, "aspirin", &[(8, 0)]);
    let now = at(date(2024, 3, 10), 12, 0);
    let events = vec![
        event(&med, date(2024, 3, 9), 8, 0, DoseStatus::Taken),
        event(&med, date(2024, 3, 10), 8, 0, DoseStatus::Skipped),
    ];

    let missed = infer_missed(&[med], &events, now, &Utc, grace(), 2);
    assert_eq!(missed.len(), 1);
    assert_eq!(missed[0].scheduled_time, at(date(2024, 3, 8), 8, 0));
}

#[test]
fn grace_period_boundary() {
    let med = make_med(P, "aspirin", &[(8, 0)]);
    let meds = [med];

    let before = infer_missed(&meds, &[], at(date(2024, 3, 10), 8, 29), &Utc, grace(), 0);
    assert!(before.is_empty());

    let exactly = infer_missed(&meds, &[], at(date(2024, 3, 10), 8, 30), &Utc, grace(), 0);
    assert_eq!(exactly.len(), 1);
}

#[test]
fn stopped_medications_are_not_swept() {
    let mut med = make_med(P, "aspirin", &[(8, 0)]);
    med.active = false;
    let missed = infer_missed(&[med], &[], at(date(2024, 3, 10), 12, 0), &Utc, grace(), 7);
    assert!(missed.is_empty());
}

#[test]
fn nothing_before_the_medication_existed() {
    let mut med = make_med(P, "aspirin", &[(8, 0), (20, 0)]);
    med.created_at = at(date(2024, 3, 10), 7, 0);

    let missed = infer_missed(&[med], &[], at(date(2024, 3, 10), 21, 0), &Utc, grace(), 7);
    assert_eq!(missed.len(), 1);
    assert_eq!(missed[0].scheduled_time, at(date(2024, 3, 10), 8, 0));
}

#[test]
fn weekday_slots_only_on_their_days() {
    let mut med = Medication::new(P, "weekly");
    med.created_at = at(date(2020, 1, 1), 0, 0);
    med.schedule = vec![DoseSlot::new(hm(9, 0)).with_weekdays(vec![Weekday::Mon])];

    // Sunday the 10th; the week back includes Monday the 4th.
    let missed = infer_missed(&[med], &[], at(date(2024, 3, 10), 12, 0), &Utc, grace(), 7);
    assert_eq!(missed.len(), 1);
    assert_eq!(missed[0].scheduled_time, at(date(2024, 3, 4), 9, 0));
}

#[test]
fn huge_lookback_is_bounded_by_creation() {
    let mut med = make_med(P, "aspirin", &[(8, 0)]);
    med.created_at = at(date(2024, 3, 1), 0, 0);
    let missed = infer_missed(&[med], &[], at(date(2024, 3, 10), 12, 0), &Utc, grace(), u32::MAX);
    assert_eq!(missed.len(), 10);
}

#[test]
fn run_sweep_persists_once() {
    let (_dir, db) = setup_db();
    let p = setup_profile(&db, "self");
    let mut med = Medication::new(&p.id, "aspirin");
    med.created_at = Utc::now() - Duration::days(3);
    med.schedule = vec![DoseSlot::new(hm(12, 0))];
    db.insert_medication(&med).unwrap();
    let config = Config::default();

    let first = run_sweep(&db, &config, Utc::now()).unwrap();
    assert!(first.len() >= 2);
    assert_eq!(db.list_dose_events(Some(&p.id)).unwrap().len(), first.len());

    let second = run_sweep(&db, &config, Utc::now()).unwrap();
    assert!(second.is_empty());
    assert_eq!(db.list_dose_events(Some(&p.id)).unwrap().len(), first.len());
}
