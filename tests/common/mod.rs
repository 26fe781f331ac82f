#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use medtrack::db::Database;
use medtrack::models::{DoseEvent, DoseSlot, DoseStatus, Medication, Profile};
use tempfile::TempDir;

/// Create a temporary database for testing.
pub fn setup_db() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("test.db");
    let db = Database::open(&db_path).unwrap();
    (dir, db)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// UTC instant on `day` at `h:m`.
pub fn at(day: NaiveDate, h: u32, m: u32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(hm(h, m)))
}

/// Medication with one daily slot per `times` entry, created long ago so
/// every test date is inside its lifetime.
pub fn make_med(profile_id: &str, name: &str, times: &[(u32, u32)]) -> Medication {
    let mut med = Medication::new(profile_id, name);
    med.schedule = times.iter().map(|&(h, m)| DoseSlot::new(hm(h, m))).collect();
    med.created_at = at(date(2020, 1, 1), 0, 0);
    med
}

/// Event for the medication's first slot, scheduled on `day` at `h:m` UTC.
pub fn event(med: &Medication, day: NaiveDate, h: u32, m: u32, status: DoseStatus) -> DoseEvent {
    event_for_slot(med, 0, day, h, m, status)
}

pub fn event_for_slot(
    med: &Medication,
    slot: usize,
    day: NaiveDate,
    h: u32,
    m: u32,
    status: DoseStatus,
) -> DoseEvent {
    DoseEvent::new(
        &med.profile_id,
        &med.id,
        &med.schedule[slot].id,
        status,
        at(day, h, m),
    )
}

/// Stored profile plus the database it lives in.
pub fn setup_profile(db: &Database, name: &str) -> Profile {
    let p = Profile::new(name);
    db.insert_profile(&p).unwrap();
    p
}
