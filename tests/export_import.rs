mod common;

use common::{at, date, setup_db, setup_profile};
use medtrack::core::export::{calendar_to_csv, import_events_json, stats_to_csv, to_json};
use medtrack::models::{AdherenceStats, CalendarDay, DoseEvent, DoseSlot, DoseStatus, Medication};

fn stored_med(db: &medtrack::db::Database) -> Medication {
    let p = setup_profile(db, "self");
    let mut med = Medication::new(&p.id, "aspirin");
    med.schedule = vec![DoseSlot::new(common::hm(8, 0))];
    db.insert_medication(&med).unwrap();
    med
}

#[test]
fn calendar_csv_layout() {
    let days = vec![
        CalendarDay::empty(date(2024, 1, 1)),
        CalendarDay {
            date: date(2024, 1, 2),
            ratio: 2.0 / 3.0,
            total: 3,
            taken: 2,
        },
    ];
    let csv = calendar_to_csv(&days);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "date,adherence_rate,taken,total");
    assert_eq!(lines[1], "2024-01-01,0.0,0,0");
    assert_eq!(lines[2], "2024-01-02,66.7,2,3");
    assert_eq!(lines.len(), 3);
}

#[test]
fn stats_csv_layout() {
    let stats = AdherenceStats {
        total: 5,
        taken: 4,
        missed: 1,
        skipped: 0,
        adherence_rate: 80.0,
        current_streak: 2,
        longest_streak: 2,
    };
    let csv = stats_to_csv(&stats);
    assert_eq!(
        csv,
        "total,taken,missed,skipped,adherence_rate,current_streak,longest_streak\n5,4,1,0,80.0,2,2\n"
    );
}

#[test]
fn exported_events_import_into_fresh_database() {
    let (_dir, db) = setup_db();
    let med = stored_med(&db);
    let mut e = DoseEvent::new(
        &med.profile_id,
        &med.id,
        &med.schedule[0].id,
        DoseStatus::Skipped,
        at(date(2024, 1, 2), 12, 0),
    );
    e.reason = Some("travel".to_string());
    db.insert_dose_event(&e).unwrap();
    let json = to_json(&db.list_dose_events(None).unwrap()).unwrap();

    let (_dir2, other) = setup_db();
    let summary = import_events_json(&other, &json).unwrap();
    assert_eq!(summary.parsed, 1);
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.duplicates, 0);
    assert_eq!(other.list_dose_events(None).unwrap(), vec![e]);
}

#[test]
fn import_counts_duplicates() {
    let (_dir, db) = setup_db();
    let med = stored_med(&db);
    let json = format!(
        r#"[
          {{"profile_id":"{p}","medication_id":"{m}","slot_id":"{s}","status":"taken","scheduled_time":"2024-01-02T12:00:00Z"}},
          {{"profile_id":"{p}","medication_id":"{m}","slot_id":"{s}","status":"missed","scheduled_time":"2024-01-02T12:00:00Z"}}
        ]"#,
        p = med.profile_id,
        m = med.id,
        s = med.schedule[0].id
    );

    let summary = import_events_json(&db, &json).unwrap();
    assert_eq!(summary.parsed, 2);
    assert_eq!(summary.inserted, 1);
    assert_eq!(summary.duplicates, 1);
    assert_eq!(db.list_dose_events(None).unwrap()[0].status, DoseStatus::Taken);
}

#[test]
fn one_bad_record_rejects_the_file() {
    let (_dir, db) = setup_db();
    let json = r#"[
      {"profile_id":"p","medication_id":"m","slot_id":"s","status":"taken","scheduled_time":"2024-01-02T08:00:00Z"},
      {"profile_id":"p","medication_id":"m","slot_id":"s","status":"taken","scheduled_time":"yesterday"}
    ]"#;

    let err = import_events_json(&db, json).unwrap_err();
    assert!(err.to_string().contains("scheduled_time"));
    assert!(db.list_dose_events(None).unwrap().is_empty());
}

#[test]
fn unknown_status_is_rejected() {
    let (_dir, db) = setup_db();
    let json = r#"[{"profile_id":"p","medication_id":"m","slot_id":"s","status":"forgot","scheduled_time":"2024-01-02T08:00:00Z"}]"#;
    assert!(import_events_json(&db, json).is_err());
}

#[test]
fn malformed_json_is_rejected() {
    let (_dir, db) = setup_db();
    assert!(import_events_json(&db, "{not json").is_err());
}
