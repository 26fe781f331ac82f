use anyhow::Result;
use rusqlite::Connection;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS profiles (
            id         TEXT PRIMARY KEY,
            name       TEXT NOT NULL UNIQUE,
            relation   TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS medications (
            id           TEXT PRIMARY KEY,
            profile_id   TEXT NOT NULL,
            name         TEXT NOT NULL,
            dosage       TEXT,
            instructions TEXT,
            active       INTEGER NOT NULL DEFAULT 1,
            created_at   TEXT NOT NULL,
            stopped_at   TEXT
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_medications_active_name
            ON medications(profile_id, name) WHERE active = 1;

        CREATE TABLE IF NOT EXISTS dose_slots (
            id            TEXT PRIMARY KEY,
            medication_id TEXT NOT NULL,
            time          TEXT NOT NULL,
            weekdays      TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_dose_slots_med ON dose_slots(medication_id);

        CREATE TABLE IF NOT EXISTS dose_events (
            id             TEXT PRIMARY KEY,
            profile_id     TEXT NOT NULL,
            medication_id  TEXT NOT NULL,
            slot_id        TEXT NOT NULL,
            status         TEXT NOT NULL,
            scheduled_time TEXT NOT NULL,
            scheduled_day  TEXT NOT NULL,
            action_time    TEXT,
            reason         TEXT
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_dose_events_slot_day
            ON dose_events(medication_id, slot_id, scheduled_day);
        CREATE INDEX IF NOT EXISTS idx_dose_events_profile_ts
            ON dose_events(profile_id, scheduled_time);",
    )?;
    Ok(())
}
