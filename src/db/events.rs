use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc};
use rusqlite::{Connection, params};

use crate::models::{DoseEvent, DoseStatus};

use super::Database;

struct DoseEventRow {
    id: String,
    profile_id: String,
    medication_id: String,
    slot_id: String,
    status: String,
    scheduled_time: String,
    action_time: Option<String>,
    reason: Option<String>,
}

fn row_to_event(r: DoseEventRow) -> Result<DoseEvent> {
    let status: DoseStatus = r.status.parse()?;
    let scheduled_time: DateTime<Utc> =
        DateTime::parse_from_rfc3339(&r.scheduled_time)?.with_timezone(&Utc);
    let action_time: Option<DateTime<Utc>> = match r.action_time {
        Some(ref s) => Some(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc)),
        None => None,
    };
    Ok(DoseEvent {
        id: r.id,
        profile_id: r.profile_id,
        medication_id: r.medication_id,
        slot_id: r.slot_id,
        status,
        scheduled_time,
        action_time,
        reason: r.reason,
    })
}

const SELECT_COLS: &str =
    "id, profile_id, medication_id, slot_id, status, scheduled_time, action_time, reason";

macro_rules! map_row {
    ($row:expr) => {
        Ok(DoseEventRow {
            id: $row.get(0)?,
            profile_id: $row.get(1)?,
            medication_id: $row.get(2)?,
            slot_id: $row.get(3)?,
            status: $row.get(4)?,
            scheduled_time: $row.get(5)?,
            action_time: $row.get(6)?,
            reason: $row.get(7)?,
        })
    };
}

/// Local calendar day a dose was due on; the uniqueness key uses it.
fn scheduled_day(e: &DoseEvent) -> String {
    e.scheduled_time.with_timezone(&Local).date_naive().to_string()
}

fn insert(conn: &Connection, verb: &str, e: &DoseEvent) -> rusqlite::Result<usize> {
    conn.execute(
        &format!(
            "{verb} INTO dose_events (id, profile_id, medication_id, slot_id, status, scheduled_time, scheduled_day, action_time, reason)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
        ),
        params![
            e.id,
            e.profile_id,
            e.medication_id,
            e.slot_id,
            e.status.to_string(),
            e.scheduled_time.to_rfc3339(),
            scheduled_day(e),
            e.action_time.map(|t| t.to_rfc3339()),
            e.reason,
        ],
    )
}

impl Database {
    /// Insert one event. Fails if the (medication, slot, day) key exists.
    pub fn insert_dose_event(&self, e: &DoseEvent) -> Result<()> {
        insert(&self.conn, "INSERT", e)?;
        Ok(())
    }

    /// Insert events in one transaction, skipping any whose (medication,
    /// slot, day) key is already recorded. Returns how many were written.
    pub fn insert_dose_events(&self, events: &[DoseEvent]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut written = 0;
        for e in events {
            written += insert(&tx, "INSERT OR IGNORE", e)?;
        }
        tx.commit()?;
        Ok(written)
    }

    /// Events ordered by scheduled time, optionally scoped to one profile.
    pub fn list_dose_events(&self, profile_id: Option<&str>) -> Result<Vec<DoseEvent>> {
        let (sql, args) = match profile_id {
            Some(p) => (
                format!(
                    "SELECT {SELECT_COLS} FROM dose_events WHERE profile_id = ?1 ORDER BY scheduled_time ASC"
                ),
                vec![p],
            ),
            None => (
                format!("SELECT {SELECT_COLS} FROM dose_events ORDER BY scheduled_time ASC"),
                vec![],
            ),
        };
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), |row| map_row!(row))?;

        let mut events = Vec::new();
        for row in rows {
            events.push(row_to_event(row?)?);
        }
        Ok(events)
    }

    /// The event recorded for a slot on a local calendar day, if any.
    pub fn find_dose_event(
        &self,
        medication_id: &str,
        slot_id: &str,
        day: NaiveDate,
    ) -> Result<Option<DoseEvent>> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM dose_events
             WHERE medication_id = ?1 AND slot_id = ?2 AND scheduled_day = ?3"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![medication_id, slot_id, day.to_string()], |row| {
            map_row!(row)
        })?;
        match rows.next() {
            Some(row) => Ok(Some(row_to_event(row?)?)),
            None => Ok(None),
        }
    }
}
