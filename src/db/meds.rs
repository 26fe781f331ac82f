use anyhow::Result;
use chrono::{DateTime, NaiveTime, Utc};
use rusqlite::{params, params_from_iter};

use crate::models::med::parse_weekdays;
use crate::models::{DoseSlot, Medication};

use super::Database;

struct MedicationRow {
    id: String,
    profile_id: String,
    name: String,
    dosage: Option<String>,
    instructions: Option<String>,
    active: bool,
    created_at: String,
    stopped_at: Option<String>,
}

fn row_to_medication(r: MedicationRow, schedule: Vec<DoseSlot>) -> Result<Medication> {
    let created_at: DateTime<Utc> =
        DateTime::parse_from_rfc3339(&r.created_at)?.with_timezone(&Utc);
    let stopped_at: Option<DateTime<Utc>> = match r.stopped_at {
        Some(ref s) => Some(DateTime::parse_from_rfc3339(s)?.with_timezone(&Utc)),
        None => None,
    };

    Ok(Medication {
        id: r.id,
        profile_id: r.profile_id,
        name: r.name,
        dosage: r.dosage,
        instructions: r.instructions,
        schedule,
        active: r.active,
        created_at,
        stopped_at,
    })
}

const SELECT_COLS: &str =
    "id, profile_id, name, dosage, instructions, active, created_at, stopped_at";

macro_rules! map_row {
    ($row:expr) => {
        Ok(MedicationRow {
            id: $row.get(0)?,
            profile_id: $row.get(1)?,
            name: $row.get(2)?,
            dosage: $row.get(3)?,
            instructions: $row.get(4)?,
            active: $row.get(5)?,
            created_at: $row.get(6)?,
            stopped_at: $row.get(7)?,
        })
    };
}

impl Database {
    /// Insert a medication together with its dose slots.
    pub fn insert_medication(&self, med: &Medication) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO medications (id, profile_id, name, dosage, instructions, active, created_at, stopped_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                med.id,
                med.profile_id,
                med.name,
                med.dosage,
                med.instructions,
                med.active as i32,
                med.created_at.to_rfc3339(),
                med.stopped_at.map(|t| t.to_rfc3339()),
            ],
        )?;
        for slot in &med.schedule {
            tx.execute(
                "INSERT INTO dose_slots (id, medication_id, time, weekdays) VALUES (?1, ?2, ?3, ?4)",
                params![
                    slot.id,
                    med.id,
                    slot.time.format("%H:%M").to_string(),
                    slot.weekdays_string(),
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn load_slots(&self, medication_id: &str) -> Result<Vec<DoseSlot>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, time, weekdays FROM dose_slots WHERE medication_id = ?1 ORDER BY time ASC",
        )?;
        let rows = stmt.query_map(params![medication_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
            ))
        })?;

        let mut slots = Vec::new();
        for row in rows {
            let (id, time, weekdays) = row?;
            let weekdays = match weekdays {
                Some(ref w) => parse_weekdays(w)?,
                None => Vec::new(),
            };
            slots.push(DoseSlot {
                id,
                time: NaiveTime::parse_from_str(&time, "%H:%M")?,
                weekdays,
            });
        }
        Ok(slots)
    }

    fn query_medications(&self, sql: &str, args: &[&str]) -> Result<Vec<Medication>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), |row| map_row!(row))?;

        let mut meds = Vec::new();
        for row in rows {
            let r = row?;
            let slots = self.load_slots(&r.id)?;
            meds.push(row_to_medication(r, slots)?);
        }
        Ok(meds)
    }

    /// Active medication with this name in the profile.
    pub fn get_medication_by_name(
        &self,
        profile_id: &str,
        name: &str,
    ) -> Result<Option<Medication>> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM medications WHERE profile_id = ?1 AND name = ?2 AND active = 1"
        );
        Ok(self.query_medications(&sql, &[profile_id, name])?.into_iter().next())
    }

    /// Most relevant medication with this name: the active one, otherwise the
    /// most recently created stopped one.
    pub fn get_medication_by_name_any(
        &self,
        profile_id: &str,
        name: &str,
    ) -> Result<Option<Medication>> {
        let sql = format!(
            "SELECT {SELECT_COLS} FROM medications WHERE profile_id = ?1 AND name = ?2
             ORDER BY active DESC, created_at DESC LIMIT 1"
        );
        Ok(self.query_medications(&sql, &[profile_id, name])?.into_iter().next())
    }

    /// Medications, optionally scoped to one profile, ordered by name.
    pub fn list_medications(
        &self,
        profile_id: Option<&str>,
        include_stopped: bool,
    ) -> Result<Vec<Medication>> {
        let mut clauses = Vec::new();
        let mut args = Vec::new();
        if let Some(p) = profile_id {
            clauses.push("profile_id = ?1");
            args.push(p);
        }
        if !include_stopped {
            clauses.push("active = 1");
        }
        let filter = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let sql = format!(
            "SELECT {SELECT_COLS} FROM medications {filter} ORDER BY name ASC, created_at ASC"
        );
        self.query_medications(&sql, &args)
    }

    /// Mark the active medication stopped. Dose history is untouched.
    pub fn stop_medication(
        &self,
        profile_id: &str,
        name: &str,
        stopped_at: DateTime<Utc>,
    ) -> Result<bool> {
        let count = self.conn.execute(
            "UPDATE medications SET active = 0, stopped_at = ?1
             WHERE profile_id = ?2 AND name = ?3 AND active = 1",
            params![stopped_at.to_rfc3339(), profile_id, name],
        )?;
        Ok(count > 0)
    }
}
