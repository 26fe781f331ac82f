use anyhow::{Result, bail};
use chrono::{NaiveDate, TimeZone, Utc};

use crate::db::Database;
use crate::models::config::Config;
use crate::models::{DoseSlot, Medication, Profile};

// ---------------------------------------------------------------------------
// AddMedicationParams
// ---------------------------------------------------------------------------

/// Parameters for adding a new medication.
pub struct AddMedicationParams<'a> {
    pub profile: &'a Profile,
    pub name: &'a str,
    pub dosage: Option<&'a str>,
    pub instructions: Option<&'a str>,
    /// Slot text such as `"08:00"` or `"20:00@mon,thu"`.
    pub slots: &'a [String],
}

// ---------------------------------------------------------------------------
// add_medication
// ---------------------------------------------------------------------------

pub fn add_medication(
    db: &Database,
    config: &Config,
    params: AddMedicationParams<'_>,
) -> Result<Medication> {
    let name = config.resolve_alias(params.name.trim());
    if name.is_empty() {
        bail!("Medication name cannot be empty.");
    }
    if params.slots.is_empty() {
        bail!("Medication '{}' needs at least one dose time (--at HH:MM).", name);
    }

    let mut schedule: Vec<DoseSlot> = Vec::with_capacity(params.slots.len());
    for text in params.slots {
        let slot: DoseSlot = text.parse()?;
        if schedule
            .iter()
            .any(|s| s.time == slot.time && s.weekdays == slot.weekdays)
        {
            bail!("Dose time '{}' is listed twice.", slot);
        }
        schedule.push(slot);
    }
    schedule.sort_by_key(|s| s.time);

    let mut med = Medication::new(&params.profile.id, &name);
    med.dosage = params.dosage.map(String::from);
    med.instructions = params.instructions.map(String::from);
    med.schedule = schedule;

    match db.insert_medication(&med) {
        Ok(()) => Ok(med),
        Err(e) => {
            let msg = e.to_string();
            if msg.contains("UNIQUE") || msg.contains("constraint") {
                bail!(
                    "Medication '{}' is already active. Stop it first before re-adding.",
                    name
                );
            }
            Err(e)
        }
    }
}

// ---------------------------------------------------------------------------
// lookups
// ---------------------------------------------------------------------------

/// Find a medication by name or alias: the active one first, else the latest
/// stopped one.
pub fn find_medication(
    db: &Database,
    config: &Config,
    profile: &Profile,
    name: &str,
) -> Result<Medication> {
    let resolved = config.resolve_alias(name);
    if let Some(m) = db.get_medication_by_name(&profile.id, &resolved)? {
        return Ok(m);
    }
    match db.get_medication_by_name_any(&profile.id, &resolved)? {
        Some(m) => Ok(m),
        None => bail!("Medication '{}' not found. Use `med add` first.", resolved),
    }
}

pub fn list_medications(
    db: &Database,
    profile: &Profile,
    include_stopped: bool,
) -> Result<Vec<Medication>> {
    db.list_medications(Some(&profile.id), include_stopped)
}

// ---------------------------------------------------------------------------
// stop_medication
// ---------------------------------------------------------------------------

/// Deactivate a medication. Its dose history stays in place.
pub fn stop_medication(
    db: &Database,
    config: &Config,
    profile: &Profile,
    name: &str,
    date: Option<NaiveDate>,
) -> Result<bool> {
    let resolved = config.resolve_alias(name);
    let stopped_at = if let Some(d) = date
        && let Some(dt) = d.and_hms_opt(12, 0, 0)
    {
        Utc.from_utc_datetime(&dt)
    } else {
        Utc::now()
    };
    db.stop_medication(&profile.id, &resolved, stopped_at)
}
