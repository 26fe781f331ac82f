use anyhow::{Result, bail};
use chrono::{Local, NaiveDate, NaiveTime, Utc};

use crate::core::med::find_medication;
use crate::core::sweep::occurrence_time;
use crate::db::Database;
use crate::models::config::Config;
use crate::models::{DoseEvent, DoseSlot, DoseStatus, Medication, Profile};

/// Parameters for recording the outcome of a scheduled dose.
pub struct RecordDoseParams<'a> {
    pub profile: &'a Profile,
    pub name: &'a str,
    pub status: DoseStatus,
    /// `HH:MM` of the slot; when absent the nearest unrecorded slot is used.
    pub slot: Option<&'a str>,
    pub reason: Option<&'a str>,
    /// Day the dose was due; defaults to today.
    pub date: Option<NaiveDate>,
}

/// Record taken/skipped/missed for one dose slot. Returns the new event and
/// the medication it belongs to, which may be stopped.
pub fn record_dose(
    db: &Database,
    config: &Config,
    params: RecordDoseParams<'_>,
) -> Result<(DoseEvent, Medication)> {
    let medication = find_medication(db, config, params.profile, params.name)?;

    let now = Utc::now();
    let local_now = now.with_timezone(&Local);
    let day = params.date.unwrap_or_else(|| local_now.date_naive());

    let slots = medication.slots_on(day);
    if slots.is_empty() {
        bail!("'{}' has no dose scheduled on {}.", medication.name, day);
    }

    let slot = match params.slot {
        Some(text) => {
            let time = NaiveTime::parse_from_str(text.trim(), "%H:%M")
                .map_err(|_| anyhow::anyhow!("invalid slot time '{}' (expected HH:MM)", text))?;
            let Some(slot) = slots.iter().find(|s| s.time == time) else {
                bail!("'{}' has no {} dose on {}.", medication.name, text.trim(), day);
            };
            if db.find_dose_event(&medication.id, &slot.id, day)?.is_some() {
                bail!(
                    "The {} dose of '{}' on {} is already recorded.",
                    slot.time.format("%H:%M"),
                    medication.name,
                    day
                );
            }
            (*slot).clone()
        }
        None => nearest_open_slot(db, &medication, &slots, day, local_now.time())?,
    };

    let Some(scheduled_time) = occurrence_time(&Local, day, slot.time) else {
        bail!("{} {} does not exist in the local time zone.", day, slot.time);
    };

    let mut event = DoseEvent::new(
        &params.profile.id,
        &medication.id,
        &slot.id,
        params.status,
        scheduled_time,
    );
    event.action_time = Some(now);
    event.reason = params.reason.map(String::from);

    db.insert_dose_event(&event)?;
    Ok((event, medication))
}

/// The unrecorded slot closest to `reference`; earlier slot wins a tie.
fn nearest_open_slot(
    db: &Database,
    medication: &Medication,
    slots: &[&DoseSlot],
    day: NaiveDate,
    reference: NaiveTime,
) -> Result<DoseSlot> {
    let mut best: Option<(&DoseSlot, i64)> = None;
    for &slot in slots {
        if db.find_dose_event(&medication.id, &slot.id, day)?.is_some() {
            continue;
        }
        let distance = (slot.time - reference).num_seconds().abs();
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((slot, distance));
        }
    }
    match best {
        Some((slot, _)) => Ok(slot.clone()),
        None => bail!(
            "All doses of '{}' on {} are already recorded.",
            medication.name,
            day
        ),
    }
}
