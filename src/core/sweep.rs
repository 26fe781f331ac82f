//! Inference of `missed` outcomes for doses nobody recorded.

use anyhow::Result;
use chrono::{DateTime, Days, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::HashSet;
use tracing::debug;

use crate::db::{Database, DoseRepository};
use crate::models::config::Config;
use crate::models::{DoseEvent, DoseStatus, Medication};

/// Minutes after the scheduled time before an unrecorded dose counts as missed.
pub const DEFAULT_GRACE_MINUTES: i64 = 30;

/// UTC instant of a local date and time of day. For a time skipped by a DST
/// jump there is no such instant and `None` is returned.
pub fn occurrence_time<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    time: NaiveTime,
) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|t| t.with_timezone(&Utc))
}

/// (medication, slot, local day) keys that already have an outcome.
pub(crate) fn recorded_keys<Tz: TimeZone>(
    events: &[DoseEvent],
    tz: &Tz,
) -> HashSet<(String, String, NaiveDate)> {
    events
        .iter()
        .map(|e| {
            (
                e.medication_id.clone(),
                e.slot_id.clone(),
                e.scheduled_time.with_timezone(tz).date_naive(),
            )
        })
        .collect()
}

/// Missed events for every slot occurrence of an active medication within the
/// last `lookback_days` days whose grace period has elapsed with no outcome.
pub fn infer_missed<Tz: TimeZone>(
    medications: &[Medication],
    events: &[DoseEvent],
    now: DateTime<Utc>,
    tz: &Tz,
    grace: Duration,
    lookback_days: u32,
) -> Vec<DoseEvent> {
    let recorded = recorded_keys(events, tz);
    let today = now.with_timezone(tz).date_naive();
    let first_day = today
        .checked_sub_days(Days::new(u64::from(lookback_days)))
        .unwrap_or(NaiveDate::MIN);

    let mut inferred = Vec::new();
    for med in medications.iter().filter(|m| m.active) {
        let created = med.created_at.with_timezone(tz).date_naive();
        for day in first_day.max(created).iter_days().take_while(|d| *d <= today) {
            for slot in med.slots_on(day) {
                let Some(scheduled) = occurrence_time(tz, day, slot.time) else {
                    continue;
                };
                let grace_elapsed = scheduled
                    .checked_add_signed(grace)
                    .is_some_and(|due| due <= now);
                if scheduled < med.created_at || !grace_elapsed {
                    continue;
                }
                let key = (med.id.clone(), slot.id.clone(), day);
                if recorded.contains(&key) {
                    continue;
                }
                inferred.push(DoseEvent::new(
                    &med.profile_id,
                    &med.id,
                    &slot.id,
                    DoseStatus::Missed,
                    scheduled,
                ));
            }
        }
    }
    inferred
}

/// Run the sweep against the database in the local time zone and persist the
/// inferred events.
pub fn run_sweep(db: &Database, config: &Config, now: DateTime<Utc>) -> Result<Vec<DoseEvent>> {
    let medications = db.active_medications()?;
    let events = db.dose_events()?;
    let inferred = infer_missed(
        &medications,
        &events,
        now,
        &Local,
        Duration::try_minutes(config.adherence.grace_minutes).unwrap_or(Duration::MAX),
        config.adherence.sweep_lookback_days,
    );
    let written = db.insert_dose_events(&inferred)?;
    debug!(inferred = inferred.len(), written, "missed-dose sweep finished");
    Ok(inferred)
}
