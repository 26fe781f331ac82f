//! Due-dose detection as an explicit service.
//!
//! A `ReminderService` owns its clock and repository and publishes each due
//! dose once on a channel; whoever holds the receiver decides how to notify.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, warn};

use crate::core::sweep::{occurrence_time, recorded_keys};
use crate::db::DoseRepository;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that always reads the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DueDose {
    pub profile_id: String,
    pub medication_id: String,
    pub medication_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    pub slot_id: String,
    pub scheduled_time: DateTime<Utc>,
}

pub struct ReminderService<C: Clock, R: DoseRepository, Tz: TimeZone> {
    clock: C,
    repo: R,
    tz: Tz,
    lead: Duration,
    grace: Duration,
    tx: Sender<DueDose>,
    notified: HashSet<(String, String, DateTime<Utc>)>,
}

impl<C: Clock, R: DoseRepository, Tz: TimeZone> ReminderService<C, R, Tz> {
    /// Doses become due `lead` before their scheduled time and stay due
    /// until `grace` after it, unless an outcome is recorded first.
    pub fn new(
        clock: C,
        repo: R,
        tz: Tz,
        lead: Duration,
        grace: Duration,
    ) -> (Self, Receiver<DueDose>) {
        let (tx, rx) = mpsc::channel();
        let service = Self {
            clock,
            repo,
            tz,
            lead,
            grace,
            tx,
            notified: HashSet::new(),
        };
        (service, rx)
    }

    /// Publish every newly due dose. Returns how many were sent.
    pub fn tick(&mut self) -> Result<usize> {
        let now = self.clock.now();
        let from = now.checked_sub_signed(self.grace).unwrap_or(DateTime::<Utc>::MIN_UTC);
        let until = now.checked_add_signed(self.lead).unwrap_or(DateTime::<Utc>::MAX_UTC);
        // Occurrences before `from` can no longer become due.
        self.notified.retain(|(_, _, scheduled)| *scheduled >= from);

        let medications = self.repo.active_medications()?;
        let events = self.repo.dose_events()?;
        let recorded = recorded_keys(&events, &self.tz);

        let today = now.with_timezone(&self.tz).date_naive();
        let days = [today.pred_opt(), Some(today), today.succ_opt()];

        let mut sent = 0;
        for med in &medications {
            for day in days.iter().flatten() {
                for slot in med.slots_on(*day) {
                    let Some(scheduled) = occurrence_time(&self.tz, *day, slot.time) else {
                        continue;
                    };
                    if scheduled < from || scheduled > until {
                        continue;
                    }
                    if recorded.contains(&(med.id.clone(), slot.id.clone(), *day)) {
                        continue;
                    }
                    if !self
                        .notified
                        .insert((med.id.clone(), slot.id.clone(), scheduled))
                    {
                        continue;
                    }

                    let due = DueDose {
                        profile_id: med.profile_id.clone(),
                        medication_id: med.id.clone(),
                        medication_name: med.name.clone(),
                        dosage: med.dosage.clone(),
                        slot_id: slot.id.clone(),
                        scheduled_time: scheduled,
                    };
                    if self.tx.send(due).is_err() {
                        warn!("reminder receiver dropped; stopping");
                        return Err(anyhow!("reminder receiver has been dropped"));
                    }
                    debug!(medication = %med.name, %scheduled, "dose due");
                    sent += 1;
                }
            }
        }
        Ok(sent)
    }
}
