//! Adherence analytics over in-memory dose history.
//!
//! Every operation is a pure function of its arguments plus the analyzer's
//! pinned "now" and time zone. Nothing is cached between calls.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

use crate::core::streak;
use crate::error::{Error, Result};
use crate::models::{
    AdherenceStats, CalendarDay, DoseEvent, DoseStatus, Medication, MedicationMissStat, MissTime,
};

pub const DEFAULT_WINDOW_DAYS: u32 = 30;

#[derive(Debug, Clone)]
pub struct AdherenceAnalyzer<Tz: TimeZone> {
    now: DateTime<Utc>,
    tz: Tz,
}

impl AdherenceAnalyzer<Local> {
    /// Analyzer anchored at the system clock in the local time zone.
    pub fn local() -> Self {
        Self::new(Utc::now(), Local)
    }
}

impl AdherenceAnalyzer<Utc> {
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, Utc)
    }
}

impl<Tz: TimeZone> AdherenceAnalyzer<Tz> {
    pub fn new(now: DateTime<Utc>, tz: Tz) -> Self {
        Self { now, tz }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(&self.now)
    }

    fn local_date(&self, t: &DateTime<Utc>) -> NaiveDate {
        t.with_timezone(&self.tz).date_naive()
    }

    fn local_time(&self, t: &DateTime<Utc>) -> NaiveTime {
        let local = t.with_timezone(&self.tz).time();
        // Group by minute; seconds carry no scheduling meaning.
        local.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(local)
    }

    /// Drop repeated (medication, slot, day) outcomes, keeping the first
    /// occurrence in input order.
    fn unique<'a, I>(&self, events: I) -> Vec<&'a DoseEvent>
    where
        I: IntoIterator<Item = &'a DoseEvent>,
    {
        let mut seen: HashSet<(&str, &str, NaiveDate)> = HashSet::new();
        let mut out = Vec::new();
        let mut dropped = 0usize;
        for e in events {
            let key = (
                e.medication_id.as_str(),
                e.slot_id.as_str(),
                self.local_date(&e.scheduled_time),
            );
            if seen.insert(key) {
                out.push(e);
            } else {
                dropped += 1;
            }
        }
        if dropped > 0 {
            debug!(dropped, "ignored duplicate dose events");
        }
        out
    }

    // -----------------------------------------------------------------------
    // calculate_stats
    // -----------------------------------------------------------------------

    /// Counts and rate over the trailing `window_days` ending at "now", plus
    /// streaks over the profile's whole history.
    pub fn calculate_stats(
        &self,
        profile_id: &str,
        events: &[DoseEvent],
        window_days: u32,
    ) -> Result<AdherenceStats> {
        if window_days == 0 {
            return Err(Error::invalid("window_days must be at least 1"));
        }

        let history = self.unique(events.iter().filter(|e| e.profile_id == profile_id));
        let cutoff = Duration::try_days(i64::from(window_days))
            .and_then(|w| self.now.checked_sub_signed(w))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let mut stats = AdherenceStats::default();
        let in_window = history
            .iter()
            .filter(|e| cutoff <= e.scheduled_time && e.scheduled_time <= self.now);
        for e in in_window {
            stats.total += 1;
            match e.status {
                DoseStatus::Taken => stats.taken += 1,
                DoseStatus::Missed => stats.missed += 1,
                DoseStatus::Skipped => stats.skipped += 1,
            }
        }
        stats.adherence_rate = percentage(stats.taken, stats.total);

        let days = self.qualifying_days(&history);
        stats.current_streak = streak::current_streak(&days, self.today());
        stats.longest_streak = streak::longest_streak(&days);

        debug!(
            profile_id,
            window_days,
            total = stats.total,
            current_streak = stats.current_streak,
            "calculated adherence stats"
        );
        Ok(stats)
    }

    /// Day → every dose that day was taken.
    fn qualifying_days(&self, events: &[&DoseEvent]) -> BTreeMap<NaiveDate, bool> {
        let mut days: BTreeMap<NaiveDate, bool> = BTreeMap::new();
        for e in events {
            let all_taken = days.entry(self.local_date(&e.scheduled_time)).or_insert(true);
            *all_taken &= e.status == DoseStatus::Taken;
        }
        days
    }

    // -----------------------------------------------------------------------
    // calendar_data
    // -----------------------------------------------------------------------

    /// One entry per date in `start..=end`, ascending, including empty days.
    pub fn calendar_data(
        &self,
        profile_id: &str,
        events: &[DoseEvent],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CalendarDay>> {
        if end < start {
            return Err(Error::invalid(format!(
                "calendar range ends ({end}) before it starts ({start})"
            )));
        }

        let mut buckets: HashMap<NaiveDate, (u32, u32)> = HashMap::new();
        for e in self.unique(events.iter().filter(|e| e.profile_id == profile_id)) {
            let day = self.local_date(&e.scheduled_time);
            if day < start || day > end {
                continue;
            }
            let (total, taken) = buckets.entry(day).or_insert((0, 0));
            *total += 1;
            if e.status == DoseStatus::Taken {
                *taken += 1;
            }
        }

        let calendar = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|date| match buckets.get(&date) {
                Some(&(total, taken)) => CalendarDay {
                    date,
                    ratio: ratio(taken, total),
                    total,
                    taken,
                },
                None => CalendarDay::empty(date),
            })
            .collect();
        Ok(calendar)
    }

    // -----------------------------------------------------------------------
    // most_missed_medications
    // -----------------------------------------------------------------------

    /// Medications with at least one miss, worst first.
    pub fn most_missed_medications(
        &self,
        medications: &[Medication],
        events: &[DoseEvent],
    ) -> Vec<MedicationMissStat> {
        let mut by_med: HashMap<&str, Vec<&DoseEvent>> = HashMap::new();
        for e in self.unique(events) {
            by_med.entry(e.medication_id.as_str()).or_default().push(e);
        }

        let mut results: Vec<MedicationMissStat> = medications
            .iter()
            .filter_map(|med| {
                let med_events = by_med.get(med.id.as_str())?;
                let mut taken = 0u32;
                let mut missed_times: HashMap<NaiveTime, u32> = HashMap::new();
                for e in med_events {
                    match e.status {
                        DoseStatus::Taken => taken += 1,
                        DoseStatus::Missed => {
                            let time = self.local_time(&e.scheduled_time);
                            *missed_times.entry(time).or_default() += 1;
                        }
                        DoseStatus::Skipped => {}
                    }
                }
                let missed_count: u32 = missed_times.values().sum();
                if missed_count == 0 {
                    return None;
                }
                let total_doses = taken + missed_count;
                Some(MedicationMissStat {
                    medication_id: med.id.clone(),
                    name: med.name.clone(),
                    missed_count,
                    total_doses,
                    missed_percentage: percentage(missed_count, total_doses),
                    common_miss_times: rank_miss_times(missed_times),
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.missed_percentage
                .total_cmp(&a.missed_percentage)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.medication_id.cmp(&b.medication_id))
        });
        results
    }
}

fn rank_miss_times(counts: HashMap<NaiveTime, u32>) -> Vec<MissTime> {
    let mut times: Vec<MissTime> = counts
        .into_iter()
        .map(|(time, count)| MissTime { time, count })
        .collect();
    times.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.time.cmp(&b.time)));
    times
}

fn ratio(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole)
    }
}

fn percentage(part: u32, whole: u32) -> f64 {
    ratio(part, whole) * 100.0
}
