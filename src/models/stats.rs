use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

/// Aggregate adherence over a trailing window.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdherenceStats {
    pub total: u32,
    pub taken: u32,
    pub missed: u32,
    pub skipped: u32,
    /// Percentage in `[0, 100]`.
    pub adherence_rate: f64,
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// One cell of the adherence calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// `taken / total`, or 0 when nothing was scheduled.
    pub ratio: f64,
    pub total: u32,
    pub taken: u32,
}

impl CalendarDay {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            ratio: 0.0,
            total: 0,
            taken: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissTime {
    pub time: NaiveTime,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicationMissStat {
    pub medication_id: String,
    pub name: String,
    pub missed_count: u32,
    /// Taken plus missed; skipped doses are not counted.
    pub total_doses: u32,
    pub missed_percentage: f64,
    /// Scheduled times of day of the misses, most frequent first.
    pub common_miss_times: Vec<MissTime>,
}
