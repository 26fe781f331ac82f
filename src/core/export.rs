use anyhow::Result;
use serde::Serialize;

use crate::db::Database;
use crate::models::{AdherenceStats, CalendarDay, DoseEvent, DoseEventRecord};

/// Calendar as CSV: `date,adherence_rate,taken,total`, rate in percent.
pub fn calendar_to_csv(days: &[CalendarDay]) -> String {
    let mut out = String::from("date,adherence_rate,taken,total\n");
    for d in days {
        out.push_str(&format!(
            "{},{:.1},{},{}\n",
            d.date,
            d.ratio * 100.0,
            d.taken,
            d.total
        ));
    }
    out
}

pub fn stats_to_csv(stats: &AdherenceStats) -> String {
    format!(
        "total,taken,missed,skipped,adherence_rate,current_streak,longest_streak\n{},{},{},{},{:.1},{},{}\n",
        stats.total,
        stats.taken,
        stats.missed,
        stats.skipped,
        stats.adherence_rate,
        stats.current_streak,
        stats.longest_streak,
    )
}

/// Pretty JSON for any exported value.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub parsed: usize,
    pub inserted: usize,
    /// Events whose (medication, slot, day) was already recorded.
    pub duplicates: usize,
}

/// Import dose events from a JSON array. Every record is validated before
/// anything is written; a single bad record rejects the whole file.
pub fn import_events_json(db: &Database, json_str: &str) -> Result<ImportSummary> {
    let records: Vec<DoseEventRecord> = serde_json::from_str(json_str)?;
    let events = records
        .into_iter()
        .map(DoseEvent::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let inserted = db.insert_dose_events(&events)?;
    Ok(ImportSummary {
        parsed: events.len(),
        inserted,
        duplicates: events.len() - inserted,
    })
}
