pub mod config;
pub mod export;
pub mod init;
pub mod med;
pub mod profile;
pub mod stats;
pub mod sweep;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

use medtrack::AdherenceAnalyzer;

/// "Now" for commands: the real clock, or the last second of `--date`.
pub fn now_at(date: Option<NaiveDate>) -> DateTime<Utc> {
    let Some(d) = date else {
        return Utc::now();
    };
    let end_of_day = d.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN));
    Local
        .from_local_datetime(&end_of_day)
        .latest()
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&end_of_day))
}

pub fn analyzer_at(date: Option<NaiveDate>) -> AdherenceAnalyzer<Local> {
    AdherenceAnalyzer::new(now_at(date), Local)
}
