use anyhow::Result;
use chrono::{Duration, NaiveDate};
use serde_json::json;

use medtrack::core::profile::resolve_profile;
use medtrack::db::Database;
use medtrack::models::config::Config;
use medtrack::output;

use super::analyzer_at;

pub fn run_stats(
    profile: Option<&str>,
    window: Option<u32>,
    date: Option<NaiveDate>,
    human: bool,
) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let profile = resolve_profile(&db, &config, profile)?;
    let window_days = window.unwrap_or(config.adherence.window_days);

    let events = db.list_dose_events(Some(&profile.id))?;
    let analyzer = analyzer_at(date);
    let stats = analyzer.calculate_stats(&profile.id, &events, window_days)?;

    if human {
        println!(
            "{}",
            output::human::format_stats(&profile.name, &stats, window_days)
        );
    } else {
        let out = output::success(
            "stats",
            json!({
                "profile": profile.name,
                "window_days": window_days,
                "today": analyzer.today(),
                "stats": stats,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

/// Calendar range: explicit bounds, else the 30 days ending today.
pub fn resolve_range(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    today: NaiveDate,
) -> (NaiveDate, NaiveDate) {
    let end = to.unwrap_or(today);
    let start = from.unwrap_or(end - Duration::days(29));
    (start, end)
}

pub fn run_calendar(
    profile: Option<&str>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    date: Option<NaiveDate>,
    human: bool,
) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let profile = resolve_profile(&db, &config, profile)?;

    let analyzer = analyzer_at(date);
    let (start, end) = resolve_range(from, to, analyzer.today());
    let events = db.list_dose_events(Some(&profile.id))?;
    let days = analyzer.calendar_data(&profile.id, &events, start, end)?;

    if human {
        println!("{}", output::human::format_calendar(&days));
    } else {
        let out = output::success(
            "calendar",
            json!({
                "profile": profile.name,
                "from": start,
                "to": end,
                "days": days,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_missed(profile: Option<&str>, date: Option<NaiveDate>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let profile = resolve_profile(&db, &config, profile)?;

    // Stopped medications keep their history, so they are ranked too.
    let meds = db.list_medications(Some(&profile.id), true)?;
    let events = db.list_dose_events(Some(&profile.id))?;
    let ranked = analyzer_at(date).most_missed_medications(&meds, &events);

    if human {
        println!("{}", output::human::format_missed(&ranked));
    } else {
        let out = output::success(
            "missed",
            json!({
                "profile": profile.name,
                "medications": ranked,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
