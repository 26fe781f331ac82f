use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};
use serde_json::json;
use std::thread;

use medtrack::core::reminder::{ReminderService, SystemClock};
use medtrack::core::sweep;
use medtrack::db::Database;
use medtrack::models::config::Config;
use medtrack::output;

use super::now_at;

pub fn run_sweep(date: Option<NaiveDate>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;

    let inferred = sweep::run_sweep(&db, &config, now_at(date))?;

    if human {
        if inferred.is_empty() {
            println!("No new missed doses.");
        } else {
            println!("Marked {} dose(s) as missed.", inferred.len());
        }
    } else {
        let count = inferred.len();
        let out = output::success(
            "sweep",
            json!({
                "grace_minutes": config.adherence.grace_minutes,
                "missed": inferred,
                "count": count,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_remind(once: bool, lead: Option<i64>, interval: u64, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let lead_minutes = lead.unwrap_or(config.adherence.reminder_lead_minutes);
    if lead_minutes < 0 {
        return Err(medtrack::Error::invalid("lead cannot be negative").into());
    }
    let lead = Duration::try_minutes(lead_minutes).unwrap_or(Duration::MAX);
    let grace = Duration::try_minutes(config.adherence.grace_minutes).unwrap_or(Duration::MAX);

    let (mut service, due) = ReminderService::new(SystemClock, &db, Local, lead, grace);
    loop {
        service.tick()?;
        for d in due.try_iter() {
            if human {
                println!("{}", output::human::format_due(&d));
            } else {
                let out = output::success("remind", json!({ "due": d }));
                println!("{}", serde_json::to_string(&out)?);
            }
        }
        if once {
            return Ok(());
        }
        thread::sleep(std::time::Duration::from_secs(interval.max(1)));
    }
}
