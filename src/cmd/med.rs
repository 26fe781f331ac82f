use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;

use medtrack::core::med::{self, AddMedicationParams};
use medtrack::core::profile::resolve_profile;
use medtrack::core::record::{self, RecordDoseParams};
use medtrack::db::Database;
use medtrack::models::DoseStatus;
use medtrack::models::config::Config;
use medtrack::output;

pub fn run_add(
    profile: Option<&str>,
    name: &str,
    at: &[String],
    dosage: Option<&str>,
    instructions: Option<&str>,
    human: bool,
) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let profile = resolve_profile(&db, &config, profile)?;

    let medication = med::add_medication(
        &db,
        &config,
        AddMedicationParams {
            profile: &profile,
            name,
            dosage,
            instructions,
            slots: at,
        },
    )?;

    if human {
        let schedule: Vec<String> = medication.schedule.iter().map(|s| s.to_string()).collect();
        println!(
            "Added {} {} at {} for {}",
            medication.name,
            medication.dosage.as_deref().unwrap_or(""),
            schedule.join(", "),
            profile.name
        );
    } else {
        let out = output::success("med_add", json!({ "medication": medication }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_list(profile: Option<&str>, all: bool, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let profile = resolve_profile(&db, &config, profile)?;

    let meds = med::list_medications(&db, &profile, all)?;

    if human {
        println!("{}", output::human::format_med_list(&meds, all));
    } else {
        let count = meds.len();
        let out = output::success(
            "med_list",
            json!({
                "profile": profile.name,
                "medications": meds,
                "count": count,
            }),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

pub fn run_stop(
    profile: Option<&str>,
    name: &str,
    date: Option<NaiveDate>,
    human: bool,
) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let profile = resolve_profile(&db, &config, profile)?;

    let stopped = med::stop_medication(&db, &config, &profile, name, date)?;
    if !stopped {
        anyhow::bail!("Medication '{}' not found or already stopped.", name);
    }

    if human {
        println!("Stopped {}. Dose history is kept.", name);
    } else {
        let out = output::success("med_stop", json!({ "name": name, "stopped": true }));
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}

/// Shared by `med take` and `med skip`.
pub fn run_record(
    profile: Option<&str>,
    name: &str,
    status: DoseStatus,
    slot: Option<&str>,
    reason: Option<&str>,
    date: Option<NaiveDate>,
    human: bool,
) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let profile = resolve_profile(&db, &config, profile)?;

    let (event, medication) = record::record_dose(
        &db,
        &config,
        RecordDoseParams {
            profile: &profile,
            name,
            status,
            slot,
            reason,
            date,
        },
    )?;

    let command = format!("med_{}", match status {
        DoseStatus::Taken => "take",
        DoseStatus::Skipped => "skip",
        DoseStatus::Missed => "miss",
    });
    let warning = (!medication.active)
        .then(|| format!("Medication '{}' is stopped. Recording anyway.", medication.name));
    if let Some(ref w) = warning {
        eprintln!("Warning: {}", w);
    }

    if human {
        println!(
            "{}",
            output::human::format_dose_recorded(&event, &medication)
        );
    } else {
        let mut data = json!({
            "medication": medication.name,
            "event": event,
        });
        if let Some(w) = warning {
            data["warning"] = json!(w);
        }
        let out = output::success(&command, data);
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
