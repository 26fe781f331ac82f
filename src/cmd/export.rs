use anyhow::Result;
use chrono::NaiveDate;

use medtrack::core::export;
use medtrack::core::profile::resolve_profile;
use medtrack::db::Database;
use medtrack::models::config::Config;
use medtrack::output;

use super::analyzer_at;
use super::stats::resolve_range;

pub struct ExportParams<'a> {
    pub profile: Option<&'a str>,
    pub what: &'a str,
    pub format: &'a str,
    pub output_path: Option<&'a str>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub date: Option<NaiveDate>,
}

pub fn run_export(params: ExportParams<'_>, human: bool) -> Result<()> {
    let config = Config::load()?;
    let db = Database::open(&Config::db_path())?;
    let profile = resolve_profile(&db, &config, params.profile)?;
    let events = db.list_dose_events(Some(&profile.id))?;
    let analyzer = analyzer_at(params.date);

    let content = match (params.what, params.format) {
        ("calendar", format) => {
            let (start, end) = resolve_range(params.from, params.to, analyzer.today());
            let days = analyzer.calendar_data(&profile.id, &events, start, end)?;
            match format {
                "csv" => export::calendar_to_csv(&days),
                "json" => export::to_json(&days)?,
                other => anyhow::bail!("unsupported format: {} (expected csv/json)", other),
            }
        }
        ("stats", format) => {
            let stats =
                analyzer.calculate_stats(&profile.id, &events, config.adherence.window_days)?;
            match format {
                "csv" => export::stats_to_csv(&stats),
                "json" => export::to_json(&stats)?,
                other => anyhow::bail!("unsupported format: {} (expected csv/json)", other),
            }
        }
        ("events", "json") => export::to_json(&events)?,
        ("events", other) => anyhow::bail!("events export supports json only, got {}", other),
        (other, _) => anyhow::bail!(
            "unsupported export: {} (expected calendar/stats/events)",
            other
        ),
    };

    if let Some(path) = params.output_path {
        std::fs::write(path, &content)?;
        if human {
            println!("Exported to {}", path);
        } else {
            let out = output::success(
                "export",
                serde_json::json!({"path": path, "what": params.what, "format": params.format}),
            );
            println!("{}", serde_json::to_string(&out)?);
        }
    } else {
        print!("{}", content);
    }
    Ok(())
}

pub fn run_import(file_path: &str, human: bool) -> Result<()> {
    let db = Database::open(&Config::db_path())?;
    let content = std::fs::read_to_string(file_path)?;
    let summary = export::import_events_json(&db, &content)?;

    if human {
        println!(
            "Imported {} of {} events from {} ({} already recorded)",
            summary.inserted, summary.parsed, file_path, summary.duplicates
        );
    } else {
        let out = output::success(
            "import",
            serde_json::json!({"file": file_path, "summary": summary}),
        );
        println!("{}", serde_json::to_string(&out)?);
    }
    Ok(())
}
