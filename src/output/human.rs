use chrono::Local;
use colored::Colorize;
use comfy_table::{Table, presets};

use crate::core::reminder::DueDose;
use crate::models::{
    AdherenceStats, CalendarDay, DoseEvent, DoseStatus, Medication, MedicationMissStat, Profile,
};

fn table() -> Table {
    let mut t = Table::new();
    t.load_preset(presets::UTF8_HORIZONTAL_ONLY);
    t
}

/// Adherence percentage, colored by how good it is.
fn rate_colored(rate: f64) -> String {
    let text = format!("{rate:.1}%");
    if rate >= 90.0 {
        text.green().to_string()
    } else if rate >= 70.0 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

pub fn format_profiles(profiles: &[Profile]) -> String {
    if profiles.is_empty() {
        return "No profiles.".to_string();
    }
    let mut t = table();
    t.set_header(vec!["Profile", "Relation", "Since"]);
    for p in profiles {
        t.add_row(vec![
            p.name.clone(),
            p.relation.clone().unwrap_or_default(),
            p.created_at.format("%Y-%m-%d").to_string(),
        ]);
    }
    t.to_string()
}

pub fn format_med_list(meds: &[Medication], include_stopped: bool) -> String {
    if meds.is_empty() {
        return if include_stopped {
            "No medications.".to_string()
        } else {
            "No active medications.".to_string()
        };
    }
    let mut t = table();
    t.set_header(vec!["Medication", "Dosage", "Schedule", "Status"]);
    for m in meds {
        let schedule: Vec<String> = m.schedule.iter().map(|s| s.to_string()).collect();
        let status = match m.stopped_at {
            Some(ts) if !m.active => format!("stopped {}", ts.format("%Y-%m-%d")),
            _ => "active".to_string(),
        };
        t.add_row(vec![
            m.name.clone(),
            m.dosage.clone().unwrap_or_default(),
            schedule.join(" "),
            status,
        ]);
    }
    t.to_string()
}

pub fn format_dose_recorded(event: &DoseEvent, med: &Medication) -> String {
    let when = event
        .scheduled_time
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M");
    let verb = match event.status {
        DoseStatus::Taken => "Took",
        DoseStatus::Skipped => "Skipped",
        DoseStatus::Missed => "Missed",
    };
    let mut line = format!("{} {} (due {})", verb, med.name, when);
    if let Some(ref reason) = event.reason {
        line.push_str(&format!("  # {}", reason));
    }
    line
}

pub fn format_stats(profile: &str, stats: &AdherenceStats, window_days: u32) -> String {
    let mut out = format!("=== Adherence for {} (last {} days) ===\n\n", profile, window_days);
    if stats.total == 0 {
        out.push_str("No doses recorded in this window.\n");
    } else {
        out.push_str(&format!(
            "Adherence: {}  ({} of {} doses taken)\n",
            rate_colored(stats.adherence_rate),
            stats.taken,
            stats.total
        ));
        out.push_str(&format!(
            "Missed: {} | Skipped: {}\n",
            stats.missed, stats.skipped
        ));
    }
    out.push_str(&format!(
        "Current streak: {} day(s) | Longest streak: {} day(s)",
        stats.current_streak, stats.longest_streak
    ));
    out
}

pub fn format_calendar(days: &[CalendarDay]) -> String {
    let mut t = table();
    t.set_header(vec!["Date", "Taken", "Total", "Adherence"]);
    for d in days {
        let rate = if d.total == 0 {
            "-".to_string()
        } else {
            rate_colored(d.ratio * 100.0)
        };
        t.add_row(vec![
            d.date.format("%Y-%m-%d %a").to_string(),
            d.taken.to_string(),
            d.total.to_string(),
            rate,
        ]);
    }
    t.to_string()
}

pub fn format_missed(stats: &[MedicationMissStat]) -> String {
    if stats.is_empty() {
        return "No missed doses.".to_string();
    }
    let mut t = table();
    t.set_header(vec!["Medication", "Missed", "Of", "Missed %", "Usually missed at"]);
    for s in stats {
        let times: Vec<String> = s
            .common_miss_times
            .iter()
            .map(|m| format!("{} ({}x)", m.time.format("%H:%M"), m.count))
            .collect();
        t.add_row(vec![
            s.name.clone(),
            s.missed_count.to_string(),
            s.total_doses.to_string(),
            format!("{:.1}%", s.missed_percentage),
            times.join(", "),
        ]);
    }
    t.to_string()
}

pub fn format_due(due: &DueDose) -> String {
    let when = due.scheduled_time.with_timezone(&Local).format("%H:%M");
    match due.dosage {
        Some(ref d) => format!("Due {}: {} {}", when, due.medication_name, d),
        None => format!("Due {}: {}", when, due.medication_name),
    }
}
