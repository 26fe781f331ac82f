use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use uuid::Uuid;

use crate::error::Error;

// ---------------------------------------------------------------------------
// DoseSlot
// ---------------------------------------------------------------------------

/// One scheduled time of day for a medication.
///
/// An empty `weekdays` list means the slot applies every day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoseSlot {
    pub id: String,
    pub time: NaiveTime,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekdays: Vec<Weekday>,
}

impl DoseSlot {
    pub fn new(time: NaiveTime) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            time,
            weekdays: Vec::new(),
        }
    }

    pub fn with_weekdays(mut self, weekdays: Vec<Weekday>) -> Self {
        self.weekdays = weekdays;
        self
    }

    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.weekdays.is_empty() || self.weekdays.contains(&date.weekday())
    }

    /// Weekday list in its stored form, e.g. `"mon,wed,fri"`.
    pub fn weekdays_string(&self) -> Option<String> {
        if self.weekdays.is_empty() {
            return None;
        }
        Some(
            self.weekdays
                .iter()
                .map(|d| weekday_abbrev(*d))
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

static SLOT_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})(?:@([a-z,\s]+))?$"));

/// Parses `"HH:MM"` or `"HH:MM@mon,wed,fri"`.
impl FromStr for DoseSlot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let re = SLOT_RE
            .as_ref()
            .map_err(|e| Error::invalid(e.to_string()))?;
        let normalized = s.trim().to_lowercase();
        let caps = re.captures(&normalized).ok_or_else(|| {
            Error::invalid(format!("dose slot '{s}' (expected HH:MM[@mon,tue,...])"))
        })?;

        let hour: u32 = caps[1]
            .parse()
            .map_err(|_| Error::invalid(format!("hour in '{s}'")))?;
        let minute: u32 = caps[2]
            .parse()
            .map_err(|_| Error::invalid(format!("minute in '{s}'")))?;
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| Error::invalid(format!("time of day out of range in '{s}'")))?;

        let weekdays = match caps.get(3) {
            Some(m) => parse_weekdays(m.as_str())?,
            None => Vec::new(),
        };
        Ok(Self::new(time).with_weekdays(weekdays))
    }
}

impl fmt::Display for DoseSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.time.format("%H:%M"))?;
        if let Some(days) = self.weekdays_string() {
            write!(f, "@{days}")?;
        }
        Ok(())
    }
}

/// Parse a comma-separated weekday list. Duplicates collapse; order follows
/// the week starting Monday.
pub fn parse_weekdays(input: &str) -> Result<Vec<Weekday>, Error> {
    let mut days = Vec::new();
    for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let day: Weekday = part
            .parse()
            .map_err(|_| Error::invalid(format!("unknown weekday '{part}'")))?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    days.sort_by_key(|d| d.num_days_from_monday());
    Ok(days)
}

fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}

// ---------------------------------------------------------------------------
// Medication
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: String,
    pub profile_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    pub schedule: Vec<DoseSlot>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stopped_at: Option<DateTime<Utc>>,
}

impl Medication {
    pub fn new(profile_id: &str, name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            profile_id: profile_id.to_string(),
            name: name.to_string(),
            dosage: None,
            instructions: None,
            schedule: Vec::new(),
            active: true,
            created_at: Utc::now(),
            stopped_at: None,
        }
    }

    pub fn slot(&self, slot_id: &str) -> Option<&DoseSlot> {
        self.schedule.iter().find(|s| s.id == slot_id)
    }

    /// Slots scheduled on `date`, ordered by time of day.
    pub fn slots_on(&self, date: NaiveDate) -> Vec<&DoseSlot> {
        let mut slots: Vec<&DoseSlot> = self
            .schedule
            .iter()
            .filter(|s| s.applies_on(date))
            .collect();
        slots.sort_by_key(|s| s.time);
        slots
    }
}
